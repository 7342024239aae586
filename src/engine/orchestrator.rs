// ==========================================
// 会议日程构建器 - 预览编排器
// ==========================================
// 用途: 协调记录构建 → 赞助商关联 → 数据质量校验
// 流程:
// 1. 按配置顺序逐表构建（缺表跳过并警告）
// 2. 赞助商 Logo 关联
// 3. 日程/讲者/赞助商校验
// ==========================================

use crate::domain::record::{OutputDocument, PreviewResponse};
use crate::domain::sheet::BuildConfig;
use crate::domain::table::{SheetTable, Workbook};
use crate::engine::sponsor_enrichment::enrich_document;
use crate::importer::dq_validator::DqValidator;
use crate::importer::record_builder::{build_sheet, SheetOutput};
use tracing::{debug, info, warn};

// ==========================================
// ProgramOrchestrator - 预览编排器
// ==========================================
#[derive(Debug, Default)]
pub struct ProgramOrchestrator {
    validator: DqValidator,
}

impl ProgramOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行完整预览流程
    ///
    /// # 参数
    /// - workbook: 当前工作簿
    /// - config: 构建配置（工作表映射列表）
    ///
    /// # 返回
    /// - PreviewResponse: 输出数据 + 警告（构建警告在前）+ 错误
    pub fn preview(&self, workbook: &Workbook, config: &BuildConfig) -> PreviewResponse {
        let mut warnings = Vec::new();

        // ===== 步骤 1: 逐表构建 =====
        let mut document = self.build_document(workbook, config, &mut warnings);

        // ===== 步骤 2: 赞助商关联 =====
        enrich_document(&mut document);

        // ===== 步骤 3: 校验 =====
        let report = self.validator.validate_document(&document);
        warnings.extend(report.warnings);

        info!(
            groups = document.len(),
            warnings = warnings.len(),
            errors = report.errors.len(),
            "预览完成"
        );

        PreviewResponse {
            data: document,
            warnings,
            errors: report.errors,
        }
    }

    /// 按配置顺序构建所有工作表
    pub fn build_document(
        &self,
        workbook: &Workbook,
        config: &BuildConfig,
        warnings: &mut Vec<String>,
    ) -> OutputDocument {
        let mut document = OutputDocument::new();

        for sheet in &config.sheets {
            let Some(table) = workbook.sheet(&sheet.name) else {
                warn!(sheet = %sheet.name, "工作表不存在，跳过");
                warnings.push(format!("[config] Sheet '{}' not found in workbook", sheet.name));
                continue;
            };

            let output = build_sheet(table, sheet, warnings);
            debug!(
                sheet = %sheet.name,
                key = %sheet.key,
                sheet_type = %sheet.sheet_type,
                source_rows = table.row_count(),
                records = output.len(),
                "工作表构建完成"
            );

            if table.row_count() > 0 && output.is_empty() {
                warnings.push(format!("[{}] {}", sheet.key, sheet.sheet_type.empty_output_hint()));
            }

            let replaced = match output {
                SheetOutput::Sessions(sessions) => document.insert_sessions(&sheet.key, sessions),
                SheetOutput::Items(items) => document.insert_items(&sheet.key, items),
            };
            if replaced {
                warn!(key = %sheet.key, "输出分组键重复，覆盖前一分组");
                warnings.push(format!(
                    "[config] Output key '{}' is used by more than one sheet; '{}' replaces the earlier group",
                    sheet.key, sheet.name
                ));
            }
        }

        document
    }
}
