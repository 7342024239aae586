// ==========================================
// 会议日程构建器 - 日程API
// ==========================================
// 职责: 封装上传/获取/列表/预览/构建/重置/日程代理
// 说明: 单操作员会话，所有操作同步执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::state::WorkbookSession;
use crate::config::ConfigManager;
use crate::domain::record::{PreviewResponse, SheetListing};
use crate::domain::sheet::BuildConfig;
use crate::domain::table::Workbook;
use crate::engine::orchestrator::ProgramOrchestrator;
use crate::importer::remote_fetch::RemoteFetcher;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 构建产物
#[derive(Debug, Clone, Serialize)]
pub struct BuildArtifact {
    /// 导出文件名
    pub file_name: String,
    /// 输出数据（格式化 JSON，保留非 ASCII 字符）
    pub json: String,
    /// 不阻断导出的警告
    pub warnings: Vec<String>,
}

/// 日程API
pub struct ProgramApi {
    session: WorkbookSession,
    sheet_id: Option<String>,
    fetcher: RemoteFetcher,
    orchestrator: ProgramOrchestrator,
    temp_dir: PathBuf,
    export_file_name: String,
}

impl ProgramApi {
    /// 按运行时配置创建
    pub fn new(config: &ConfigManager) -> ApiResult<Self> {
        let fetcher = RemoteFetcher::new(
            config.export_url_template()?,
            config.download_timeout()?,
            config.proxy_timeout()?,
        )?;

        Ok(Self {
            session: WorkbookSession::new(),
            sheet_id: None,
            fetcher,
            orchestrator: ProgramOrchestrator::new(),
            temp_dir: config.temp_dir(),
            export_file_name: config.export_file_name()?,
        })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// 上传工作簿
    ///
    /// # 参数
    /// - file_name: 原始文件名
    /// - bytes: 文件内容
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) -> ApiResult<SheetListing> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("uploaded file is empty".to_string()));
        }
        self.session
            .load_from_upload(file_name, bytes, &self.temp_dir)?;
        self.sheet_id = None;
        Ok(self.list_sheets())
    }

    /// 加载本地工作簿
    pub fn load_path(&mut self, path: &Path) -> ApiResult<SheetListing> {
        self.session.load_from_path(path)?;
        self.sheet_id = None;
        Ok(self.list_sheets())
    }

    /// 获取 Google 表格并加载
    pub fn fetch_google(&mut self, url: &str) -> ApiResult<SheetListing> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ApiError::InvalidInput("Missing Google Sheets URL".to_string()));
        }
        let sheet_id = self
            .session
            .fetch_and_load(url, &self.fetcher, &self.temp_dir)?;
        self.sheet_id = Some(sheet_id);
        Ok(self.list_sheets())
    }

    /// 当前工作簿的工作表概览（未加载时为空）
    pub fn list_sheets(&self) -> SheetListing {
        self.session.sheet_listing(self.sheet_id.clone())
    }

    /// 预览
    pub fn preview(&self, config: &BuildConfig) -> ApiResult<PreviewResponse> {
        let workbook = self.active_workbook()?;
        Ok(self.orchestrator.preview(workbook, config))
    }

    /// 构建导出文件
    ///
    /// # 返回
    /// - Ok(BuildArtifact): errors 为空
    /// - Err(ApiError::ValidationBlocked): 存在数据质量错误
    pub fn build(&self, config: &BuildConfig) -> ApiResult<BuildArtifact> {
        let resp = self.preview(config)?;
        if !resp.is_exportable() {
            tracing::warn!(errors = resp.errors.len(), "存在数据质量错误，拒绝导出");
            return Err(ApiError::ValidationBlocked {
                errors: resp.errors,
                warnings: resp.warnings,
            });
        }

        let json = serde_json::to_string_pretty(&resp.data)
            .map_err(|e| ApiError::InternalError(format!("serialize output failed: {}", e)))?;

        tracing::info!(
            file_name = %self.export_file_name,
            groups = resp.data.len(),
            warnings = resp.warnings.len(),
            "构建完成"
        );

        Ok(BuildArtifact {
            file_name: self.export_file_name.clone(),
            json,
            warnings: resp.warnings,
        })
    }

    /// 重置会话
    pub fn reset(&mut self) {
        self.session.clear();
        self.sheet_id = None;
    }

    /// 代理获取远程日程 JSON
    pub fn fetch_program(&self, src: &str) -> ApiResult<serde_json::Value> {
        let src = src.trim();
        if src.is_empty() {
            return Err(ApiError::InvalidInput("Missing src".to_string()));
        }
        Ok(self.fetcher.fetch_json(src)?)
    }

    fn active_workbook(&self) -> ApiResult<&Workbook> {
        self.session.workbook().ok_or(ApiError::NoActiveWorkbook)
    }
}
