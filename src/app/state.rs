// ==========================================
// 会议日程构建器 - 工作簿会话状态
// ==========================================
// 职责: 持有当前工作簿及其临时文件
// 约定:
// - 新的加载替换旧工作簿；由本会话写入的临时文件随之删除
// - 用户自己提供的文件路径只读取，不删除
// - 清理失败只记日志，不向调用方报错
// ==========================================

use crate::domain::record::{SheetInfo, SheetListing};
use crate::domain::table::{SheetTable, Workbook};
use crate::importer::column_resolver::{guess_by_type, guess_columns};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::remote_fetch::{parse_sheet_id, RemoteFetcher};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 工作簿的来源文件
#[derive(Debug, Clone, PartialEq, Eq)]
struct BackingFile {
    path: PathBuf,
    /// 是否由本会话创建（上传/下载的临时文件）
    owned: bool,
}

// ==========================================
// WorkbookSession - 工作簿会话
// ==========================================
#[derive(Debug, Default)]
pub struct WorkbookSession {
    backing: Option<BackingFile>,
    workbook: Option<Workbook>,
    loaded_at: Option<DateTime<Utc>>,
}

impl WorkbookSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.workbook.is_some()
    }

    /// 当前工作簿（未加载返回 None）
    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }

    pub fn backing_path(&self) -> Option<&Path> {
        self.backing.as_ref().map(|b| b.path.as_path())
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// 加载本地工作簿文件（不接管文件）
    pub fn load_from_path(&mut self, path: &Path) -> ImportResult<&Workbook> {
        let workbook = UniversalFileParser::new().parse(path)?;
        self.install(
            BackingFile {
                path: path.to_path_buf(),
                owned: false,
            },
            workbook,
        );
        self.current()
    }

    /// 加载上传的文件字节
    ///
    /// # 参数
    /// - file_name: 原始文件名（决定扩展名；CSV 工作表以其命名）
    /// - bytes: 文件内容
    /// - temp_dir: 临时文件目录
    pub fn load_from_upload(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        temp_dir: &Path,
    ) -> ImportResult<&Workbook> {
        let original = Path::new(file_name);
        let ext = original
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| ".xlsx".to_string());

        let path = temp_dir.join(format!("_uploaded_{}{}", Uuid::new_v4(), ext));
        std::fs::write(&path, bytes)?;

        let sheet_name = original
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());

        let workbook = match UniversalFileParser::with_csv_sheet_name(sheet_name).parse(&path) {
            Ok(workbook) => workbook,
            Err(e) => {
                remove_file_best_effort(&path);
                return Err(e);
            }
        };

        tracing::info!(file_name, path = %path.display(), "上传文件已加载");
        self.install(BackingFile { path, owned: true }, workbook);
        self.current()
    }

    /// 下载 Google 表格并加载
    ///
    /// # 返回
    /// - Ok(sheet_id): 从链接中提取的表格 ID
    pub fn fetch_and_load(
        &mut self,
        url: &str,
        fetcher: &RemoteFetcher,
        temp_dir: &Path,
    ) -> ImportResult<String> {
        let sheet_id =
            parse_sheet_id(url).ok_or_else(|| ImportError::InvalidSheetUrl(url.to_string()))?;

        let bytes = fetcher.download_sheet_xlsx(&sheet_id)?;
        let path = temp_dir.join(format!("_gsheet_{}.xlsx", Uuid::new_v4()));
        std::fs::write(&path, &bytes)?;

        let workbook = match UniversalFileParser::new().parse(&path) {
            Ok(workbook) => workbook,
            Err(e) => {
                remove_file_best_effort(&path);
                return Err(e);
            }
        };

        tracing::info!(sheet_id = %sheet_id, path = %path.display(), "Google 表格已加载");
        self.install(BackingFile { path, owned: true }, workbook);
        Ok(sheet_id)
    }

    /// 清空会话（删除自有临时文件）
    pub fn clear(&mut self) {
        if let Some(backing) = self.backing.take() {
            if backing.owned {
                remove_file_best_effort(&backing.path);
            }
        }
        if self.workbook.take().is_some() {
            tracing::info!("工作簿会话已重置");
        }
        self.loaded_at = None;
    }

    /// 工作表概览（未加载时为空列表）
    pub fn sheet_listing(&self, sheet_id: Option<String>) -> SheetListing {
        let sheets = self
            .workbook
            .iter()
            .flat_map(|wb| wb.iter())
            .map(|(name, table)| SheetInfo {
                name: name.to_string(),
                columns: table.column_names().to_vec(),
                guess: guess_columns(table),
                guesses: guess_by_type(table),
            })
            .collect();

        SheetListing { sheets, sheet_id }
    }

    fn install(&mut self, backing: BackingFile, workbook: Workbook) {
        let same_file = self.backing.as_ref() == Some(&backing);
        if !same_file {
            self.clear();
        }
        tracing::debug!(sheets = workbook.len(), "工作簿已替换");
        self.backing = Some(backing);
        self.workbook = Some(workbook);
        self.loaded_at = Some(Utc::now());
    }

    fn current(&self) -> ImportResult<&Workbook> {
        self.workbook
            .as_ref()
            .ok_or_else(|| ImportError::InternalError("workbook missing after load".to_string()))
    }
}

impl Drop for WorkbookSession {
    fn drop(&mut self) {
        self.clear();
    }
}

fn remove_file_best_effort(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), "临时文件删除失败: {}", e);
        }
    }
}
