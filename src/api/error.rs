// ==========================================
// 会议日程构建器 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入层错误为调用方可读的消息
// 说明: 数据质量问题只在构建被阻断时以 ValidationBlocked 出现
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 会话错误
    // ==========================================
    #[error("No file provided. Upload a file or fetch from Google Sheets.")]
    NoActiveWorkbook,

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==========================================
    // 远程获取错误
    // ==========================================
    /// 表格未公开共享（HTTP 403）
    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    FetchFailed(String),

    // ==========================================
    // 导入/构建错误
    // ==========================================
    #[error("Import failed: {0}")]
    ImportError(String),

    /// 存在数据质量错误，拒绝导出
    #[error("Build blocked by {} validation error(s)", .errors.len())]
    ValidationBlocked {
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            // 远程获取
            ImportError::AccessDenied(msg) => ApiError::AccessDenied(msg),
            ImportError::DownloadFailed(_) | ImportError::FetchFailed(_) => {
                ApiError::FetchFailed(err.to_string())
            }

            // 调用方输入问题
            ImportError::InvalidSheetUrl(_)
            | ImportError::UnsupportedFormat(_)
            | ImportError::InvalidJson(_)
            | ImportError::ConfigReadError { .. }
            | ImportError::ConfigValueError { .. } => ApiError::InvalidInput(err.to_string()),

            // 通用错误
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(e) => ApiError::Other(e),

            // 文件读取/解析
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
