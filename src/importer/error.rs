// ==========================================
// 会议日程构建器 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 数据质量问题不走错误通道，记入预览报告
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0} (expected .xlsx/.xlsm/.xls/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse Excel workbook: {0}")]
    ExcelParseError(String),

    #[error("Failed to parse CSV: {0}")]
    CsvParseError(String),

    // ===== 远程获取错误 =====
    #[error("Could not extract Google Sheet ID from URL.")]
    InvalidSheetUrl(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("Failed to download spreadsheet: {0}")]
    DownloadFailed(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid JSON document: {0}")]
    InvalidJson(String),

    // ===== 配置错误 =====
    #[error("Failed to read config (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("Invalid config value (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for ImportError {
    fn from(err: reqwest::Error) -> Self {
        ImportError::FetchFailed(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InvalidJson(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
