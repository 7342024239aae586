// ==========================================
// 会议日程构建器 - 导入层
// ==========================================
// 职责: 工作簿读取、列映射、记录构建、数据质量校验
// 支持: Excel, CSV, Google Sheets 导出
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod file_parser;
pub mod record_builder;
pub mod remote_fetch;

// 重导出核心类型
pub use column_resolver::{guess_by_type, guess_columns, guess_columns_with, resolve_column};
pub use data_cleaner::{clean_str, clean_text, normalize_time, slugify};
pub use dq_validator::{DqReport, DqValidator, RosterKind};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser, WorkbookParser};
pub use record_builder::{
    apply_mapping, build_generic_items, build_sessions, build_sheet, NormalizedTable, RowIdentity,
    SheetOutput,
};
pub use remote_fetch::{parse_sheet_id, RemoteFetcher};
