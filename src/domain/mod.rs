// ==========================================
// 会议日程构建器 - 领域模型层
// ==========================================
// 职责: 配置模型、表格抽象、输出记录
// 红线: 不含解析逻辑,不含网络访问
// ==========================================

pub mod record;
pub mod sheet;
pub mod table;
pub mod types;

// 重导出核心类型
pub use record::{
    GenericItemRecord, OutputDocument, PreviewResponse, SessionRecord, SheetInfo, SheetListing,
    SpeakerValue,
};
pub use sheet::{BuildConfig, ProgramOptions, SheetMapping, DEFAULT_CHAIR_PREFIX_REGEX};
pub use table::{CellValue, SheetTable, Table, Workbook};
pub use types::{IdStrategy, SheetType, PROGRAM_FIELDS};
