// ==========================================
// 会议日程构建器 - 核心库
// ==========================================
// 输入: Excel/CSV 工作簿或 Google 表格
// 输出: 按分组键组织的日程/讲者/赞助商 JSON + 数据质量报告
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型与配置模型
pub mod domain;

// 导入层 - 读取、映射、构建、校验
pub mod importer;

// 引擎层 - 赞助商关联与预览编排
pub mod engine;

// 配置层 - 运行时配置与构建配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 工作簿会话
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IdStrategy, SheetType};

// 领域实体
pub use domain::{
    BuildConfig, CellValue, GenericItemRecord, OutputDocument, PreviewResponse, ProgramOptions,
    SessionRecord, SheetInfo, SheetListing, SheetMapping, SpeakerValue, Table, Workbook,
};

// 引擎
pub use engine::{ProgramOrchestrator, SponsorIndex};

// API
pub use api::{ApiError, BuildArtifact, ProgramApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "program-builder";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
