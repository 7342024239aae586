// ==========================================
// 会议日程构建器 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行（或 HTTP 层）调用
// ==========================================

pub mod error;
pub mod program_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use program_api::{BuildArtifact, ProgramApi};
