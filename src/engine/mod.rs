// ==========================================
// 会议日程构建器 - 引擎层
// ==========================================
// 职责: 跨工作表的处理（赞助商关联、预览编排）
// 红线: 引擎不做 IO，工作簿由调用方提供
// ==========================================

pub mod orchestrator;
pub mod sponsor_enrichment;

// 重导出核心引擎
pub use orchestrator::ProgramOrchestrator;
pub use sponsor_enrichment::{build_sponsor_index, enrich_document, enrich_sessions, SponsorIndex};
