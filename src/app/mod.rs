// ==========================================
// 会议日程构建器 - 应用层
// ==========================================
// 职责: 会话状态（当前工作簿）
// ==========================================

pub mod state;

// 重导出
pub use state::WorkbookSession;
