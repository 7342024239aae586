// ==========================================
// 会议日程构建器 - 配置层
// ==========================================
// 职责: 运行时配置（多级覆写）与构建配置加载
// ==========================================

pub mod build_config;
pub mod config_manager;

// 重导出核心配置管理器
pub use build_config::{load_build_config, parse_build_config};
pub use config_manager::{config_keys, ConfigManager};
