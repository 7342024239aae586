// ==========================================
// 会议日程构建器 - 配置管理器
// ==========================================
// 职责: 运行时配置加载、查询、覆写管理
// 覆写顺序: 默认值 → JSON 配置文件 → PROGRAM_BUILDER_* 环境变量
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::remote_fetch::DEFAULT_EXPORT_URL_TEMPLATE;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PROGRAM_BUILDER_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 仅含默认值的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 按完整覆写顺序加载
    ///
    /// # 参数
    /// - settings_path: 可选的 JSON 配置文件
    pub fn load(settings_path: Option<&Path>) -> ImportResult<Self> {
        let mut manager = match settings_path {
            Some(path) => Self::from_file(path)?,
            None => Self::new(),
        };
        manager.apply_env_overrides();
        Ok(manager)
    }

    /// 从 JSON 配置文件加载（顶层为对象，值为字符串/数字/布尔）
    pub fn from_file(path: &Path) -> ImportResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;

        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
                key: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut manager = Self::new();
        for (key, value) in parsed {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => continue,
                other => other.to_string(),
            };
            manager.set(&key, text);
        }

        tracing::debug!(path = %path.display(), keys = manager.values.len(), "配置文件已加载");
        Ok(manager)
    }

    /// 应用 PROGRAM_BUILDER_* 环境变量覆写
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(std::env::vars());
    }

    /// 应用形如 PROGRAM_BUILDER_<KEY> 的覆写（仅识别已知配置键）
    pub fn apply_overrides_from<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = suffix.to_lowercase();
            if config_keys::ALL.contains(&key.as_str()) {
                tracing::debug!(key = %key, "环境变量覆写配置");
                self.set(&key, value);
            }
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(&str): 已覆写的值
    /// - None: 使用默认值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_config_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_config_value(key).unwrap_or(default)
    }

    fn get_seconds(&self, key: &str, default: u64) -> ImportResult<Duration> {
        let Some(raw) = self.get_config_value(key) else {
            return Ok(Duration::from_secs(default));
        };

        match raw.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(Duration::from_secs_f64(secs)),
            _ => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.to_string(),
                message: "expected a positive number of seconds".to_string(),
            }),
        }
    }

    // ===== 远程获取配置 =====

    /// 表格下载超时（默认 45 秒）
    pub fn download_timeout(&self) -> ImportResult<Duration> {
        self.get_seconds(config_keys::DOWNLOAD_TIMEOUT_SECS, 45)
    }

    /// 日程 JSON 代理超时（默认 30 秒）
    pub fn proxy_timeout(&self) -> ImportResult<Duration> {
        self.get_seconds(config_keys::PROXY_TIMEOUT_SECS, 30)
    }

    /// Google Sheets 导出地址模板（必须包含 {id}）
    pub fn export_url_template(&self) -> ImportResult<String> {
        let value =
            self.get_config_or_default(config_keys::EXPORT_URL_TEMPLATE, DEFAULT_EXPORT_URL_TEMPLATE);
        if !value.contains("{id}") {
            return Err(ImportError::ConfigValueError {
                key: config_keys::EXPORT_URL_TEMPLATE.to_string(),
                value: value.to_string(),
                message: "template must contain {id}".to_string(),
            });
        }
        Ok(value.to_string())
    }

    // ===== 输出配置 =====

    /// 导出文件名（默认 program.json）
    pub fn export_file_name(&self) -> ImportResult<String> {
        let value = self
            .get_config_or_default(config_keys::EXPORT_FILE_NAME, "program.json")
            .trim();
        if value.is_empty() {
            return Err(ImportError::ConfigValueError {
                key: config_keys::EXPORT_FILE_NAME.to_string(),
                value: value.to_string(),
                message: "file name must not be empty".to_string(),
            });
        }
        Ok(value.to_string())
    }

    /// 临时工作簿文件目录（默认系统临时目录）
    pub fn temp_dir(&self) -> PathBuf {
        match self.get_config_value(config_keys::TEMP_DIR) {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => std::env::temp_dir(),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 远程获取
    pub const DOWNLOAD_TIMEOUT_SECS: &str = "download_timeout_secs";
    pub const PROXY_TIMEOUT_SECS: &str = "proxy_timeout_secs";
    pub const EXPORT_URL_TEMPLATE: &str = "export_url_template";

    // 输出
    pub const EXPORT_FILE_NAME: &str = "export_file_name";

    // 工作簿临时文件
    pub const TEMP_DIR: &str = "temp_dir";

    pub const ALL: &[&str] = &[
        DOWNLOAD_TIMEOUT_SECS,
        PROXY_TIMEOUT_SECS,
        EXPORT_URL_TEMPLATE,
        EXPORT_FILE_NAME,
        TEMP_DIR,
    ];
}
