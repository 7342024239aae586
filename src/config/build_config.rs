// ==========================================
// 会议日程构建器 - 构建配置加载
// ==========================================
// 格式: {"sheets": [SheetMapping, ...]}
// ==========================================

use crate::domain::sheet::BuildConfig;
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

/// 解析构建配置 JSON
pub fn parse_build_config(raw: &str) -> ImportResult<BuildConfig> {
    Ok(serde_json::from_str(raw)?)
}

/// 从文件加载构建配置
pub fn load_build_config(path: &Path) -> ImportResult<BuildConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
        key: path.display().to_string(),
        message: e.to_string(),
    })?;

    let config = parse_build_config(&raw)?;
    tracing::debug!(path = %path.display(), sheets = config.sheets.len(), "构建配置已加载");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{IdStrategy, SheetType};

    #[test]
    fn test_parse_build_config() {
        let raw = r#"{"sheets": [
            {"name": "Day 1", "key": "oct_16", "slug": "d1", "date_label": "Oct 16",
             "mapping": {"time": "Hora", "title": "Tema"}},
            {"name": "Sponsors", "key": "sponsors", "slug": "sp", "sheet_type": "sponsors",
             "id_strategy": "uid-column", "uid_column": "Code"}
        ]}"#;
        let config = parse_build_config(raw).unwrap();

        assert_eq!(config.sheets.len(), 2);
        assert_eq!(config.sheets[0].date_label.as_deref(), Some("Oct 16"));
        assert_eq!(config.sheets[1].sheet_type, SheetType::Sponsors);
        assert_eq!(config.sheets[1].id_strategy, IdStrategy::UidColumn);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_build_config("{\"sheets\": 3}"),
            Err(ImportError::InvalidJson(_))
        ));
    }
}
