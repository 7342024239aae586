// ==========================================
// 会议日程构建器 - 工作表映射配置模型
// ==========================================
// 职责: 外部提交的 sheets 配置（每个源工作表一条）
// 说明: 配置由调用方提供，key 唯一性由调用方负责
// ==========================================

use crate::domain::types::{IdStrategy, SheetType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认主持人前缀正则
pub const DEFAULT_CHAIR_PREFIX_REGEX: &str = r"^\s*chair:?\s*";

// ==========================================
// ProgramOptions - 日程表专用选项
// ==========================================
// 部分提供时，缺失的键取默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramOptions {
    /// 报告人单元格以主持人前缀开头时，改记为主持人
    pub chair_from_speaker: bool,
    /// 主持人前缀正则（大小写不敏感，仅在开头匹配）
    pub chair_prefix_regex: String,
    /// 报告人拆分分隔符（None 表示保持单个字符串）
    pub split_speakers_by: Option<String>,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            chair_from_speaker: true,
            chair_prefix_regex: DEFAULT_CHAIR_PREFIX_REGEX.to_string(),
            split_speakers_by: None,
        }
    }
}

// ==========================================
// SheetMapping - 单个工作表的映射配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetMapping {
    /// 源工作表名（必须存在于已加载的工作簿）
    pub name: String,
    /// 输出分组键（如某一天）
    pub key: String,
    /// 合成行标识用的短标记
    pub slug: String,
    /// 展示用日期标签，仅透传
    #[serde(default)]
    pub date_label: Option<String>,
    #[serde(default)]
    pub sheet_type: SheetType,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    #[serde(default)]
    pub uid_column: Option<String>,
    /// 目标字段 → 源列名（None / 空串表示不映射）
    #[serde(default)]
    pub mapping: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub options: ProgramOptions,
}

impl SheetMapping {
    /// 通用表保留的字段：映射到非空源列的目标字段
    pub fn keep_fields(&self) -> Vec<String> {
        self.mapping
            .iter()
            .filter(|(_, source)| source.as_deref().map_or(false, |s| !s.is_empty()))
            .map(|(target, _)| target.clone())
            .collect()
    }
}

/// 一次预览/构建请求的完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub sheets: Vec<SheetMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_mapping_defaults() {
        let json = r#"{"name": "Day 1", "key": "oct_16", "slug": "d1"}"#;
        let sheet: SheetMapping = serde_json::from_str(json).unwrap();

        assert_eq!(sheet.sheet_type, SheetType::Program);
        assert_eq!(sheet.id_strategy, IdStrategy::SlugIndex);
        assert!(sheet.mapping.is_empty());
        assert!(sheet.options.chair_from_speaker);
        assert_eq!(sheet.options.chair_prefix_regex, DEFAULT_CHAIR_PREFIX_REGEX);
        assert_eq!(sheet.options.split_speakers_by, None);
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let json = r#"{
            "name": "Day 1", "key": "oct_16", "slug": "d1",
            "options": {"split_speakers_by": ";"}
        }"#;
        let sheet: SheetMapping = serde_json::from_str(json).unwrap();

        assert!(sheet.options.chair_from_speaker);
        assert_eq!(sheet.options.split_speakers_by, Some(";".to_string()));
    }

    #[test]
    fn test_keep_fields_skips_unmapped() {
        let json = r#"{
            "name": "Faculty", "key": "faculty", "slug": "fac", "sheet_type": "faculty",
            "mapping": {"name": "Nombre", "bio": "", "photo": null, "country": "País"}
        }"#;
        let sheet: SheetMapping = serde_json::from_str(json).unwrap();

        assert_eq!(sheet.keep_fields(), vec!["country".to_string(), "name".to_string()]);
    }
}
