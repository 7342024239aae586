// ==========================================
// 会议日程构建器 - 记录构建
// ==========================================
// 职责:
// - 按映射配置抽取并清洗列（apply_mapping）
// - 日程表: 主持人/报告人拆分、赞助商回退、行标识、空行丢弃
// - 通用表: 保留配置字段、行标识、空行丢弃
// ==========================================

use crate::domain::record::{GenericItemRecord, SessionRecord, SpeakerValue};
use crate::domain::sheet::{ProgramOptions, SheetMapping};
use crate::domain::table::SheetTable;
use crate::domain::types::{IdStrategy, SheetType, PROGRAM_FIELDS};
use crate::importer::column_resolver::resolve_column;
use crate::importer::data_cleaner::{clean_text, normalize_time, slugify};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// NormalizedTable - 映射后的表
// ==========================================
// 目标字段 → 每行清洗后的值；日程词表字段始终存在（默认空）
// mapped 只记录映射配置中出现过的目标字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    row_count: usize,
    fields: BTreeMap<String, Vec<String>>,
    mapped: BTreeSet<String>,
}

impl NormalizedTable {
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// 字段值；字段不存在或越界返回 ""
    pub fn value(&self, field: &str, row: usize) -> &str {
        self.fields
            .get(field)
            .and_then(|values| values.get(row))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 映射配置中的目标字段列；补齐的默认空列不算
    fn mapped_column(&self, field: &str) -> Option<&Vec<String>> {
        if !self.mapped.contains(field) {
            return None;
        }
        self.fields.get(field)
    }
}

/// 应用映射配置
///
/// 源列缺失或未配置的目标字段输出整列空值，不报错
pub fn apply_mapping<T: SheetTable + ?Sized>(
    table: &T,
    mapping: &BTreeMap<String, Option<String>>,
) -> NormalizedTable {
    let row_count = table.row_count();
    let mut fields = BTreeMap::new();

    for (target, source) in mapping {
        let values = match resolve_column(table, source.as_deref()) {
            Some(col) => cleaned_column(table, col),
            None => vec![String::new(); row_count],
        };
        fields.insert(target.clone(), values);
    }

    for field in PROGRAM_FIELDS {
        fields
            .entry(field.to_string())
            .or_insert_with(|| vec![String::new(); row_count]);
    }

    NormalizedTable {
        row_count,
        mapped: mapping.keys().cloned().collect(),
        fields,
    }
}

fn cleaned_column<T: SheetTable + ?Sized>(table: &T, col: usize) -> Vec<String> {
    (0..table.row_count())
        .map(|row| table.cell(row, col).map(clean_text).unwrap_or_default())
        .collect()
}

// ==========================================
// RowIdentity - 行标识分配
// ==========================================
// uid-column: 先在映射配置的目标字段中找 uid_column，再回退到源表列名
#[derive(Debug, Clone)]
pub struct RowIdentity {
    slug: String,
    uid_values: Option<Vec<String>>,
}

impl RowIdentity {
    pub fn new<T: SheetTable + ?Sized>(
        slug: &str,
        strategy: IdStrategy,
        uid_column: Option<&str>,
        normalized: &NormalizedTable,
        source: &T,
    ) -> Self {
        let uid_values = match (strategy, uid_column.filter(|c| !c.is_empty())) {
            (IdStrategy::UidColumn, Some(column)) => match normalized.mapped_column(column) {
                Some(values) => Some(values.clone()),
                None => resolve_column(source, Some(column)).map(|col| cleaned_column(source, col)),
            },
            _ => None,
        };

        Self {
            slug: slug.to_string(),
            uid_values,
        }
    }

    /// 纯 slug-index 标识
    pub fn slug_index(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            uid_values: None,
        }
    }

    /// 第 row 行（从 0 起）的标识
    pub fn id_for(&self, row: usize) -> String {
        self.uid_values
            .as_ref()
            .and_then(|values| values.get(row))
            .filter(|v| !v.is_empty())
            .map(|v| slugify(v))
            .unwrap_or_else(|| format!("{}-{}", self.slug, row))
    }
}

// ==========================================
// 日程表构建
// ==========================================

/// 编译主持人前缀正则（大小写不敏感）
///
/// # 返回
/// - Ok(None): 未启用 chair_from_speaker
/// - Err: 正则无效（调用方降级为不拆分并记警告）
pub fn compile_chair_prefix(options: &ProgramOptions) -> Result<Option<Regex>, regex::Error> {
    if !options.chair_from_speaker {
        return Ok(None);
    }
    RegexBuilder::new(&options.chair_prefix_regex)
        .case_insensitive(true)
        .build()
        .map(Some)
}

/// 拆分主持人与报告人
///
/// 报告人单元格以前缀开头时: 去掉前缀后的剩余部分作主持人，报告人清空
pub fn extract_chair_and_speaker(
    chair: &str,
    speaker: &str,
    chair_prefix: Option<&Regex>,
) -> (String, String) {
    if let Some(re) = chair_prefix {
        if !speaker.is_empty() {
            if let Some(m) = re.find(speaker).filter(|m| m.start() == 0) {
                return (speaker[m.end()..].trim().to_string(), String::new());
            }
        }
    }
    (chair.to_string(), speaker.to_string())
}

/// 按分隔符拆分报告人
pub fn split_speakers(speaker: &str, delimiter: Option<&str>) -> SpeakerValue {
    match delimiter.filter(|d| !d.is_empty()) {
        Some(delim) if !speaker.is_empty() => SpeakerValue::List(
            speaker
                .split(delim)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => SpeakerValue::Single(speaker.to_string()),
    }
}

/// 构建日程记录
///
/// # 参数
/// - normalized: apply_mapping 的输出
/// - identity: 行标识分配器
/// - options: 日程表选项
/// - label: 消息前缀（输出分组键）
/// - warnings: 追加时间无法识别 / 正则无效等警告
pub fn build_sessions(
    normalized: &NormalizedTable,
    identity: &RowIdentity,
    options: &ProgramOptions,
    label: &str,
    warnings: &mut Vec<String>,
) -> Vec<SessionRecord> {
    let chair_prefix = match compile_chair_prefix(options) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(key = label, "主持人前缀正则无效，跳过主持人拆分: {}", e);
            warnings.push(format!("[{}] Invalid chair_prefix_regex: {}", label, e));
            None
        }
    };

    let mut sessions = Vec::new();
    for row in 0..normalized.row_count() {
        let get = |field: &str| normalized.value(field, row).to_string();

        let (chair, speaker) = extract_chair_and_speaker(
            normalized.value("chair", row),
            normalized.value("speaker", row),
            chair_prefix.as_ref(),
        );

        let raw_time = normalized.value("time", row);
        let time = normalize_time(raw_time);
        if time.is_empty() && !raw_time.is_empty() {
            warnings.push(format!("[{}] Unrecognized time format: '{}'", label, raw_time));
        }

        let sponsor = [
            normalized.value("sponsor", row),
            normalized.value("sponsor_name", row),
            normalized.value("sponsored_by", row),
        ]
        .into_iter()
        .find(|v| !v.is_empty())
        .unwrap_or("")
        .to_string();

        let record = SessionRecord {
            id: identity.id_for(row),
            time,
            title: get("title"),
            speaker: split_speakers(&speaker, options.split_speakers_by.as_deref()),
            chair,
            track: get("track"),
            session_type: get("type"),
            room: get("room"),
            notes: get("notes"),
            sponsor,
            sponsor_name: get("sponsor_name"),
            sponsored_by: get("sponsored_by"),
            sponsor_id: get("sponsor_id"),
            sponsor_logo: get("sponsor_logo"),
        };

        if !record.is_blank() {
            sessions.push(record);
        }
    }

    tracing::debug!(key = label, rows = normalized.row_count(), kept = sessions.len(), "日程表构建完成");
    sessions
}

// ==========================================
// 通用表构建（讲者/赞助商/自定义）
// ==========================================

/// 构建通用条目
///
/// 仅保留 keep_fields；id 由标识策略生成，不从映射取值。
/// keep_fields（id 除外）全为空的行被丢弃。
pub fn build_generic_items(
    normalized: &NormalizedTable,
    keep_fields: &[String],
    identity: &RowIdentity,
) -> Vec<GenericItemRecord> {
    let mut items = Vec::new();
    for row in 0..normalized.row_count() {
        let fields: BTreeMap<String, String> = keep_fields
            .iter()
            .filter(|f| f.as_str() != "id")
            .map(|f| (f.clone(), normalized.value(f, row).to_string()))
            .collect();

        if fields.values().all(|v| v.trim().is_empty()) {
            continue;
        }

        items.push(GenericItemRecord {
            id: identity.id_for(row),
            fields,
        });
    }
    items
}

// ==========================================
// 按工作表类型分派
// ==========================================

/// 单个工作表的构建结果
#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutput {
    Sessions(Vec<SessionRecord>),
    Items(Vec<GenericItemRecord>),
}

impl SheetOutput {
    pub fn len(&self) -> usize {
        match self {
            SheetOutput::Sessions(v) => v.len(),
            SheetOutput::Items(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 映射 + 构建一个工作表
pub fn build_sheet<T: SheetTable + ?Sized>(
    table: &T,
    sheet: &SheetMapping,
    warnings: &mut Vec<String>,
) -> SheetOutput {
    let normalized = apply_mapping(table, &sheet.mapping);
    let identity = RowIdentity::new(
        &sheet.slug,
        sheet.id_strategy,
        sheet.uid_column.as_deref(),
        &normalized,
        table,
    );

    match &sheet.sheet_type {
        SheetType::Program => SheetOutput::Sessions(build_sessions(
            &normalized,
            &identity,
            &sheet.options,
            &sheet.key,
            warnings,
        )),
        SheetType::Faculty | SheetType::Sponsors | SheetType::Custom(_) => {
            SheetOutput::Items(build_generic_items(&normalized, &sheet.keep_fields(), &identity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sheet::DEFAULT_CHAIR_PREFIX_REGEX;
    use crate::domain::table::Table;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(t, s)| (t.to_string(), Some(s.to_string())))
            .collect()
    }

    #[test]
    fn test_apply_mapping_defaults_program_fields() {
        let table = Table::from_strings(&["Hora", "Tema"], &[vec![" 9:00 ", "Opening"]]);
        let normalized = apply_mapping(&table, &mapping(&[("time", "Hora"), ("title", "Missing")]));

        assert_eq!(normalized.value("time", 0), "9:00");
        assert_eq!(normalized.value("title", 0), "");
        for field in PROGRAM_FIELDS {
            assert!(normalized.has_field(field));
        }
    }

    #[test]
    fn test_chair_from_speaker() {
        let options = ProgramOptions::default();
        let re = compile_chair_prefix(&options).unwrap();
        let (chair, speaker) = extract_chair_and_speaker("", "Chair: Dr. Jane Doe", re.as_ref());

        assert_eq!(options.chair_prefix_regex, DEFAULT_CHAIR_PREFIX_REGEX);
        assert_eq!(chair, "Dr. Jane Doe");
        assert_eq!(speaker, "");
    }

    #[test]
    fn test_chair_prefix_must_match_at_start() {
        let re = RegexBuilder::new("chair:?\\s*")
            .case_insensitive(true)
            .build()
            .unwrap();
        let (chair, speaker) = extract_chair_and_speaker("Existing", "Vice Chair Ana", Some(&re));

        assert_eq!(chair, "Existing");
        assert_eq!(speaker, "Vice Chair Ana");
    }

    #[test]
    fn test_chair_from_speaker_disabled() {
        let options = ProgramOptions {
            chair_from_speaker: false,
            ..Default::default()
        };
        assert!(compile_chair_prefix(&options).unwrap().is_none());
    }

    #[test]
    fn test_split_speakers() {
        assert_eq!(
            split_speakers("Ana; Luis ;; ", Some(";")),
            SpeakerValue::List(vec!["Ana".to_string(), "Luis".to_string()])
        );
        assert_eq!(split_speakers("", Some(";")), SpeakerValue::Single(String::new()));
        assert_eq!(split_speakers("Ana; Luis", None), SpeakerValue::Single("Ana; Luis".to_string()));
        assert_eq!(split_speakers("Ana", Some("")), SpeakerValue::Single("Ana".to_string()));
    }

    #[test]
    fn test_row_identity_uid_column_fallback() {
        let table = Table::from_strings(&["Code", "Tema"], &[vec!["S 01", "A"], vec!["", "B"]]);
        let normalized = apply_mapping(&table, &mapping(&[("title", "Tema")]));
        let identity = RowIdentity::new("d1", IdStrategy::UidColumn, Some("Code"), &normalized, &table);

        assert_eq!(identity.id_for(0), "s-01");
        assert_eq!(identity.id_for(1), "d1-1");
    }

    #[test]
    fn test_row_identity_prefers_mapped_field_over_source_column() {
        let table = Table::from_strings(
            &["Title", "notes", "Ref"],
            &[vec!["S1", "n-a", "R1"], vec!["S2", "n-b", "R2"]],
        );
        let normalized = apply_mapping(&table, &mapping(&[("title", "Title"), ("notes", "Ref")]));
        let identity = RowIdentity::new("d", IdStrategy::UidColumn, Some("notes"), &normalized, &table);

        assert_eq!(identity.id_for(0), "r1");
        assert_eq!(identity.id_for(1), "r2");
    }

    #[test]
    fn test_row_identity_unmapped_program_field_uses_source_column() {
        let table = Table::from_strings(&["Title", "notes"], &[vec!["S1", "A 1"], vec!["S2", "B 2"]]);
        let normalized = apply_mapping(&table, &mapping(&[("title", "Title")]));
        let identity = RowIdentity::new("d", IdStrategy::UidColumn, Some("notes"), &normalized, &table);

        assert_eq!(identity.id_for(0), "a-1");
        assert_eq!(identity.id_for(1), "b-2");
    }

    #[test]
    fn test_row_identity_missing_uid_column() {
        let table = Table::from_strings(&["Tema"], &[vec!["A"]]);
        let normalized = apply_mapping(&table, &mapping(&[("title", "Tema")]));
        let identity = RowIdentity::new("d1", IdStrategy::UidColumn, Some("Nope"), &normalized, &table);

        assert_eq!(identity.id_for(0), "d1-0");
    }

    #[test]
    fn test_build_sessions_drops_blank_rows_and_keeps_ordinals() {
        let table = Table::from_strings(
            &["Hora", "Tema", "Ponente"],
            &[
                vec!["9:00", "Opening", "Ana"],
                vec!["", "", ""],
                vec!["10-30", "Talk", "Chair: Luis"],
            ],
        );
        let normalized = apply_mapping(
            &table,
            &mapping(&[("time", "Hora"), ("title", "Tema"), ("speaker", "Ponente")]),
        );
        let mut warnings = Vec::new();
        let sessions = build_sessions(
            &normalized,
            &RowIdentity::slug_index("d1"),
            &ProgramOptions::default(),
            "oct_16",
            &mut warnings,
        );

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "d1-0");
        assert_eq!(sessions[0].time, "09:00");
        assert_eq!(sessions[1].id, "d1-2");
        assert_eq!(sessions[1].time, "10:30");
        assert_eq!(sessions[1].chair, "Luis");
        assert_eq!(sessions[1].speaker, SpeakerValue::Single(String::new()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_sessions_sponsor_fallback_priority() {
        let table = Table::from_strings(
            &["Tema", "Sponsor Name", "Sponsored By"],
            &[vec!["A", "", "Initech"], vec!["B", "Globex", "Initech"]],
        );
        let normalized = apply_mapping(
            &table,
            &mapping(&[
                ("title", "Tema"),
                ("sponsor_name", "Sponsor Name"),
                ("sponsored_by", "Sponsored By"),
            ]),
        );
        let mut warnings = Vec::new();
        let sessions = build_sessions(
            &normalized,
            &RowIdentity::slug_index("d1"),
            &ProgramOptions::default(),
            "d1",
            &mut warnings,
        );

        assert_eq!(sessions[0].sponsor, "Initech");
        assert_eq!(sessions[1].sponsor, "Globex");
    }

    #[test]
    fn test_build_sessions_warns_on_unparseable_time() {
        let table = Table::from_strings(&["Hora", "Tema"], &[vec!["lunch", "Lunch break"]]);
        let normalized = apply_mapping(&table, &mapping(&[("time", "Hora"), ("title", "Tema")]));
        let mut warnings = Vec::new();
        let sessions = build_sessions(
            &normalized,
            &RowIdentity::slug_index("d1"),
            &ProgramOptions::default(),
            "oct_16",
            &mut warnings,
        );

        assert_eq!(sessions[0].time, "");
        assert_eq!(warnings, vec!["[oct_16] Unrecognized time format: 'lunch'".to_string()]);
    }

    #[test]
    fn test_build_sessions_invalid_chair_regex_degrades() {
        let table = Table::from_strings(&["Ponente"], &[vec!["Chair: Ana"]]);
        let normalized = apply_mapping(&table, &mapping(&[("speaker", "Ponente")]));
        let options = ProgramOptions {
            chair_prefix_regex: "(unclosed".to_string(),
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let sessions = build_sessions(&normalized, &RowIdentity::slug_index("d1"), &options, "d1", &mut warnings);

        assert_eq!(sessions[0].speaker, SpeakerValue::Single("Chair: Ana".to_string()));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("[d1] Invalid chair_prefix_regex"));
    }

    #[test]
    fn test_build_generic_items_keeps_configured_fields() {
        let table = Table::from_strings(
            &["Nombre", "País", "Notas"],
            &[vec!["Ana", "MX", "x"], vec!["", "", "only notes"]],
        );
        let normalized = apply_mapping(&table, &mapping(&[("name", "Nombre"), ("country", "País")]));
        let keep = vec!["name".to_string(), "country".to_string()];
        let items = build_generic_items(&normalized, &keep, &RowIdentity::slug_index("fac"));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "fac-0");
        assert_eq!(items[0].get("name"), "Ana");
        assert_eq!(items[0].fields.len(), 2);
    }
}
