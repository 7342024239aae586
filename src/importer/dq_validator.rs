// ==========================================
// 会议日程构建器 - 数据质量校验器
// ==========================================
// 职责: 对最终记录集做结构/一致性检查
// - 警告: 数据疑点，不阻断导出
// - 错误: 阻断导出
// 说明: 单遍、无状态、不修改输入；标识去重按分组进行
// ==========================================

use crate::domain::record::{GenericItemRecord, OutputDocument, SessionRecord};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// 规范时间格式: H:MM，可选 " - H:MM"
static RE_CANONICAL_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]{1,2}:[0-9]{2})(\s*-\s*([0-9]{1,2}:[0-9]{2}))?\s*$")
        .expect("valid canonical time regex")
});

/// 校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DqReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl DqReport {
    pub fn merge(&mut self, other: DqReport) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// 名册类型（按分组键前缀识别）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Faculty,
    Sponsors,
}

impl RosterKind {
    /// 分组键前缀（忽略大小写）: faculty* / sponsor*
    pub fn from_group_key(key: &str) -> Option<Self> {
        let lowered = key.to_lowercase();
        if lowered.starts_with("faculty") {
            Some(RosterKind::Faculty)
        } else if lowered.starts_with("sponsor") {
            Some(RosterKind::Sponsors)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DqValidator;

impl DqValidator {
    /// 校验全部日程分组
    pub fn validate_sessions(&self, groups: &[(String, Vec<SessionRecord>)]) -> DqReport {
        let mut report = DqReport::default();
        for (key, sessions) in groups {
            report.merge(self.validate_session_group(key, sessions));
        }
        report
    }

    /// 校验单个日程分组（一天）
    pub fn validate_session_group(&self, key: &str, sessions: &[SessionRecord]) -> DqReport {
        let mut report = DqReport::default();
        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();

        for session in sessions {
            let id = session.id.trim();
            if id.is_empty() {
                report.errors.push(format!("[{}] Missing id", key));
            } else if !seen_ids.insert(id) {
                report.errors.push(format!("[{}] Duplicate id: {}", key, id));
            }

            let time = session.time.trim();
            let title = session.title.trim();
            if !time.is_empty() && !title.is_empty() && !seen_pairs.insert((time, title)) {
                report
                    .warnings
                    .push(format!("[{}] Duplicate (time,title): {} | {}", key, time, title));
            }

            // 规范化后的时间复检
            if !time.is_empty() && !RE_CANONICAL_TIME.is_match(&time.replace('.', ":")) {
                report
                    .warnings
                    .push(format!("[{}] Unrecognized time format: '{}'", key, time));
            }

            if !session.chair.trim().is_empty() && title.is_empty() && session.speaker.is_empty() {
                report.warnings.push(format!(
                    "[{}] Row with Chair only (possible section header): id={}",
                    key, id
                ));
            }
        }

        report
    }

    /// 校验讲者名册
    pub fn validate_people(&self, key: &str, items: &[GenericItemRecord]) -> DqReport {
        self.validate_roster(key, items)
    }

    /// 校验赞助商名册
    pub fn validate_sponsors(&self, key: &str, items: &[GenericItemRecord]) -> DqReport {
        self.validate_roster(key, items)
    }

    // 标识缺失/重复、name 缺失均为错误
    fn validate_roster(&self, key: &str, items: &[GenericItemRecord]) -> DqReport {
        let mut report = DqReport::default();
        let mut seen_ids: HashSet<&str> = HashSet::new();

        for item in items {
            let id = item.id.trim();
            if id.is_empty() {
                report.errors.push(format!("[{}] Missing id", key));
            } else if !seen_ids.insert(id) {
                report.errors.push(format!("[{}] Duplicate id: {}", key, id));
            }

            if item.get("name").trim().is_empty() {
                let shown = if id.is_empty() { "(no id)" } else { id };
                report
                    .errors
                    .push(format!("[{}] Missing name for id={}", key, shown));
            }
        }

        report
    }

    /// 校验整个输出文档
    ///
    /// faculty* / sponsor* 以外的通用分组不校验
    pub fn validate_document(&self, document: &OutputDocument) -> DqReport {
        let mut report = self.validate_sessions(document.program_groups());

        for (key, items) in document.item_groups() {
            match RosterKind::from_group_key(key) {
                Some(RosterKind::Faculty) => report.merge(self.validate_people(key, items)),
                Some(RosterKind::Sponsors) => report.merge(self.validate_sponsors(key, items)),
                None => {}
            }
        }

        report
    }
}
