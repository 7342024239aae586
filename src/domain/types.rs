// ==========================================
// 会议日程构建器 - 领域类型定义
// ==========================================
// 职责: 工作表类型 / 标识策略 两个类型标签
// 红线: 未识别的工作表类型是合法的自定义类型，不是错误
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工作表类型 (Sheet Type)
// ==========================================
// program: 日程表（会场/时间/报告人）
// faculty: 讲者名册
// sponsors: 赞助商名册
// Custom: 其它任意取值，按通用字段透传处理
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SheetType {
    Program,
    Faculty,
    Sponsors,
    Custom(String),
}

impl SheetType {
    /// 工作表无输出时给出的提示
    pub fn empty_output_hint(&self) -> &'static str {
        match self {
            SheetType::Program => {
                "No program rows produced; check mapping for time/title/speaker/..."
            }
            SheetType::Faculty => {
                "No faculty rows produced; check mapping (e.g., name, bio, photo)."
            }
            SheetType::Sponsors => {
                "No sponsor rows produced; check mapping (e.g., name, logo, url)."
            }
            SheetType::Custom(_) => "No rows produced for custom type; check mapping.",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SheetType::Program => "program",
            SheetType::Faculty => "faculty",
            SheetType::Sponsors => "sponsors",
            SheetType::Custom(tag) => tag.as_str(),
        }
    }
}

impl Default for SheetType {
    fn default() -> Self {
        SheetType::Program
    }
}

impl From<String> for SheetType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "program" => SheetType::Program,
            "faculty" => SheetType::Faculty,
            "sponsors" => SheetType::Sponsors,
            _ => SheetType::Custom(value),
        }
    }
}

impl From<SheetType> for String {
    fn from(value: SheetType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 行标识策略 (Id Strategy)
// ==========================================
// slug-index: {slug}-{行序号}
// uid-column: slugify(指定列的值)，该行值为空时回退到 slug-index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdStrategy {
    SlugIndex,
    UidColumn,
}

impl Default for IdStrategy {
    fn default() -> Self {
        IdStrategy::SlugIndex
    }
}

// 非 uid-column 的任何取值都按 slug-index 处理
impl From<String> for IdStrategy {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "uid-column" => IdStrategy::UidColumn,
            _ => IdStrategy::SlugIndex,
        }
    }
}

impl From<IdStrategy> for String {
    fn from(value: IdStrategy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::SlugIndex => write!(f, "slug-index"),
            IdStrategy::UidColumn => write!(f, "uid-column"),
        }
    }
}

// ==========================================
// 字段词表
// ==========================================

/// 日程表输出字段（顺序即 JSON 输出顺序）
pub const PROGRAM_FIELDS: &[&str] = &[
    "time",
    "title",
    "speaker",
    "chair",
    "track",
    "type",
    "room",
    "notes",
    "sponsor",
    "sponsor_name",
    "sponsored_by",
    "sponsor_id",
    "sponsor_logo",
];
