// ==========================================
// 会议日程构建器 - 输出记录模型
// ==========================================
// 职责: 日程记录 / 通用条目 / 输出文档 / 预览响应
// 说明: 输出文档每次请求全量重建，不跨请求局部修改
// ==========================================

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SpeakerValue - 报告人（字符串或拆分后的列表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeakerValue {
    Single(String),
    List(Vec<String>),
}

impl SpeakerValue {
    pub fn is_empty(&self) -> bool {
        match self {
            SpeakerValue::Single(s) => s.trim().is_empty(),
            SpeakerValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }
}

impl Default for SpeakerValue {
    fn default() -> Self {
        SpeakerValue::Single(String::new())
    }
}

// ==========================================
// SessionRecord - 日程记录
// ==========================================
// 缺失的源列一律输出空串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    /// HH:MM 或 HH:MM - HH:MM 或空
    pub time: String,
    pub title: String,
    pub speaker: SpeakerValue,
    pub chair: String,
    pub track: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub room: String,
    pub notes: String,
    pub sponsor: String,
    pub sponsor_name: String,
    pub sponsored_by: String,
    pub sponsor_id: String,
    pub sponsor_logo: String,
}

impl SessionRecord {
    /// 语义字段全部为空（装饰行/空行）
    ///
    /// sponsor_name / sponsored_by 为原始列，不参与判断
    pub fn is_blank(&self) -> bool {
        [
            &self.time,
            &self.title,
            &self.chair,
            &self.track,
            &self.session_type,
            &self.room,
            &self.notes,
            &self.sponsor,
            &self.sponsor_id,
            &self.sponsor_logo,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
            && self.speaker.is_empty()
    }
}

// ==========================================
// GenericItemRecord - 讲者/赞助商/自定义条目
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericItemRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl GenericItemRecord {
    /// 字段值；未保留的字段返回空串
    pub fn get(&self, field: &str) -> &str {
        if field == "id" {
            return &self.id;
        }
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn has_field(&self, field: &str) -> bool {
        field == "id" || self.fields.contains_key(field)
    }
}

// ==========================================
// OutputDocument - 输出文档
// ==========================================
// 分组按配置顺序保存；序列化时日程分组在前，其余分组在后
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputDocument {
    program_groups: Vec<(String, Vec<SessionRecord>)>,
    item_groups: Vec<(String, Vec<GenericItemRecord>)>,
}

impl OutputDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入日程分组；key 已存在时原位替换并返回 true
    pub fn insert_sessions(&mut self, key: &str, sessions: Vec<SessionRecord>) -> bool {
        let removed_item = self.remove_item_group(key);
        if let Some(slot) = self.program_groups.iter_mut().find(|(k, _)| k == key) {
            slot.1 = sessions;
            return true;
        }
        self.program_groups.push((key.to_string(), sessions));
        removed_item
    }

    /// 写入通用分组；key 已存在时原位替换并返回 true
    pub fn insert_items(&mut self, key: &str, items: Vec<GenericItemRecord>) -> bool {
        let removed_program = self.remove_program_group(key);
        if let Some(slot) = self.item_groups.iter_mut().find(|(k, _)| k == key) {
            slot.1 = items;
            return true;
        }
        self.item_groups.push((key.to_string(), items));
        removed_program
    }

    fn remove_item_group(&mut self, key: &str) -> bool {
        let before = self.item_groups.len();
        self.item_groups.retain(|(k, _)| k != key);
        before != self.item_groups.len()
    }

    fn remove_program_group(&mut self, key: &str) -> bool {
        let before = self.program_groups.len();
        self.program_groups.retain(|(k, _)| k != key);
        before != self.program_groups.len()
    }

    pub fn sessions(&self, key: &str) -> Option<&[SessionRecord]> {
        self.program_groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn items(&self, key: &str) -> Option<&[GenericItemRecord]> {
        self.item_groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn program_groups(&self) -> &[(String, Vec<SessionRecord>)] {
        &self.program_groups
    }

    pub fn item_groups(&self) -> &[(String, Vec<GenericItemRecord>)] {
        &self.item_groups
    }

    /// 可变日程分组 + 只读通用分组（赞助商关联使用）
    pub fn split_mut(
        &mut self,
    ) -> (
        &mut [(String, Vec<SessionRecord>)],
        &[(String, Vec<GenericItemRecord>)],
    ) {
        (&mut self.program_groups, &self.item_groups)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.program_groups
            .iter()
            .map(|(k, _)| k.as_str())
            .chain(self.item_groups.iter().map(|(k, _)| k.as_str()))
    }

    pub fn len(&self) -> usize {
        self.program_groups.len() + self.item_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for OutputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, sessions) in &self.program_groups {
            map.serialize_entry(key, sessions)?;
        }
        for (key, items) in &self.item_groups {
            map.serialize_entry(key, items)?;
        }
        map.end()
    }
}

// ==========================================
// PreviewResponse - 预览/构建结果
// ==========================================
// 消息格式统一为 "[分组键或标签] 描述"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewResponse {
    pub data: OutputDocument,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl PreviewResponse {
    /// errors 为空才允许导出；warnings 不阻断
    pub fn is_exportable(&self) -> bool {
        self.errors.is_empty()
    }
}

// ==========================================
// SheetInfo - 工作表概览（列名 + 映射猜测）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInfo {
    pub name: String,
    pub columns: Vec<String>,
    /// 日程字段猜测
    pub guess: BTreeMap<String, String>,
    /// 讲者/赞助商字段猜测（按工作表类型）
    pub guesses: BTreeMap<String, BTreeMap<String, String>>,
}

/// 加载/列出工作簿的响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetListing {
    pub sheets: Vec<SheetInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,
}
