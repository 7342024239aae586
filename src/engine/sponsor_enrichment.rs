// ==========================================
// 会议日程构建器 - 赞助商 Logo 关联
// ==========================================
// 职责: 为缺少 sponsor_logo 的日程记录补全 Logo
// 规则:
// - 第一个首条记录带 logo/logo_url/image 字段的非日程分组视为赞助商表
// - 已有 sponsor_logo 的记录不覆盖
// - 先按 sponsor_id 匹配，再按赞助商名称匹配（均忽略大小写）
// - 无匹配保持为空，不报错
// ==========================================

use crate::domain::record::{GenericItemRecord, OutputDocument, SessionRecord};
use std::collections::HashMap;

/// Logo 字段候选（按优先级）
pub const LOGO_FIELDS: &[&str] = &["logo", "logo_url", "image"];

/// 赞助商索引（键均为小写）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorIndex {
    pub by_id: HashMap<String, String>,
    pub by_name: HashMap<String, String>,
}

impl SponsorIndex {
    pub fn logo_by_id(&self, sponsor_id: &str) -> Option<&str> {
        lookup(&self.by_id, sponsor_id)
    }

    pub fn logo_by_name(&self, name: &str) -> Option<&str> {
        lookup(&self.by_name, name)
    }
}

fn lookup<'a>(map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    map.get(&key).map(String::as_str)
}

fn first_non_empty<'a>(values: &[&'a str]) -> &'a str {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// 从非日程分组构建赞助商索引
///
/// # 返回
/// - Some(SponsorIndex): 找到赞助商表
/// - None: 无合格分组，关联为空操作
pub fn build_sponsor_index(groups: &[(String, Vec<GenericItemRecord>)]) -> Option<SponsorIndex> {
    let (key, sponsors) = groups.iter().find(|(_, items)| {
        items
            .first()
            .map_or(false, |first| LOGO_FIELDS.iter().any(|f| first.has_field(f)))
    })?;

    let mut index = SponsorIndex::default();
    for sponsor in sponsors {
        let name = sponsor.get("name").trim().to_lowercase();
        let id_or_name = first_non_empty(&[&sponsor.id, sponsor.get("name")]).to_lowercase();
        let logo = first_non_empty(&LOGO_FIELDS.iter().map(|f| sponsor.get(f)).collect::<Vec<_>>())
            .to_string();

        if !id_or_name.is_empty() {
            index.by_id.insert(id_or_name, logo.clone());
        }
        if !name.is_empty() {
            index.by_name.insert(name, logo);
        }
    }

    tracing::debug!(group = %key, sponsors = sponsors.len(), "赞助商索引已建立");
    Some(index)
}

/// 为日程记录补全 sponsor_logo
///
/// # 返回
/// - 被补全的记录数
pub fn enrich_sessions(groups: &mut [(String, Vec<SessionRecord>)], index: &SponsorIndex) -> usize {
    let mut enriched = 0;

    for (_, sessions) in groups.iter_mut() {
        for session in sessions.iter_mut() {
            if !session.sponsor_logo.trim().is_empty() {
                continue;
            }

            let by_id = index.logo_by_id(&session.sponsor_id);
            let found = match by_id {
                Some(logo) => Some(logo),
                None => index.logo_by_name(first_non_empty(&[
                    &session.sponsor,
                    &session.sponsored_by,
                    &session.sponsor_name,
                ])),
            };

            if let Some(logo) = found {
                session.sponsor_logo = logo.to_string();
                if !logo.is_empty() {
                    enriched += 1;
                }
            }
        }
    }

    enriched
}

/// 对整个输出文档执行关联
pub fn enrich_document(document: &mut OutputDocument) -> usize {
    let (program_groups, item_groups) = document.split_mut();
    match build_sponsor_index(item_groups) {
        Some(index) => {
            let enriched = enrich_sessions(program_groups, &index);
            tracing::info!(enriched, "赞助商 Logo 关联完成");
            enriched
        }
        None => 0,
    }
}
