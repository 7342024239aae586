// ==========================================
// 会议日程构建器 - 列解析 / 列名猜测
// ==========================================
// 职责:
// - 配置列名 → 实际列（精确匹配，其次忽略首尾空白）
// - 按关键字候选表猜测字段映射（英文 + 西班牙文同义词）
// 说明: 猜测结果仅用于预填，不具权威性
// ==========================================

use crate::domain::table::SheetTable;
use crate::domain::types::SheetType;
use std::collections::{BTreeMap, HashMap};

/// 字段 → 候选列名（按优先级）
pub type CandidateTable = &'static [(&'static str, &'static [&'static str])];

// ==========================================
// 候选关键字表
// ==========================================

pub const PROGRAM_CANDIDATES: CandidateTable = &[
    ("time", &["hora", "horario", "time", "schedule", "start", "start time", "inicio"]),
    ("title", &["tema", "título", "titulo", "title", "subject", "session", "topic"]),
    ("speaker", &["ponente", "speaker", "presenter", "author", "speakers"]),
    ("chair", &["chair", "moderator", "chairperson", "moderador"]),
    ("track", &["track", "room", "salon", "salón", "track/room"]),
    ("type", &["type", "session type", "category", "categoría"]),
    ("room", &["room", "salon", "salón"]),
    ("notes", &["notes", "note", "remarks", "comentarios", "notas"]),
    (
        "sponsor",
        &["sponsor", "patrocinador", "sponsored by", "sponsored_by", "sponsor name", "sponsor_name"],
    ),
    ("sponsor_name", &["sponsor name", "sponsor_name", "patrocinador"]),
    ("sponsored_by", &["sponsored by", "sponsored_by", "patrocinador"]),
    (
        "sponsor_id",
        &["sponsor id", "sponsor_id", "id patrocinador", "id sponsor", "sponsor code", "sponsor_code"],
    ),
    (
        "sponsor_logo",
        &["sponsor logo", "sponsor_logo", "logo sponsor", "logo patrocinador", "logo"],
    ),
];

pub const FACULTY_CANDIDATES: CandidateTable = &[
    ("name", &["name", "full name", "nombre", "nombre completo", "speaker", "ponente"]),
    ("role", &["role", "position", "title", "cargo", "puesto", "rol"]),
    ("institution", &["institution", "affiliation", "organization", "institución", "institucion", "afiliación"]),
    ("country", &["country", "país", "pais", "nationality"]),
    ("bio", &["bio", "biography", "about", "biografía", "biografia", "semblanza"]),
    ("photo", &["photo", "picture", "image", "headshot", "foto", "imagen"]),
    ("website", &["website", "web", "url", "sitio web", "página", "pagina"]),
    ("email", &["email", "e-mail", "mail", "correo", "correo electrónico"]),
];

pub const SPONSOR_CANDIDATES: CandidateTable = &[
    ("id", &["id", "sponsor id", "sponsor_id", "code", "código", "codigo"]),
    ("name", &["name", "sponsor", "company", "nombre", "patrocinador", "empresa"]),
    ("level", &["level", "tier", "category", "nivel", "categoría", "categoria"]),
    ("logo", &["logo", "logo url", "logo_url", "image", "imagen"]),
    ("url", &["url", "website", "web", "link", "sitio web", "enlace"]),
    ("blurb", &["blurb", "description", "about", "descripción", "descripcion", "texto"]),
];

/// 工作表类型对应的候选表；自定义类型无猜测
pub fn candidates_for(sheet_type: &SheetType) -> CandidateTable {
    match sheet_type {
        SheetType::Program => PROGRAM_CANDIDATES,
        SheetType::Faculty => FACULTY_CANDIDATES,
        SheetType::Sponsors => SPONSOR_CANDIDATES,
        SheetType::Custom(_) => &[],
    }
}

/// 解析配置列名
///
/// # 返回
/// - Some(列序号): 精确匹配，或忽略首尾空白后匹配
/// - None: 未配置或不存在（调用方输出空值，不报错）
pub fn resolve_column<T: SheetTable + ?Sized>(table: &T, configured: Option<&str>) -> Option<usize> {
    let name = configured?;
    if name.is_empty() {
        return None;
    }
    if let Some(idx) = table.column_index(name) {
        return Some(idx);
    }
    let wanted = name.trim();
    table.column_names().iter().position(|c| c.trim() == wanted)
}

/// 按日程词表猜测列映射
pub fn guess_columns<T: SheetTable + ?Sized>(table: &T) -> BTreeMap<String, String> {
    guess_columns_with(table, PROGRAM_CANDIDATES)
}

/// 按指定候选表猜测列映射
///
/// 列名忽略大小写与首尾空白；每个字段取第一个命中的候选
pub fn guess_columns_with<T: SheetTable + ?Sized>(
    table: &T,
    candidates: CandidateTable,
) -> BTreeMap<String, String> {
    let lower_cols: HashMap<String, &String> = table
        .column_names()
        .iter()
        .map(|c| (c.trim().to_lowercase(), c))
        .collect();

    let mut mapping = BTreeMap::new();
    for (target, keywords) in candidates {
        if let Some(column) = keywords
            .iter()
            .find_map(|kw| lower_cols.get(&kw.to_lowercase()))
        {
            mapping.insert(target.to_string(), (*column).clone());
        }
    }
    mapping
}

/// 讲者/赞助商两套猜测，供工作表概览使用
pub fn guess_by_type<T: SheetTable + ?Sized>(table: &T) -> BTreeMap<String, BTreeMap<String, String>> {
    [SheetType::Faculty, SheetType::Sponsors]
        .into_iter()
        .map(|t| {
            let guess = guess_columns_with(table, candidates_for(&t));
            (t.to_string(), guess)
        })
        .collect()
}
