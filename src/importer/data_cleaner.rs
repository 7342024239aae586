// ==========================================
// 会议日程构建器 - 文本/时间清洗
// ==========================================
// 职责: 单元格 → 文本 / 宽松时间串 → HH:MM / slug 生成
// 红线: 无法识别的时间降级为空串，由调用方记警告，从不报错
// ==========================================

use crate::domain::table::CellValue;
use chrono::{Datelike, NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

// 已是 H:MM / HH:MM
static RE_PLAIN_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").expect("valid plain time regex"));
// 时-分 片段，分隔符 : . - h
static RE_TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})\s*[:.\-h]\s*([0-9]{2})").expect("valid time token regex")
});
// 无分隔符 HMM / HHMM
static RE_BARE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})([0-9]{2})$").expect("valid bare time regex"));
static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// 单元格转文本
///
/// - 空单元格 / NaN → ""
/// - 其余取字符串形式并去除首尾空白
/// - 整数值的浮点数不带小数部分（1200.0 → "1200"）
/// - 仅含时间的 Excel 日期（1899-12-31 基准）输出 HH:MM
pub fn clean_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => clean_str(s),
        CellValue::Number(n) => {
            if !n.is_finite() {
                String::new()
            } else if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        CellValue::Bool(b) => b.to_string(),
        CellValue::DateTime(dt) => {
            if dt.year() < 1900 {
                format!("{:02}:{:02}", dt.hour(), dt.minute())
            } else if dt.time() == NaiveTime::MIN {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M").to_string()
            }
        }
    }
}

/// 字符串清洗：去首尾空白，"nan" 视为空
pub fn clean_str(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// 宽松时间串 → "HH:MM" 或 "HH:MM - HH:MM"
///
/// # 规则
/// 1. 空串 → ""
/// 2. 全角/长破折号替换为 "-"
/// 3. 已是 H:MM / HH:MM → 补零后返回
/// 4. 最多取前两个 "时 分隔符 分" 片段（分隔符 : . - h）
/// 5. 无片段时尝试 HMM / HHMM
/// 6. 仍无法识别 → ""
///
/// # 示例
/// - "11-30" → "11:30"
/// - "14:50: 15:10" → "14:50 - 15:10"
/// - "lunch" → ""
pub fn normalize_time(raw: &str) -> String {
    let s = clean_str(raw);
    if s.is_empty() {
        return String::new();
    }
    let s = s.replace(['\u{2013}', '\u{2014}'], "-");

    if let Some(caps) = RE_PLAIN_TIME.captures(&s) {
        return format_hm(&caps[1], &caps[2]);
    }

    let tokens: Vec<String> = RE_TIME_TOKEN
        .captures_iter(&s)
        .take(2)
        .map(|caps| format_hm(&caps[1], &caps[2]))
        .collect();

    match tokens.as_slice() {
        [] => RE_BARE_TIME
            .captures(&s)
            .map(|caps| format_hm(&caps[1], &caps[2]))
            .unwrap_or_default(),
        [single] => single.clone(),
        [start, end, ..] => format!("{} - {}", start, end),
    }
}

fn format_hm(hour: &str, minute: &str) -> String {
    // 正则只放行 1-2 位 ASCII 数字
    let hour: u32 = hour.parse().unwrap_or(0);
    format!("{:02}:{}", hour, minute)
}

/// 生成 slug：小写，非字母数字连续段替换为单个 "-"，去除首尾 "-"
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    RE_NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_clean_text_basic() {
        assert_eq!(clean_text(&CellValue::from("  hello  ")), "hello");
        assert_eq!(clean_text(&CellValue::Empty), "");
        assert_eq!(clean_text(&CellValue::from("NaN")), "");
        assert_eq!(clean_text(&CellValue::Number(f64::NAN)), "");
    }

    #[test]
    fn test_clean_text_numbers() {
        assert_eq!(clean_text(&CellValue::Number(1200.0)), "1200");
        assert_eq!(clean_text(&CellValue::Number(9.5)), "9.5");
        assert_eq!(clean_text(&CellValue::Bool(true)), "true");
    }

    #[test]
    fn test_clean_text_excel_time_only() {
        let dt = NaiveDateTime::parse_from_str("1899-12-31 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(clean_text(&CellValue::DateTime(dt)), "09:30");

        let dt = NaiveDateTime::parse_from_str("2025-10-16 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(clean_text(&CellValue::DateTime(dt)), "2025-10-16");
    }

    #[test]
    fn test_clean_text_idempotent() {
        for raw in ["  a b  ", "nan", "", "\tTalk\n", " NAN "] {
            let once = clean_text(&CellValue::from(raw));
            let twice = clean_text(&CellValue::from(once.as_str()));
            assert_eq!(once, twice);
            assert_eq!(once.trim(), once);
            assert!(!once.eq_ignore_ascii_case("nan"));
        }
    }

    #[test]
    fn test_normalize_time_examples() {
        assert_eq!(normalize_time("11-30"), "11:30");
        assert_eq!(normalize_time("14:50: 15:10"), "14:50 - 15:10");
        assert_eq!(normalize_time(""), "");
        assert_eq!(normalize_time("lunch"), "");
    }

    #[test]
    fn test_normalize_time_variants() {
        assert_eq!(normalize_time("9:05"), "09:05");
        assert_eq!(normalize_time("9h30"), "09:30");
        assert_eq!(normalize_time("9.30 – 10.15"), "09:30 - 10:15");
        assert_eq!(normalize_time("08:00 — 08:30 — 09:00"), "08:00 - 08:30");
        assert_eq!(normalize_time("930"), "09:30");
        assert_eq!(normalize_time("1415"), "14:15");
        assert_eq!(normalize_time("14:30:00"), "14:30");
        assert_eq!(normalize_time("12345"), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Hello, World!  "), "hello-world");
        assert_eq!(slugify("SP-01"), "sp-01");
        assert_eq!(slugify("--a__b--"), "a-b");
        assert_eq!(slugify("Café Olé"), "caf-ol");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_output_alphabet() {
        for raw in ["Día 1 / Sala A", "  --x--  ", "ÅÄÖ 42", "a\u{2014}b", "Track #3 (main)"] {
            let slug = slugify(raw);
            assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
    }
}
