// ==========================================
// 预览/构建流程集成测试
// ==========================================
// 测试目标: 映射 → 构建 → 赞助商关联 → 校验 的完整流程
// ==========================================


use program_builder::domain::{BuildConfig, SheetType, SpeakerValue};
use program_builder::engine::ProgramOrchestrator;
use program_builder::logging;
use std::collections::HashSet;
use test_helpers::{program_sheet, table, typed_sheet, with_uid_column, workbook};

fn preview(
    wb: &program_builder::domain::Workbook,
    sheets: Vec<program_builder::domain::SheetMapping>,
) -> program_builder::domain::PreviewResponse {
    logging::init_test();
    ProgramOrchestrator::new().preview(wb, &BuildConfig { sheets })
}

#[test]
fn test_full_conference_workbook() {
    let wb = workbook(vec![
        (
            "Día 1",
            table(
                &["Hora", "Tema", "Ponente", "Patrocinador"],
                &[
                    &["9:00", "Apertura", "Chair: Dr. Jane Doe", ""],
                    &["", "", "", ""],
                    &["10.15-11.00", "Keynote", "Ana; Luis", "ACME"],
                ],
            ),
        ),
        (
            "Faculty",
            table(&["Nombre", "Bio"], &[&["Ana", "Cardióloga"], &["Luis", ""]]),
        ),
        (
            "Sponsors",
            table(&["Name", "Logo"], &[&["ACME", "https://cdn/acme.png"]]),
        ),
    ]);

    let mut day1 = program_sheet(
        "Día 1",
        "oct_16",
        "d1",
        &[("time", "Hora"), ("title", "Tema"), ("speaker", "Ponente"), ("sponsor", "Patrocinador")],
    );
    day1.options.split_speakers_by = Some(";".to_string());

    let resp = preview(
        &wb,
        vec![
            day1,
            typed_sheet("Faculty", "faculty", "fac", SheetType::Faculty, &[("name", "Nombre"), ("bio", "Bio")]),
            typed_sheet("Sponsors", "sponsors", "sp", SheetType::Sponsors, &[("name", "Name"), ("logo", "Logo")]),
        ],
    );

    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    assert!(resp.warnings.is_empty(), "unexpected warnings: {:?}", resp.warnings);

    let sessions = resp.data.sessions("oct_16").unwrap();
    assert_eq!(sessions.len(), 2);

    // 主持人前缀拆分
    assert_eq!(sessions[0].id, "d1-0");
    assert_eq!(sessions[0].chair, "Dr. Jane Doe");
    assert_eq!(sessions[0].speaker, SpeakerValue::Single(String::new()));

    // 时间区间 + 报告人拆分 + 赞助商 Logo
    assert_eq!(sessions[1].id, "d1-2");
    assert_eq!(sessions[1].time, "10:15 - 11:00");
    assert_eq!(
        sessions[1].speaker,
        SpeakerValue::List(vec!["Ana".to_string(), "Luis".to_string()])
    );
    assert_eq!(sessions[1].sponsor_logo, "https://cdn/acme.png");

    let faculty = resp.data.items("faculty").unwrap();
    assert_eq!(faculty.len(), 2);
    assert_eq!(faculty[1].id, "fac-1");
    assert_eq!(faculty[1].get("bio"), "");
}

#[test]
fn test_program_groups_serialize_first() {
    let wb = workbook(vec![
        ("People", table(&["Name"], &[&["Ana"]])),
        ("Day", table(&["Title"], &[&["Opening"]])),
    ]);

    let resp = preview(
        &wb,
        vec![
            typed_sheet("People", "faculty", "f", SheetType::Faculty, &[("name", "Name")]),
            program_sheet("Day", "zday", "z", &[("title", "Title")]),
        ],
    );
    let json = serde_json::to_string(&resp).unwrap();

    let program_pos = json.find("\"zday\"").unwrap();
    let faculty_pos = json.find("\"faculty\"").unwrap();
    assert!(program_pos < faculty_pos);
    assert!(json.contains("\"type\":\"\""));
}

#[test]
fn test_duplicate_uid_is_error_per_group_only() {
    let day = table(&["Code", "Tema"], &[&["S 01", "A"], &["s-01", "B"]]);
    let other = table(&["Code", "Tema"], &[&["S 01", "C"]]);
    let wb = workbook(vec![("Day 1", day), ("Day 2", other)]);

    let resp = preview(
        &wb,
        vec![
            with_uid_column(program_sheet("Day 1", "oct_16", "d1", &[("title", "Tema")]), "Code"),
            with_uid_column(program_sheet("Day 2", "oct_17", "d2", &[("title", "Tema")]), "Code"),
        ],
    );

    assert_eq!(resp.errors, vec!["[oct_16] Duplicate id: s-01"]);
    assert!(!resp.is_exportable());
    assert_eq!(resp.data.sessions("oct_17").unwrap()[0].id, "s-01");
}

#[test]
fn test_slug_index_ids_disjoint_across_sheets() {
    let rows: &[&[&str]] = &[
        &["9:00", "Apertura"],
        &["", ""],
        &["10:00", "Keynote"],
        &["", ""],
        &["", ""],
        &["11:30", "Panel"],
    ];
    let wb = workbook(vec![
        ("Day 1", table(&["Hora", "Tema"], rows)),
        ("Day 2", table(&["Hora", "Tema"], rows)),
    ]);
    let mapping = [("time", "Hora"), ("title", "Tema")];

    let resp = preview(
        &wb,
        vec![
            program_sheet("Day 1", "oct_16", "d1", &mapping),
            program_sheet("Day 2", "oct_17", "d2", &mapping),
        ],
    );

    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

    let day1: Vec<String> = resp.data.sessions("oct_16").unwrap().iter().map(|s| s.id.clone()).collect();
    let day2: Vec<String> = resp.data.sessions("oct_17").unwrap().iter().map(|s| s.id.clone()).collect();
    assert_eq!(day1, vec!["d1-0", "d1-2", "d1-5"]);
    assert_eq!(day2, vec!["d2-0", "d2-2", "d2-5"]);

    let ids1: HashSet<&String> = day1.iter().collect();
    let ids2: HashSet<&String> = day2.iter().collect();
    assert!(ids1.is_disjoint(&ids2));

    // 每个工作表内行序号严格递增
    for (slug, ids) in [("d1", &day1), ("d2", &day2)] {
        let ordinals: Vec<usize> = ids
            .iter()
            .map(|id| id.strip_prefix(&format!("{slug}-")).unwrap().parse().unwrap())
            .collect();
        assert!(ordinals.windows(2).all(|w| w[0] < w[1]), "{slug}: {ordinals:?}");
    }
}

#[test]
fn test_data_quality_warnings_do_not_block() {
    let wb = workbook(vec![(
        "Day",
        table(
            &["Hora", "Tema", "Moderador"],
            &[
                &["9:00", "Opening", ""],
                &["09:00", "Opening", ""],
                &["TBD", "Lunch", ""],
                &["", "", "Dr. Ruiz"],
            ],
        ),
    )]);

    let resp = preview(
        &wb,
        vec![program_sheet("Day", "oct_16", "d", &[("time", "Hora"), ("title", "Tema"), ("chair", "Moderador")])],
    );

    assert!(resp.is_exportable());
    assert_eq!(
        resp.warnings,
        vec![
            "[oct_16] Unrecognized time format: 'TBD'".to_string(),
            "[oct_16] Duplicate (time,title): 09:00 | Opening".to_string(),
            "[oct_16] Row with Chair only (possible section header): id=d-3".to_string(),
        ]
    );
}

#[test]
fn test_roster_validation_and_custom_groups() {
    let wb = workbook(vec![
        ("Sponsors", table(&["Name", "URL"], &[&["", "https://x"]])),
        ("Venues", table(&["Name", "City"], &[&["", "Lima"]])),
    ]);

    let resp = preview(
        &wb,
        vec![
            typed_sheet("Sponsors", "sponsors_gold", "sp", SheetType::Sponsors, &[("name", "Name"), ("url", "URL")]),
            typed_sheet(
                "Venues",
                "venues",
                "v",
                SheetType::Custom("venues".to_string()),
                &[("name", "Name"), ("city", "City")],
            ),
        ],
    );

    assert_eq!(resp.errors, vec!["[sponsors_gold] Missing name for id=sp-0"]);
    assert_eq!(resp.data.items("venues").unwrap().len(), 1);
}

#[test]
fn test_invalid_chair_regex_disables_extraction() {
    let wb = workbook(vec![("Day", table(&["Tema", "Ponente"], &[&["Talk", "Chair: Ana"]]))]);
    let mut sheet = program_sheet("Day", "oct_16", "d", &[("title", "Tema"), ("speaker", "Ponente")]);
    sheet.options.chair_prefix_regex = "(".to_string();

    let resp = preview(&wb, vec![sheet]);
    let session = &resp.data.sessions("oct_16").unwrap()[0];

    assert_eq!(session.chair, "");
    assert_eq!(session.speaker, SpeakerValue::Single("Chair: Ana".to_string()));
    assert!(resp.warnings[0].starts_with("[oct_16] Invalid chair_prefix_regex"));
}
