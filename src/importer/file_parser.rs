// ==========================================
// 会议日程构建器 - 工作簿解析器
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 约定: 第一行为表头；数据行按位置保留（空行交给记录构建丢弃）
// ==========================================

use crate::domain::table::{CellValue, Table, Workbook};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// WorkbookParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait WorkbookParser: Send + Sync {
    /// 解析文件为工作簿（工作表名 → 表）
    ///
    /// # 返回
    /// - Ok(Workbook): 至少包含一个工作表
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 空表头按 "Unnamed: N" 命名
fn header_name(raw: String, idx: usize) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        raw
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 工作表名默认取文件名（含扩展名）
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    pub sheet_name: Option<String>,
}

impl WorkbookParser for CsvParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| header_name(h.to_string(), idx))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        let name = self.sheet_name.clone().unwrap_or_else(|| {
            file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        tracing::debug!(sheet = %name, rows = rows.len(), "CSV 解析完成");

        let mut workbook = Workbook::new();
        workbook.insert(name, Table::new(columns, rows));
        Ok(workbook)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl WorkbookParser for ExcelParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xlsm" | "xls" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut sheets = open_workbook_auto(file_path)?;
        let sheet_names = sheets.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "workbook contains no worksheets".to_string(),
            ));
        }

        let mut workbook = Workbook::new();
        for name in sheet_names {
            let range = sheets.worksheet_range(&name)?;
            let mut rows_iter = range.rows();

            // 完全空白的工作表 → 空表
            let columns: Vec<String> = match rows_iter.next() {
                Some(header_row) => header_row
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| header_name(cell.to_string(), idx))
                    .collect(),
                None => Vec::new(),
            };

            let rows: Vec<Vec<CellValue>> = rows_iter
                .map(|row| row.iter().map(convert_cell).collect())
                .collect();

            tracing::debug!(sheet = %name, rows = rows.len(), columns = columns.len(), "工作表解析完成");
            workbook.insert(name, Table::new(columns, rows));
        }

        Ok(workbook)
    }
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::DateTime(ndt),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // 公式错误 (#N/A 等) 视为空
        Data::Error(_) => CellValue::Empty,
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct UniversalFileParser {
    /// CSV 工作表名（上传时使用原始文件名）
    pub csv_sheet_name: Option<String>,
}

impl UniversalFileParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csv_sheet_name(name: impl Into<String>) -> Self {
        Self {
            csv_sheet_name: Some(name.into()),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Workbook> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser {
                sheet_name: self.csv_sheet_name.clone(),
            }
            .parse_workbook(path),
            "xlsx" | "xlsm" | "xls" | "ods" => ExcelParser.parse_workbook(path),
            other => Err(ImportError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}
