// ==========================================
// 会议日程构建器 - 表格抽象
// ==========================================
// 职责: 已解析工作表的最小访问接口
// - 列名枚举
// - 按行序号访问
// - 按列取单元格
// ==========================================

use chrono::NaiveDateTime;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

// ==========================================
// SheetTable Trait
// ==========================================
// 实现者: Table
pub trait SheetTable {
    /// 列名（保持源顺序，未经修剪）
    fn column_names(&self) -> &[String];

    /// 数据行数（不含表头）
    fn row_count(&self) -> usize;

    /// 取单元格；越界返回 None
    fn cell(&self, row: usize, column: usize) -> Option<&CellValue>;

    /// 列名 → 列序号（精确匹配）
    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|c| c == name)
    }
}

// ==========================================
// Table - 内存表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// 由字符串二维数组构建（测试/CSV 使用）
    pub fn from_strings<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> Self {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| {
                        let v = v.as_ref();
                        if v.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(v.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SheetTable for Table {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

// ==========================================
// Workbook - 已解析的工作簿
// ==========================================
// 工作表保持源顺序；同名工作表以后者为准
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<(String, Table)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        if let Some(slot) = self.sheets.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = table;
        } else {
            self.sheets.push((name, table));
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
