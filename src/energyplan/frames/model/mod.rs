use std::fmt;

use serde::{Deserialize, Serialize};

/// First hour (inclusive) flagged as part of the summer period.
pub const SUMMER_START_HOUR: u32 = 3649;
/// First hour (exclusive) after the summer period.
pub const SUMMER_END_HOUR: u32 = 5857;

/// A single spreadsheet cell with no semantic interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Returns `true` for cells without any content.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Renders the cell as text. Numbers keep their shortest representation.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
        }
    }
}

/// Identifies a worksheet either by position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Index(usize),
    Name(String),
}

impl SheetRef {
    /// Interprets all-digit input as a sheet index and anything else as a name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<usize>() {
            Ok(index) => SheetRef::Index(index),
            Err(_) => SheetRef::Name(trimmed.to_string()),
        }
    }
}

impl Default for SheetRef {
    fn default() -> Self {
        SheetRef::Index(0)
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Index(index) => write!(f, "#{index}"),
            SheetRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Full grid of a worksheet. Row and column indices are absolute sheet
/// positions, so leading blank rows are kept as empty rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Number of rows up to and including the last populated one.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the cell at the given position, treating anything outside the
    /// grid as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&Cell::Empty)
    }
}

/// Time resolution of a normalized table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Header used for the time key, if the granularity has one.
    pub fn key_name(self) -> Option<&'static str> {
        match self {
            Granularity::Hourly => Some("hour"),
            Granularity::Monthly => Some("month"),
            Granularity::Yearly => None,
        }
    }

    /// Unit the export reports values in.
    pub fn unit(self) -> &'static str {
        match self {
            Granularity::Hourly | Granularity::Monthly => "MW",
            Granularity::Yearly => "TWh/year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Hourly => write!(f, "hourly"),
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Yearly => write!(f, "yearly"),
        }
    }
}

/// A named numeric column. Missing values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// One workbook reshaped into a labelled time series table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// Base name of the workbook the table was read from.
    pub source: String,
    pub granularity: Granularity,
    /// Hour of year or month ordinal per row. Empty for yearly tables.
    pub keys: Vec<u32>,
    /// Summer flag per row, present for hourly tables only.
    pub is_summer_period: Option<Vec<bool>>,
    /// Data columns in output order.
    pub columns: Vec<Series>,
}

impl NormalizedTable {
    /// Number of rows. Yearly tables always hold the single annual row.
    pub fn row_count(&self) -> usize {
        match self.granularity {
            Granularity::Yearly => 1,
            _ => self.keys.len(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|series| series.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names of the data columns, without the identifier columns.
    pub fn data_column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|series| series.name.as_str())
    }

    /// Full ordered header: identifier columns followed by the data columns.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len() + 3);
        if let Some(key) = self.granularity.key_name() {
            header.push(key.to_string());
        }
        header.push("source".to_string());
        if self.is_summer_period.is_some() {
            header.push("is_summer_period".to_string());
        }
        header.extend(self.columns.iter().map(|series| series.name.clone()));
        header
    }
}

/// Returns whether an hour of the year falls into the summer period.
pub fn is_summer_hour(hour: u32) -> bool {
    (SUMMER_START_HOUR..SUMMER_END_HOUR).contains(&hour)
}

/// A cell value destined for an output sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(number) if number.is_finite() => CellValue::Number(number),
            _ => CellValue::Empty,
        }
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Represents all tables required to materialise an output workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summer_window_is_half_open() {
        assert!(!is_summer_hour(3648));
        assert!(is_summer_hour(3649));
        assert!(is_summer_hour(5856));
        assert!(!is_summer_hour(5857));
    }

    #[test]
    fn sheet_ref_parses_indices_and_names() {
        assert_eq!(SheetRef::parse("0"), SheetRef::Index(0));
        assert_eq!(SheetRef::parse(" 3 "), SheetRef::Index(3));
        assert_eq!(SheetRef::parse("Results"), SheetRef::Name("Results".into()));
    }

    #[test]
    fn header_orders_identifier_columns_first() {
        let table = NormalizedTable {
            source: "base".into(),
            granularity: Granularity::Hourly,
            keys: vec![1],
            is_summer_period: Some(vec![false]),
            columns: vec![Series::new("Wind_Electr.", vec![Some(1.0)])],
        };
        assert_eq!(
            table.header(),
            vec!["hour", "source", "is_summer_period", "Wind_Electr."]
        );
    }
}
