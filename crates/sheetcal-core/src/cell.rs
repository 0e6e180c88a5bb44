//! Spreadsheet cell values and the tables built from them.
//!
//! A [`Table`] is the populated rectangular range of a sheet, read row by
//! row. Cells are heterogeneous scalars; the only thing downstream code
//! needs from them is their display string.

use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Format used when a date cell is displayed.
///
/// Mirrors how spreadsheet hosts stringify dates by default, e.g.
/// `Sat Jun 14 2025 00:00:00 GMT+1000`.
pub const DATE_DISPLAY_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// A single scalar cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// Blank cell.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Boolean(bool),
    /// Date or date-time cell, with the sheet's UTC offset.
    DateTime(DateTime<FixedOffset>),
}

impl CellValue {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true if the cell is blank.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the display string for this cell.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write_number(f, *n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATE_DISPLAY_FORMAT)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<FixedOffset>> for CellValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }
}

/// Writes a number the way spreadsheet hosts stringify it: shortest
/// round-trip digits, `0` for negative zero, exponent form outside
/// `[1e-6, 1e21)`, and `Infinity`/`NaN` for non-finite values.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return f.write_str("0");
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{}", n);
    }
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => {
            write!(f, "{}e+{}", mantissa, power)
        }
        _ => f.write_str(&exp),
    }
}

/// One spreadsheet row, in column order.
pub type Row = Vec<CellValue>;

/// The populated range of a sheet, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from rows of anything convertible into a cell.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_strings() {
        assert_eq!(CellValue::Empty.display(), "");
        assert_eq!(CellValue::text("Ann").display(), "Ann");
        assert_eq!(CellValue::Number(30.0).display(), "30");
        assert_eq!(CellValue::Number(1.5).display(), "1.5");
        assert_eq!(CellValue::Number(-0.25).display(), "-0.25");
        assert_eq!(CellValue::Number(0.1 + 0.2).display(), "0.30000000000000004");
        assert_eq!(CellValue::Boolean(true).display(), "true");
        assert_eq!(CellValue::Boolean(false).display(), "false");
    }

    #[test]
    fn number_edge_cases_match_sheet_stringification() {
        assert_eq!(CellValue::Number(-0.0).display(), "0");
        assert_eq!(CellValue::Number(1e20).display(), "100000000000000000000");
        assert_eq!(CellValue::Number(1e21).display(), "1e+21");
        assert_eq!(CellValue::Number(-2.5e30).display(), "-2.5e+30");
        assert_eq!(CellValue::Number(0.000001).display(), "0.000001");
        assert_eq!(CellValue::Number(1.5e-7).display(), "1.5e-7");
        assert_eq!(CellValue::Number(f64::INFINITY).display(), "Infinity");
        assert_eq!(CellValue::Number(f64::NEG_INFINITY).display(), "-Infinity");
        assert_eq!(CellValue::Number(f64::NAN).display(), "NaN");
    }

    #[test]
    fn date_display_matches_sheet_format() {
        let offset = FixedOffset::east_opt(10 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2025, 6, 14, 0, 0, 0).unwrap();
        assert_eq!(
            CellValue::DateTime(dt).display(),
            "Sat Jun 14 2025 00:00:00 GMT+1000"
        );
    }

    #[test]
    fn table_from_rows_preserves_order() {
        let table = Table::from_rows(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows()[1][0], CellValue::Number(3.0));
    }

    #[test]
    fn width_of_ragged_table() {
        let mut table = Table::new();
        table.push_row(vec![CellValue::Empty]);
        table.push_row(vec![]);
        table.push_row(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(table.width(), 3);
        assert!(!table.is_empty());
        assert!(Table::new().is_empty());
    }
}
