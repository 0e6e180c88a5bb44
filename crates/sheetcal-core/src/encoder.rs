//! Quote-all CSV encoding of a [`Table`].
//!
//! Every field is wrapped in double quotes regardless of content, embedded
//! quotes are doubled, fields are separated by `,` and rows by `\n`. There
//! is no trailing newline, and a row without columns becomes an empty line.
//! Embedded newlines are kept literally inside the quoted field.
//!
//! Encoding is a total function: any table produces a document.

use crate::cell::{CellValue, Table};

/// Field delimiter.
pub const FIELD_SEPARATOR: char = ',';

/// Row delimiter.
pub const ROW_SEPARATOR: char = '\n';

/// Encodes a table as a CSV document.
///
/// ```
/// use sheetcal_core::{Table, encode_table};
///
/// let table = Table::from_rows(vec![vec![1, 2], vec![3, 4]]);
/// assert_eq!(encode_table(&table), "\"1\",\"2\"\n\"3\",\"4\"");
/// ```
pub fn encode_table(table: &Table) -> String {
    let mut out = String::new();
    for (i, row) in table.rows().iter().enumerate() {
        if i > 0 {
            out.push(ROW_SEPARATOR);
        }
        encode_row_into(row, &mut out);
    }
    out
}

/// Encodes a single row, without a row separator.
pub fn encode_row(row: &[CellValue]) -> String {
    let mut out = String::new();
    encode_row_into(row, &mut out);
    out
}

/// Quotes a single field value.
pub fn encode_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_field(value, &mut out);
    out
}

fn encode_row_into(row: &[CellValue], out: &mut String) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(FIELD_SEPARATOR);
        }
        push_field(&cell.display(), out);
    }
}

fn push_field(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
