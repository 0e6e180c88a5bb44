//! CSV file data source.
//!
//! Reads a sheet exported as CSV (or piped on stdin) back into a
//! [`Table`]. Every non-empty field becomes a text cell; empty fields become
//! blank cells.

use std::io::Read;
use std::path::{Path, PathBuf};

use sheetcal_core::{CellValue, Table};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::source::{BoxFuture, DataSource};

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

const PROVIDER_NAME: &str = "csv-file";

/// Reads the table from a CSV file on every fetch.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Creates a source for `path`. `-` reads standard input.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }

    fn read(&self) -> ProviderResult<Table> {
        if self.is_stdin() {
            read_table(std::io::stdin().lock())
        } else {
            let file = std::fs::File::open(&self.path).map_err(|e| {
                ProviderError::source_unavailable(format!(
                    "failed to open {}: {}",
                    self.path.display(),
                    e
                ))
                .with_provider(PROVIDER_NAME)
                .with_source(e)
            })?;
            read_table(file)
        }
    }
}

impl DataSource for CsvFileSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_table(&self) -> BoxFuture<'_, ProviderResult<Table>> {
        Box::pin(async move {
            let table = self.read()?;
            debug!(
                path = %self.path.display(),
                rows = table.len(),
                columns = table.width(),
                "Read table"
            );
            Ok(table)
        })
    }
}

/// Parses CSV text from `reader` into a table.
///
/// Records may have differing lengths; blank lines are skipped.
pub fn read_table<R: Read>(reader: R) -> ProviderResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = Table::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| {
            ProviderError::invalid_data(format!("malformed CSV: {}", e))
                .with_provider(PROVIDER_NAME)
                .with_source(e)
        })?;
        table.push_row(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::text(field)
                    }
                })
                .collect(),
        );
    }
    Ok(table)
}
