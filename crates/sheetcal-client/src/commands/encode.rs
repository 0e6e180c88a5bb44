//! Encode command: shows what would be sent.

use std::io::Write;
use std::path::PathBuf;

use sheetcal_providers::{CsvFileSource, prepare};

use crate::error::ClientResult;

/// Writes the CSV document, or the JSON request body, to `out`.
pub async fn run<W: Write>(input: PathBuf, envelope: bool, out: &mut W) -> ClientResult<()> {
    let source = CsvFileSource::new(input);
    let (_, body) = prepare(&source).await?;

    if envelope {
        writeln!(out, "{}", body.to_json())?;
    } else {
        writeln!(out, "{}", body.calendar)?;
    }
    Ok(())
}
