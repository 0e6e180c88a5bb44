//! Render command: schedule CSV to an iCalendar file.

use std::io::Read;
use std::path::{Path, PathBuf};

use sheetcal_core::{Envelope, parse_schedule, render_calendar};
use sheetcal_providers::STDIN_PATH;
use tracing::info;

use crate::config::RenderSettings;
use crate::error::{ClientError, ClientResult};

fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Builds the calendar and writes it. Returns the path written.
pub fn run(
    input: &Path,
    envelope: bool,
    output: Option<PathBuf>,
    settings: &RenderSettings,
) -> ClientResult<PathBuf> {
    let problems = settings.problems();
    if !problems.is_empty() {
        return Err(ClientError::Config(problems.join("; ")));
    }

    let text = read_input(input)?;
    let document = if envelope {
        Envelope::from_json(&text)
            .map_err(|e| ClientError::Schedule(format!("invalid request body: {}", e)))?
            .into_calendar()
    } else {
        text
    };

    let events = parse_schedule(&document, &settings.schedule_options())?;
    let ics = render_calendar(&events, &settings.calendar_options());

    let path = output.unwrap_or_else(|| settings.default_output());
    std::fs::write(&path, ics)?;
    info!(events = events.len(), path = %path.display(), "Wrote calendar");
    Ok(path)
}
