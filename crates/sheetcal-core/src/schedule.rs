//! Schedule parsing: turns a posted CSV document into calendar events.
//!
//! The sheet layout is one event per row:
//!
//! | column | content                                       |
//! |--------|-----------------------------------------------|
//! | 0      | event name                                    |
//! | 1      | date (rows whose date does not parse are skipped) |
//! | 2      | start time (falls back to 12:30)              |
//! | 4..13  | one attendance marker per crew member         |
//!
//! The crew names come from the same columns of the first row.

use std::ops::Range;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cell::DATE_DISPLAY_FORMAT;

/// Errors raised while parsing a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The document is not valid CSV.
    #[error("malformed schedule CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Attendance marker found in a crew column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttendanceStatus {
    /// `Y`
    Confirmed,
    /// `N`
    Declined,
    /// `Maybe`
    Maybe,
    /// Empty cell.
    #[default]
    NoResponse,
}

impl AttendanceStatus {
    /// Parses a marker. Surrounding whitespace is ignored.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim() {
            "Y" => Some(Self::Confirmed),
            "N" => Some(Self::Declined),
            "Maybe" => Some(Self::Maybe),
            "" => Some(Self::NoResponse),
            _ => None,
        }
    }

    /// Returns the marker written in the sheet.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Confirmed => "Y",
            Self::Declined => "N",
            Self::Maybe => "Maybe",
            Self::NoResponse => "",
        }
    }

    /// Returns the iCalendar `PARTSTAT` value.
    pub fn partstat(&self) -> &'static str {
        match self {
            Self::Confirmed => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Maybe | Self::NoResponse => "TENTATIVE",
        }
    }
}

/// A crew member and their answer for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub name: String,
    pub status: AttendanceStatus,
}

/// One scheduled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub name: String,
    /// Local start time, interpreted in the calendar's timezone.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub attendees: Vec<Attendee>,
}

/// How rows are laid out and what every event shares.
#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    /// Columns holding crew names (first row) and markers (other rows).
    pub crew_columns: Range<usize>,
    /// Event length.
    pub duration: Duration,
    /// Location applied to every event.
    pub location: String,
    /// Start time used when the time cell is empty or unparseable.
    pub default_time: NaiveTime,
}

impl ScheduleOptions {
    /// Default event length in hours.
    pub const DEFAULT_DURATION_HOURS: i64 = 6;

    /// Default crew columns.
    pub const DEFAULT_CREW_COLUMNS: Range<usize> = 4..13;

    /// Builder method to set the crew columns.
    pub fn with_crew_columns(mut self, columns: Range<usize>) -> Self {
        self.crew_columns = columns;
        self
    }

    /// Builder method to set the event length.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Builder method to set the event length in whole hours.
    pub fn with_duration_hours(self, hours: u32) -> Self {
        self.with_duration(Duration::hours(i64::from(hours)))
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            crew_columns: Self::DEFAULT_CREW_COLUMNS,
            duration: Duration::hours(Self::DEFAULT_DURATION_HOURS),
            location: String::new(),
            default_time: NaiveTime::from_hms_opt(12, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

const NAME_COLUMN: usize = 0;
const DATE_COLUMN: usize = 1;
const TIME_COLUMN: usize = 2;

/// Parses a CSV document into events, in row order.
pub fn parse_schedule(
    document: &str,
    options: &ScheduleOptions,
) -> Result<Vec<ScheduleEvent>, ScheduleError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(document.as_bytes());

    let mut crew: Option<Vec<(usize, String)>> = None;
    let mut events = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let crew = crew.get_or_insert_with(|| crew_from_record(&record, &options.crew_columns));

        let Some(date) = record.get(DATE_COLUMN).and_then(parse_date) else {
            debug!(row = index, "Skipping row without a date");
            continue;
        };
        let time = record
            .get(TIME_COLUMN)
            .and_then(parse_time)
            .unwrap_or(options.default_time);
        let start = date.and_time(time);
        let Some(end) = start.checked_add_signed(options.duration) else {
            warn!(row = index, start = %start, "Event end is out of range, skipping row");
            continue;
        };

        let attendees = crew
            .iter()
            .map(|(column, name)| {
                let marker = record.get(*column).unwrap_or("");
                let status = AttendanceStatus::from_marker(marker).unwrap_or_else(|| {
                    warn!(row = index, crew = %name, marker = %marker, "Unknown attendance marker");
                    AttendanceStatus::NoResponse
                });
                Attendee {
                    name: name.clone(),
                    status,
                }
            })
            .collect();

        events.push(ScheduleEvent {
            name: record.get(NAME_COLUMN).unwrap_or("").to_string(),
            start,
            end,
            location: options.location.clone(),
            attendees,
        });
    }

    debug!(events = events.len(), "Parsed schedule");
    Ok(events)
}

fn crew_from_record(record: &csv::StringRecord, columns: &Range<usize>) -> Vec<(usize, String)> {
    columns
        .clone()
        .filter_map(|column| {
            let name = record.get(column)?.trim();
            (!name.is_empty()).then(|| (column, name.to_string()))
        })
        .collect()
}

/// Strips the parenthesised zone name a sheet host appends to dates.
fn strip_zone_name(value: &str) -> &str {
    match value.find('(') {
        Some(i) => value[..i].trim(),
        None => value.trim(),
    }
}

fn parse_sheet_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = strip_zone_name(value);
    DateTime::parse_from_str(value, DATE_DISPLAY_FORMAT)
        .map(|dt| dt.naive_local())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.naive_local()))
        .ok()
}

/// Parses a date cell.
///
/// Accepts the sheet display form (`Sat Jun 14 2025 00:00:00 GMT+1000 (AEST)`),
/// RFC 3339, `2025-06-14` and `14/06/2025`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Some(dt) = parse_sheet_datetime(value) {
        return Some(dt.date());
    }
    let value = value.trim();
    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parses a time cell.
///
/// Accepts `18:30`, `18:30:00`, `6:30pm`, `6 pm`, and the sheet display
/// form of a time-only cell (a date on 30 Dec 1899 carrying the time).
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if let Some(dt) = parse_sheet_datetime(value) {
        return Some(dt.time());
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let compact = value.replace(' ', "");
    ["%H:%M", "%H:%M:%S", "%I:%M%p", "%I:%M:%S%p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&compact, format).ok())
        .or_else(|| parse_bare_hour(&compact))
}

/// `6pm` style times, which chrono cannot parse without minutes.
fn parse_bare_hour(value: &str) -> Option<NaiveTime> {
    let lower = value.to_ascii_lowercase();
    let (hour, pm) = if let Some(h) = lower.strip_suffix("pm") {
        (h, true)
    } else if let Some(h) = lower.strip_suffix("am") {
        (h, false)
    } else {
        return None;
    };
    let hour: u32 = hour.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, 0, 0)
}
