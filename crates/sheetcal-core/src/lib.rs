//! Core types: cells, CSV encoding, envelope, schedule rendering, update
//! handling, tracing

pub mod cell;
pub mod encoder;
pub mod envelope;
pub mod ics;
pub mod receiver;
pub mod schedule;
pub mod tracing;

pub use cell::{CellValue, Row, Table, DATE_DISPLAY_FORMAT};
pub use encoder::{encode_field, encode_row, encode_table};
pub use envelope::Envelope;
pub use ics::{attendee_address, render_calendar, CalendarOptions};
pub use receiver::{verify_api_key, UpdateHandler, UpdateOutcome, UNAUTHORIZED_BODY};
pub use schedule::{
    parse_date, parse_schedule, parse_time, AttendanceStatus, Attendee, ScheduleError,
    ScheduleEvent, ScheduleOptions,
};
pub use self::tracing::{
    init_tracing, TracingConfig, TracingError, TracingOutputFormat, RESPONSE_TARGET,
};
