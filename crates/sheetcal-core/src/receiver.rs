//! Receiving side of the update endpoint.
//!
//! [`UpdateHandler::handle`] takes the `x-api-key` header and the raw
//! request body of `POST /update` and decides the answer. The schedule in
//! the envelope is parsed and rendered to iCalendar text; writing it out
//! is left to the caller.

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::ics::{CalendarOptions, render_calendar};
use crate::schedule::{ScheduleOptions, parse_schedule};

/// Body sent with a rejected key.
pub const UNAUTHORIZED_BODY: &str = "Failure";

/// Compares a presented key with the configured one in constant time.
///
/// An empty configured key matches nothing.
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

/// What the endpoint answers to one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Missing or wrong API key.
    Unauthorized,
    /// The body is not an envelope, or its CSV does not parse.
    InvalidBody { reason: String },
    /// The schedule was rendered.
    Updated { events: usize, calendar: String },
}

impl UpdateOutcome {
    /// HTTP status for this outcome.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::InvalidBody { .. } => 422,
            Self::Updated { .. } => 204,
        }
    }

    /// Response body for this outcome.
    pub fn body(&self) -> &str {
        match self {
            Self::Unauthorized => UNAUTHORIZED_BODY,
            Self::InvalidBody { reason } => reason,
            Self::Updated { .. } => "",
        }
    }
}

/// Checks, parses and renders incoming updates.
#[derive(Debug, Clone)]
pub struct UpdateHandler {
    api_key: String,
    schedule: ScheduleOptions,
    calendar: CalendarOptions,
}

impl UpdateHandler {
    pub fn new(
        api_key: impl Into<String>,
        schedule: ScheduleOptions,
        calendar: CalendarOptions,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            schedule,
            calendar,
        }
    }

    /// Returns the calendar options used for rendering.
    pub fn calendar_options(&self) -> &CalendarOptions {
        &self.calendar
    }

    /// Handles one `POST /update`.
    ///
    /// The key is checked before the body is looked at.
    pub fn handle(&self, provided_key: Option<&str>, body: &str) -> UpdateOutcome {
        if !provided_key.is_some_and(|key| verify_api_key(key, &self.api_key)) {
            warn!(has_key = provided_key.is_some(), "Rejected update with bad API key");
            return UpdateOutcome::Unauthorized;
        }

        let envelope = match Envelope::from_json(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return UpdateOutcome::InvalidBody {
                    reason: format!("invalid request body: {}", e),
                };
            }
        };

        match parse_schedule(&envelope.calendar, &self.schedule) {
            Ok(events) => {
                debug!(events = events.len(), "Rendered update");
                UpdateOutcome::Updated {
                    events: events.len(),
                    calendar: render_calendar(&events, &self.calendar),
                }
            }
            Err(e) => UpdateOutcome::InvalidBody {
                reason: e.to_string(),
            },
        }
    }
}
