//! JSON envelope carrying a CSV document to the update endpoint.

use serde::{Deserialize, Serialize};

/// Request body for the update endpoint: `{"calendar": "<csv>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// The CSV document.
    pub calendar: String,
}

impl Envelope {
    /// Wraps a CSV document.
    pub fn new(calendar: impl Into<String>) -> Self {
        Self {
            calendar: calendar.into(),
        }
    }

    /// Serializes the envelope as compact JSON text.
    pub fn to_json(&self) -> String {
        // Rendering a `Value` cannot fail, unlike `serde_json::to_string`.
        serde_json::json!({ "calendar": self.calendar }).to_string()
    }

    /// Parses an envelope from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Consumes the envelope, returning the CSV document.
    pub fn into_calendar(self) -> String {
        self.calendar
    }
}
