//! Where the response text ends up.

use std::sync::{Mutex, PoisonError};

pub use sheetcal_core::RESPONSE_TARGET;
use tracing::info;

/// Receives the response text of a delivery, verbatim.
pub trait LogSink: Send + Sync {
    /// Records one line of output.
    fn log(&self, text: &str);
}

/// Writes response text through `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, text: &str) {
        info!(target: RESPONSE_TARGET, "{}", text);
    }
}

/// Keeps every logged line in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything logged so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, text: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
