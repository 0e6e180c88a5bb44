//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Data source or transport setup error.
    Provider(sheetcal_providers::ProviderError),
    /// Schedule could not be parsed.
    Schedule(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Schedule(msg) => write!(f, "schedule error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<sheetcal_providers::ProviderError> for ClientError {
    fn from(err: sheetcal_providers::ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<sheetcal_core::ScheduleError> for ClientError {
    fn from(err: sheetcal_core::ScheduleError) -> Self {
        Self::Schedule(err.to_string())
    }
}
