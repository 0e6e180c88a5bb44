//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/sheetcal/config.toml` by default. Every section is optional.
//!
//! ```toml
//! [endpoint]
//! base_address = "https://cal.example.com"
//! api_key = "env::SHEETCAL_API_KEY"
//!
//! [source]
//! path = "schedule.csv"
//!
//! [render]
//! domain = "example.com"
//!
//! [receiver]
//! listen = "0.0.0.0:8000"
//! ```
//!
//! API keys support secret references (see [`crate::secret`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sheetcal_core::{CalendarOptions, ScheduleOptions};
use sheetcal_providers::{DEFAULT_CALENDAR_ROUTE, DEFAULT_DOWNLOAD_NAME, TransportConfig};

use crate::secret::SecretRef;

/// Configuration for the sheetcal client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Where the table is sent.
    pub endpoint: EndpointSettings,

    /// Where the table is read from.
    pub source: SourceSettings,

    /// How a schedule is turned into a calendar.
    pub render: RenderSettings,

    /// The `serve` side of the endpoint.
    pub receiver: ReceiverSettings,
}

/// Update endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Base address; requests go to `{base_address}/update`.
    pub base_address: Option<String>,

    /// Shared secret for the `x-api-key` header (supports `pass::` and `env::`).
    pub api_key: Option<String>,

    /// Request timeout in seconds. Unset keeps the HTTP client default.
    pub timeout: Option<u64>,
}

/// Values given on the command line, which win over the file.
#[derive(Debug, Clone, Default)]
pub struct EndpointOverrides {
    pub base_address: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
}

impl EndpointSettings {
    /// Builds the transport configuration.
    ///
    /// Missing values become empty strings; the request is still attempted
    /// with them. Only an unresolvable secret reference is an error.
    pub fn to_transport_config(
        &self,
        overrides: &EndpointOverrides,
    ) -> Result<TransportConfig, String> {
        let base_address = overrides
            .base_address
            .clone()
            .or_else(|| self.base_address.clone())
            .unwrap_or_default();

        let api_key = match overrides.api_key.as_deref().or(self.api_key.as_deref()) {
            Some(raw) => SecretRef::parse(raw)
                .resolve()
                .map_err(|e| format!("failed to resolve api_key: {}", e))?,
            None => String::new(),
        };

        let mut config = TransportConfig::new(base_address, api_key);
        if let Some(secs) = overrides.timeout.or(self.timeout) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Data source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// CSV export of the sheet. `-` reads standard input.
    pub path: Option<PathBuf>,
}

/// Schedule rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Calendar name, also used for the output file name.
    pub name: String,

    /// Prefix for event summaries (`{prefix}: {event}`).
    pub summary_prefix: Option<String>,

    /// Location applied to every event.
    pub location: String,

    /// IANA timezone of the times in the sheet.
    pub timezone: String,

    /// Domain for generated attendee addresses.
    pub domain: String,

    /// Event length in hours.
    pub duration_hours: u32,

    /// First crew column (inclusive).
    pub crew_first_column: usize,

    /// Last crew column (exclusive).
    pub crew_last_column: usize,

    /// Directory the `.ics` file is written to.
    pub output_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let crew = ScheduleOptions::DEFAULT_CREW_COLUMNS;
        Self {
            name: "Bullet Sailing Schedule".to_string(),
            summary_prefix: Some("Bullet".to_string()),
            location: "Sandringham Yacht Club\n36 Jetty Rd, Sandringham VIC 3191, Australia"
                .to_string(),
            timezone: "Australia/Melbourne".to_string(),
            domain: "localhost".to_string(),
            duration_hours: ScheduleOptions::DEFAULT_DURATION_HOURS as u32,
            crew_first_column: crew.start,
            crew_last_column: crew.end,
            output_dir: None,
        }
    }
}

impl RenderSettings {
    /// Longest event `duration_hours` may describe.
    pub const MAX_DURATION_HOURS: u32 = 24 * 7;

    /// Lists settings that cannot produce a sensible calendar.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.crew_first_column > self.crew_last_column {
            problems.push(format!(
                "render.crew_first_column ({}) is after render.crew_last_column ({})",
                self.crew_first_column, self.crew_last_column
            ));
        }
        if self.name.is_empty() {
            problems.push("render.name must not be empty".to_string());
        }
        if !(1..=Self::MAX_DURATION_HOURS).contains(&self.duration_hours) {
            problems.push(format!(
                "render.duration_hours ({}) must be between 1 and {}",
                self.duration_hours,
                Self::MAX_DURATION_HOURS
            ));
        }
        problems
    }

    /// Converts to schedule parsing options.
    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions::default()
            .with_crew_columns(self.crew_first_column..self.crew_last_column)
            .with_duration_hours(self.duration_hours)
            .with_location(&self.location)
    }

    /// Converts to calendar rendering options.
    pub fn calendar_options(&self) -> CalendarOptions {
        CalendarOptions {
            name: self.name.clone(),
            summary_prefix: self.summary_prefix.clone(),
            timezone: self.timezone.clone(),
            domain: self.domain.clone(),
        }
    }

    /// Default output path: `{output_dir}/{name}.ics`.
    pub fn default_output(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!("{}.ics", self.name))
    }
}

/// Receiver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverSettings {
    /// Address to listen on.
    pub listen: String,

    /// Key expected in `x-api-key` (supports `pass::` and `env::`).
    /// Falls back to `endpoint.api_key`.
    pub api_key: Option<String>,

    /// Route serving the calendar file.
    pub calendar_route: String,

    /// File name offered to calendar clients.
    pub download_name: String,
}

impl Default for ReceiverSettings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8000".to_string(),
            api_key: None,
            calendar_route: DEFAULT_CALENDAR_ROUTE.to_string(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolves the key the receiver expects.
    ///
    /// Unlike sending, receiving refuses to start without a key.
    pub fn receiver_api_key(&self) -> Result<String, String> {
        let raw = self
            .receiver
            .api_key
            .as_deref()
            .or(self.endpoint.api_key.as_deref())
            .ok_or_else(|| "receiver.api_key is not set".to_string())?;
        let key = SecretRef::parse(raw)
            .resolve()
            .map_err(|e| format!("failed to resolve receiver.api_key: {}", e))?;
        if key.is_empty() {
            return Err("receiver.api_key is empty".to_string());
        }
        Ok(key)
    }

    /// Loads configuration from the default path, or defaults if it does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetcal")
            .join("config.toml")
    }

    /// Returns a copy safe to print: literal API keys are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        let literal = copy
            .endpoint
            .api_key
            .as_deref()
            .is_some_and(|key| !SecretRef::parse(key).is_reference());
        if literal {
            copy.endpoint.api_key = Some("<redacted>".to_string());
        }
        let literal = copy
            .receiver
            .api_key
            .as_deref()
            .is_some_and(|key| !SecretRef::parse(key).is_reference());
        if literal {
            copy.receiver.api_key = Some("<redacted>".to_string());
        }
        copy
    }
}
