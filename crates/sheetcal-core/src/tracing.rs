//! Log output for sheetcal.
//!
//! Two shapes are supported: compact lines for a terminal and JSON lines
//! for unattended runs (cron, systemd timers). Logs go to stderr so they
//! never mix with CSV or JSON printed on stdout.
//!
//! The endpoint's response is logged on [`RESPONSE_TARGET`] at INFO. That
//! target is pinned in every filter, so `RUST_LOG=off` still shows it.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt,
    prelude::*,
};

/// Prefix shared by every crate target in this workspace.
///
/// `EnvFilter` matches targets by prefix, so a `sheetcal=info` directive
/// covers `sheetcal_core`, `sheetcal_providers` and `sheetcal_client`.
pub const LOG_TARGET_PREFIX: &str = "sheetcal";

/// Target of the line carrying the endpoint's response text.
pub const RESPONSE_TARGET: &str = "sheetcal::response";

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// One short line per event, no timestamp.
    #[default]
    Compact,
    /// One JSON object per event, with timestamp.
    Json,
}

/// How logs are filtered and printed.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for sheetcal targets when neither `RUST_LOG` nor
    /// `env_filter` is set.
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Print file, line and target with each event.
    pub include_location: bool,
    /// Filter directive used instead of `RUST_LOG`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::interactive(false)
    }
}

impl TracingConfig {
    /// Compact output for a terminal. `debug` lowers the level and adds
    /// source locations.
    #[must_use]
    pub fn interactive(debug: bool) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::INFO },
            format: TracingOutputFormat::Compact,
            include_location: debug,
            env_filter: None,
        }
    }

    /// JSON output for unattended runs.
    #[must_use]
    pub fn scheduled(debug: bool) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::INFO },
            format: TracingOutputFormat::Json,
            include_location: true,
            env_filter: None,
        }
    }

    /// Set a custom env filter directive
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the event filter.
    ///
    /// Uses `env_filter`, then `RUST_LOG`, then `sheetcal=<level>`. The
    /// response target is always added at INFO on top.
    pub fn filter(&self) -> Result<EnvFilter, TracingError> {
        let filter = match self.env_filter {
            Some(ref directives) => EnvFilter::try_new(directives)?,
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!("{}={}", LOG_TARGET_PREFIX, self.level))
            }),
        };
        Ok(filter.add_directive(response_directive()?))
    }
}

fn response_directive() -> Result<Directive, TracingError> {
    Ok(format!("{}=info", RESPONSE_TARGET).parse()?)
}

/// Installs the global subscriber. Call once, early in `main`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set or a filter
/// directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let registry = tracing_subscriber::registry().with(config.filter()?);
    let location = config.include_location;

    match config.format {
        TracingOutputFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .without_time()
                .with_target(location)
                .with_file(location)
                .with_line_number(location)
                .with_writer(std::io::stderr);
            tracing::subscriber::set_global_default(registry.with(layer))?;
        }
        TracingOutputFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_file(location)
                .with_line_number(location)
                .with_writer(std::io::stderr);
            tracing::subscriber::set_global_default(registry.with(layer))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::{debug, info};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `emit` under `config`'s filter and returns what was printed.
    fn capture(config: &TracingConfig, emit: impl FnOnce()) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::registry()
            .with(config.filter().unwrap())
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .without_time()
                    .with_writer(move || writer.clone()),
            );
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn presets() {
        let config = TracingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, TracingOutputFormat::Compact);
        assert!(!config.include_location);

        let config = TracingConfig::interactive(true);
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.include_location);

        let config = TracingConfig::scheduled(false);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, TracingOutputFormat::Json);
    }

    #[test]
    fn response_survives_silenced_filter() {
        let config = TracingConfig::default().with_env_filter("off");
        let output = capture(&config, || {
            info!(target: RESPONSE_TARGET, "Success");
            info!(target: "sheetcal_providers::pipeline", "Push finished");
        });
        assert!(output.contains("Success"));
        assert!(!output.contains("Push finished"));
    }

    #[test]
    fn level_applies_to_sheetcal_targets_only() {
        let config = TracingConfig::default().with_env_filter("sheetcal=info");
        let output = capture(&config, || {
            info!(target: "sheetcal_core::schedule", "kept");
            debug!(target: "sheetcal_core::schedule", "too verbose");
            info!(target: "hyper::client", "foreign");
        });
        assert!(output.contains("kept"));
        assert!(!output.contains("too verbose"));
        assert!(!output.contains("foreign"));
    }

    #[test]
    fn invalid_env_filter_is_rejected() {
        let config = TracingConfig::default().with_env_filter("sheetcal=notalevel");
        assert!(matches!(config.filter(), Err(TracingError::EnvFilter(_))));
        assert!(matches!(
            init_tracing(config),
            Err(TracingError::EnvFilter(_))
        ));
    }
}
