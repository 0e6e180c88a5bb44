//! DataSource trait, HTTP transport, log sinks and the update receiver.
//!
//! This crate moves a sheet from wherever it lives to the update endpoint:
//!
//! - [`DataSource`] - yields the current [`Table`](sheetcal_core::Table)
//! - [`Transport`] - performs one delivery and reports a [`Delivery`]
//! - [`LogSink`] - receives the response text
//! - [`push`] - runs the three in sequence
//! - [`receiver`] - the other end: accepts updates and serves the calendar
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │  CSV export     │    │  in-memory      │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │  CsvFileSource  │    │  StaticSource   │
//! └────────┬────────┘    └────────┬────────┘
//!          │      DataSource      │
//!          └──────────┬───────────┘
//!                     ▼ encode_table()
//!              ┌─────────────┐
//!              │  Envelope   │
//!              └──────┬──────┘
//!                     ▼ Transport::deliver()
//!              ┌─────────────┐
//!              │  Delivery   │──▶ LogSink
//!              └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sheetcal_providers::{CsvFileSource, HttpTransport, TracingSink, TransportConfig, push};
//!
//! let source = CsvFileSource::new("schedule.csv");
//! let transport = HttpTransport::new(TransportConfig::new("https://cal.example.com", key))?;
//! let report = push(&source, &transport, &TracingSink).await?;
//! ```

pub mod config;
pub mod csv_file;
pub mod error;
pub mod pipeline;
pub mod receiver;
pub mod sink;
pub mod source;
pub mod transport;

// Re-export main types at crate root
pub use config::{API_KEY_HEADER, TransportConfig, UPDATE_PATH};
pub use csv_file::{CsvFileSource, STDIN_PATH, read_table};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use pipeline::{PushReport, prepare, push};
pub use receiver::{DEFAULT_CALENDAR_ROUTE, DEFAULT_DOWNLOAD_NAME, ReceiverState};
pub use sink::{LogSink, RESPONSE_TARGET, RecordingSink, TracingSink};
pub use source::{BoxFuture, DataSource, ErrorSource, StaticSource};
pub use transport::{Delivery, HttpTransport, Transport};
