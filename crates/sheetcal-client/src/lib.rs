//! Command-line client for sheetcal.
//!
//! This crate provides the `sheetcal` binary: it pushes a sheet to the
//! calendar endpoint, runs the receiving end with `serve`, and carries the
//! supporting `encode`, `render` and `config` commands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
