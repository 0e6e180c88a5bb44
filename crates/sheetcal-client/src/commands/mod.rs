//! Subcommand implementations.

use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub mod config;
pub mod encode;
pub mod push;
pub mod render;
pub mod serve;

/// Picks the input file: the command line wins over `[source] path`.
pub fn input_path(cli_input: Option<PathBuf>, config: &ClientConfig) -> ClientResult<PathBuf> {
    cli_input.or_else(|| config.source.path.clone()).ok_or_else(|| {
        ClientError::Config(format!(
            "no input given. Pass --input <file> or add to {}:\n  \
             [source]\n  \
             path = \"schedule.csv\"",
            ClientConfig::default_path().display()
        ))
    })
}
