//! sheetcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use sheetcal_core::{TracingConfig, init_tracing};

use sheetcal_client::cli::{Cli, Command, ConfigAction};
use sheetcal_client::commands;
use sheetcal_client::config::ClientConfig;
use sheetcal_client::error::{ClientError, ClientResult};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(tracing_config(&cli, &config)) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .map_err(ClientError::Config)
}

fn tracing_config(cli: &Cli, config: &ClientConfig) -> TracingConfig {
    let debug = cli.debug || config.debug;
    if cli.json_logs {
        TracingConfig::scheduled(debug)
    } else {
        TracingConfig::interactive(debug)
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    let overrides = cli.endpoint_overrides();

    match cli.command.unwrap_or(Command::Push { input: None }) {
        Command::Push { input } => {
            let input = commands::input_path(input, &config)?;
            let endpoint = config
                .endpoint
                .to_transport_config(&overrides)
                .map_err(ClientError::Config)?;
            commands::push::run(input, endpoint).await
        }
        Command::Encode { input, envelope } => {
            let input = commands::input_path(input, &config)?;
            commands::encode::run(input, envelope, &mut std::io::stdout().lock()).await
        }
        Command::Render {
            input,
            envelope,
            output,
        } => {
            let input = commands::input_path(input, &config)?;
            let path = commands::render::run(&input, envelope, output, &config.render)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Serve { listen } => commands::serve::run(listen, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config, &overrides),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
