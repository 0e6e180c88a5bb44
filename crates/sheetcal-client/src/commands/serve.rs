//! Serve command: the receiving end of `push`.

use std::sync::Arc;

use sheetcal_core::UpdateHandler;
use sheetcal_providers::receiver::{self, ReceiverState};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Builds the receiver state from configuration.
pub fn state(config: &ClientConfig) -> ClientResult<ReceiverState> {
    let problems = config.render.problems();
    if !problems.is_empty() {
        return Err(ClientError::Config(problems.join("; ")));
    }
    let api_key = config.receiver_api_key().map_err(ClientError::Config)?;

    let render = &config.render;
    let handler = UpdateHandler::new(
        api_key,
        render.schedule_options(),
        render.calendar_options(),
    );
    Ok(ReceiverState::new(handler, render.default_output())
        .with_download_name(&config.receiver.download_name))
}

/// Listens on `listen` (or `[receiver] listen`) until Ctrl-C.
pub async fn run(listen: Option<String>, config: &ClientConfig) -> ClientResult<()> {
    let state = state(config)?;
    let listen = listen.unwrap_or_else(|| config.receiver.listen.clone());
    info!(
        output = %state.output().display(),
        route = %config.receiver.calendar_route,
        "Starting receiver"
    );

    let listener = receiver::bind(&listen).await?;
    let router = receiver::router(Arc::new(state), &config.receiver.calendar_route);
    receiver::serve(listener, router, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down");
    })
    .await?;
    Ok(())
}
