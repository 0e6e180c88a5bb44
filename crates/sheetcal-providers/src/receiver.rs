//! HTTP receiver for pushed sheets.
//!
//! Serves two routes:
//!
//! - `POST /update`: checks `x-api-key`, renders the envelope's schedule
//!   and replaces the calendar file. Answers 204, 401 `Failure` or 422.
//! - `GET {calendar_route}` (default `/bullet`): the current calendar file,
//!   never cached.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use sheetcal_core::{UpdateHandler, UpdateOutcome};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::{API_KEY_HEADER, UPDATE_PATH};
use crate::error::{ProviderError, ProviderResult};

/// Default route for downloading the calendar.
pub const DEFAULT_CALENDAR_ROUTE: &str = "/bullet";

/// Default file name offered to calendar clients.
pub const DEFAULT_DOWNLOAD_NAME: &str = "bullet.ics";

/// Shared state of the receiver.
#[derive(Debug)]
pub struct ReceiverState {
    handler: UpdateHandler,
    output: PathBuf,
    download_name: String,
}

impl ReceiverState {
    /// Renders updates with `handler` and keeps the result at `output`.
    pub fn new(handler: UpdateHandler, output: impl Into<PathBuf>) -> Self {
        Self {
            handler,
            output: output.into(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }

    /// Builder method to set the file name offered on download.
    pub fn with_download_name(mut self, name: impl Into<String>) -> Self {
        self.download_name = name.into();
        self
    }

    /// Returns the calendar file path.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Builds the router for the two routes.
pub fn router(state: Arc<ReceiverState>, calendar_route: &str) -> Router {
    Router::new()
        .route(UPDATE_PATH, post(update))
        .route(calendar_route, get(calendar))
        .with_state(state)
}

/// Binds the listening socket.
pub async fn bind(addr: &str) -> ProviderResult<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        ProviderError::listener_unavailable(format!("failed to listen on {}: {}", addr, e))
            .with_provider("receiver")
            .with_source(e)
    })
}

/// Serves `router` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> ProviderResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "Receiver listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| {
            ProviderError::listener_unavailable(format!("receiver stopped: {}", e))
                .with_provider("receiver")
                .with_source(e)
        })
}

async fn update(
    State(state): State<Arc<ReceiverState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = state.handler.handle(key, &body);
    if let UpdateOutcome::Updated { events, ref calendar } = outcome {
        if let Err(e) = replace_file(&state.output, calendar).await {
            error!(path = %state.output.display(), error = %e, "Failed to write calendar");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failure").into_response();
        }
        info!(events, path = %state.output.display(), "Calendar updated");
    }

    let status = StatusCode::from_u16(outcome.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, outcome.body().to_string()).into_response()
}

/// Writes next to the target and renames, so readers never see a partial file.
async fn replace_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    tokio::fs::write(&staging, contents).await?;
    tokio::fs::rename(&staging, path).await
}

async fn calendar(State(state): State<Arc<ReceiverState>>) -> Response {
    match tokio::fs::read(&state.output).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
                (header::CACHE_CONTROL, "no-store".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", state.download_name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %state.output.display(), "Calendar requested before any update");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(e) => {
            error!(path = %state.output.display(), error = %e, "Failed to read calendar");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failure").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcal_core::{CalendarOptions, Envelope, ScheduleOptions};

    use crate::config::TransportConfig;
    use crate::transport::{Delivery, HttpTransport, Transport};

    const SHEET: &str = "\"Race\",\"Date\",\"Time\",\"Notes\",\"Alice\",\"Bob\"\n\
                         \"Twilight\",\"2025-06-14\",\"18:30\",\"\",\"Y\",\"N\"";

    /// Starts a receiver on an ephemeral port; returns its base address.
    async fn start(dir: &Path) -> (String, PathBuf) {
        let output = dir.join("calendar.ics");
        let handler = UpdateHandler::new(
            "s3cret",
            ScheduleOptions::default(),
            CalendarOptions {
                name: "Test".to_string(),
                ..Default::default()
            },
        );
        let state = Arc::new(ReceiverState::new(handler, &output));
        let listener = bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(
            listener,
            router(state, DEFAULT_CALENDAR_ROUTE),
            std::future::pending(),
        ));
        (format!("http://{}", addr), output)
    }

    #[tokio::test]
    async fn update_then_download() {
        let dir = tempfile::tempdir().unwrap();
        let (base, output) = start(dir.path()).await;

        let transport = HttpTransport::new(TransportConfig::new(&base, "s3cret")).unwrap();
        let delivery = transport.deliver(&Envelope::new(SHEET)).await;
        assert_eq!(
            delivery,
            Delivery::Response {
                status: 204,
                body: String::new()
            }
        );
        assert!(std::fs::read_to_string(&output).unwrap().contains("BEGIN:VEVENT"));

        let response = reqwest::get(format!("{}{}", base, DEFAULT_CALENDAR_ROUTE))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(
            headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/calendar")
        );
        assert!(
            headers[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("bullet.ics")
        );
        let text = response.text().await.unwrap();
        assert!(text.contains("SUMMARY:Twilight"));
    }

    #[tokio::test]
    async fn wrong_key_is_rejected_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (base, output) = start(dir.path()).await;

        let transport = HttpTransport::new(TransportConfig::new(&base, "wrong")).unwrap();
        let delivery = transport.deliver(&Envelope::new(SHEET)).await;
        assert_eq!(delivery.status(), Some(401));
        assert_eq!(delivery.log_text(), "Failure");
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn calendar_before_update_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (base, _) = start(dir.path()).await;

        let response = reqwest::get(format!("{}{}", base, DEFAULT_CALENDAR_ROUTE))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (base, _) = start(dir.path()).await;
        let addr = base.trim_start_matches("http://");

        let err = bind(addr).await.unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::ProviderErrorCode::ListenerUnavailable
        );
    }
}
