//! Delivery of the envelope to the update endpoint.
//!
//! A delivery never fails from the caller's point of view: every HTTP
//! status is a [`Delivery::Response`] carrying the raw body, and anything
//! that prevents a response (DNS, refused connection, an unusable URL) is
//! a [`Delivery::Failed`] with a diagnostic. There are no retries.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sheetcal_core::Envelope;
use tracing::{debug, trace, warn};

use crate::config::{API_KEY_HEADER, TransportConfig};
use crate::error::{ProviderError, ProviderResult};
use crate::source::BoxFuture;

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint answered, with any status.
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// No response was received.
    Failed {
        /// Diagnostic describing what went wrong.
        reason: String,
    },
}

impl Delivery {
    /// Returns the text handed to the log sink: the body, or the diagnostic.
    pub fn log_text(&self) -> &str {
        match self {
            Self::Response { body, .. } => body,
            Self::Failed { reason } => reason,
        }
    }

    /// Returns the HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Failed { .. } => None,
        }
    }

    /// Returns true for a 2xx response.
    pub fn is_success(&self) -> bool {
        self.status().is_some_and(|s| (200..300).contains(&s))
    }
}

/// Sends an envelope somewhere.
pub trait Transport: Send + Sync {
    /// Returns the name/type of this transport (e.g., "http").
    fn name(&self) -> &str;

    /// Performs exactly one delivery attempt.
    fn deliver<'a>(&'a self, envelope: &'a Envelope) -> BoxFuture<'a, Delivery>;
}

/// Delivers over HTTP: `POST {base_address}/update` with a JSON body.
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    pub fn new(config: TransportConfig) -> ProviderResult<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ProviderError::configuration(format!("Failed to create HTTP client: {}", e))
                .with_provider("http")
                .with_source(e)
        })?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn send(&self, envelope: &Envelope) -> Delivery {
        let url = self.config.update_url();
        if !self.config.is_complete() {
            warn!(
                url = %url,
                has_api_key = !self.config.api_key.is_empty(),
                "Endpoint configuration is incomplete, sending anyway"
            );
        }

        let body = envelope.to_json();
        trace!(url = %url, bytes = body.len(), "Sending update");

        let response = match self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Update request failed");
                return Delivery::Failed {
                    reason: format!("request to {} failed: {}", url, e),
                };
            }
        };

        let status = response.status();
        debug!(status = %status, "Received response");

        match response.text().await {
            Ok(body) => Delivery::Response {
                status: status.as_u16(),
                body,
            },
            Err(e) => {
                warn!(status = %status, error = %e, "Failed to read response body");
                Delivery::Failed {
                    reason: format!("failed to read response body ({}): {}", status, e),
                }
            }
        }
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn deliver<'a>(&'a self, envelope: &'a Envelope) -> BoxFuture<'a, Delivery> {
        Box::pin(self.send(envelope))
    }
}
