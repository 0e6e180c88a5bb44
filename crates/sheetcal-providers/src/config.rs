//! Transport configuration.

use std::time::Duration;

use url::Url;

/// Path appended to the base address.
pub const UPDATE_PATH: &str = "/update";

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Where and how the CSV document is delivered.
///
/// Values are taken verbatim: the base address is not normalised and
/// empty values are allowed (the request is still attempted).
#[derive(Clone)]
pub struct TransportConfig {
    /// Base address; the request goes to `{base_address}/update`.
    pub base_address: String,

    /// Shared secret sent as the `x-api-key` header.
    pub api_key: String,

    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,

    /// User agent string.
    pub user_agent: String,
}

impl TransportConfig {
    /// Creates a configuration for the given endpoint and secret.
    pub fn new(base_address: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
            api_key: api_key.into(),
            timeout: None,
            user_agent: format!("sheetcal/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the full target URL.
    ///
    /// This is plain concatenation: a trailing slash on the base address
    /// yields `//update`.
    pub fn update_url(&self) -> String {
        format!("{}{}", self.base_address, UPDATE_PATH)
    }

    /// Returns true if both the base address and the secret are set.
    pub fn is_complete(&self) -> bool {
        !self.base_address.is_empty() && !self.api_key.is_empty()
    }

    /// Lists problems that would make delivery fail or be rejected.
    ///
    /// Sending does not consult this; it backs `config validate`.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.base_address.is_empty() {
            problems.push("base_address is not set".to_string());
        } else {
            match Url::parse(&self.update_url()) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => problems.push(format!(
                    "base_address uses unsupported scheme `{}`",
                    url.scheme()
                )),
                Err(e) => problems.push(format!("base_address is not a valid URL: {}", e)),
            }
        }
        if self.api_key.is_empty() {
            problems.push("api_key is not set".to_string());
        }
        problems
    }
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("base_address", &self.base_address)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
