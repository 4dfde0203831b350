//! HTTP client configuration and building.
//!
//! Every outbound client in the workspace goes through [`build_http_client`]
//! so timeouts, user agent and TLS behaviour stay consistent.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Default request timeout, matching the Vault API client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 60s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Skip TLS certificate and hostname verification
    pub insecure_tls: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("vault-reader/", env!("CARGO_PKG_VERSION")).to_string(),
            insecure_tls: false,
        }
    }
}

impl HttpConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_insecure_tls(mut self, insecure: bool) -> Self {
        self.insecure_tls = insecure;
        self
    }
}

/// Build a configured HTTP client.
///
/// Uses rustls. When `insecure_tls` is set, certificates are not verified.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use rust_common::{HttpConfig, build_http_client};
///
/// let config = HttpConfig::default().with_insecure_tls(true);
/// let client = build_http_client(&config).expect("Failed to build client");
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    if config.insecure_tls {
        tracing::warn!("TLS certificate verification disabled");
    }

    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .use_rustls_tls()
        .danger_accept_invalid_certs(config.insecure_tls)
        .build()
}
