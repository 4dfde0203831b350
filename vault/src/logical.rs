//! Logical read/list access to a Vault server.
//!
//! [`LogicalBackend`] is the seam between [`SecretClient`](crate::SecretClient)
//! and the store. [`HttpLogical`] is the production implementation; it only
//! knows the `/v1/<path>` endpoints and leaves auth, leases and versioning to
//! Vault itself.

use crate::{
    config::VaultConfig,
    error::{VaultError, VaultResult},
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use rust_common::{HttpConfig, build_http_client};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

/// Secret payload: string keys to arbitrary JSON values.
pub type SecretData = serde_json::Map<String, serde_json::Value>;

/// Envelope of a logical read or list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalSecret {
    /// Request identifier assigned by Vault
    #[serde(default)]
    pub request_id: String,
    /// Lease identifier, empty for static secrets
    #[serde(default)]
    pub lease_id: String,
    /// Lease duration in seconds
    #[serde(default)]
    pub lease_duration: u64,
    /// Whether the lease can be renewed
    #[serde(default)]
    pub renewable: bool,
    /// The secret payload; `None` means nothing is stored at the path
    #[serde(default)]
    pub data: Option<SecretData>,
    /// Non-fatal warnings attached by Vault
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// Read and list operations against a secret store.
///
/// `Ok(None)` means the store has nothing at `path`.
#[async_trait]
pub trait LogicalBackend: Send + Sync {
    /// Read the secret stored at `path`.
    async fn read(&self, path: &str) -> VaultResult<Option<LogicalSecret>>;

    /// List the entries below `path`.
    async fn list(&self, path: &str) -> VaultResult<Option<LogicalSecret>>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// HTTP implementation of [`LogicalBackend`].
pub struct HttpLogical {
    http: Client,
    base: Url,
    token: SecretString,
}

impl HttpLogical {
    /// Build the HTTP client for the given configuration.
    ///
    /// No request is sent.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidConfig`] when the address is not a URL,
    /// [`VaultError::Connection`] when the HTTP client cannot be built.
    pub fn new(config: &VaultConfig) -> VaultResult<Self> {
        let base = Url::parse(&config.addr).map_err(|e| {
            error!(addr = %config.addr, error = %e, "Invalid Vault address");
            VaultError::invalid_config(format!("address {:?}: {e}", config.addr))
        })?;
        if base.cannot_be_a_base() {
            error!(addr = %config.addr, "Vault address cannot carry a path");
            return Err(VaultError::invalid_config(format!(
                "address {:?} cannot carry a path",
                config.addr
            )));
        }

        let http_config = HttpConfig::default()
            .with_timeout(config.timeout)
            .with_insecure_tls(config.insecure);
        let http = build_http_client(&http_config).map_err(|e| {
            error!(error = %e, "Error connecting to Vault");
            VaultError::Connection(e)
        })?;

        Ok(Self {
            http,
            base,
            token: config.token.clone(),
        })
    }

    /// `<base>/v1/<path>` with every path segment percent-encoded, so `#`,
    /// `?` and `%` in a key stay part of the path.
    fn endpoint(&self, path: &str) -> VaultResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                VaultError::invalid_config(format!("address {} cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(path.split('/'));
        Ok(url)
    }

    async fn get(&self, path: &str, list: bool) -> VaultResult<Option<LogicalSecret>> {
        let url = self.endpoint(path)?;

        let mut request = self.http.get(url).header("X-Vault-Request", "true");
        let token = self.token.expose_secret();
        if !token.is_empty() {
            request = request.header("X-Vault-Token", token);
        }
        if list {
            request = request.query(&[("list", "true")]);
        }

        let response = request.send().await.map_err(|e| {
            error!(path, error = %e, "Error reading secret");
            VaultError::Transport(e)
        })?;

        Self::parse(path, response).await
    }

    async fn parse(path: &str, response: Response) -> VaultResult<Option<LogicalSecret>> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!(
                path,
                status = status.as_u16(),
                error = %e,
                "Error reading Vault response body"
            );
            VaultError::Transport(e)
        })?;

        if status == StatusCode::NOT_FOUND {
            // 404 bodies can still carry warnings.
            let secret = serde_json::from_slice::<LogicalSecret>(&body)
                .ok()
                .filter(|s| {
                    s.data.as_ref().is_some_and(|d| !d.is_empty())
                        || s.warnings.as_ref().is_some_and(|w| !w.is_empty())
                });
            debug!(path, found = secret.is_some(), "Vault returned 404");
            return Ok(secret);
        }

        if !status.is_success() {
            let errors = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.errors)
                .unwrap_or_else(|_| vec![String::from_utf8_lossy(&body).into_owned()]);
            error!(path, status = status.as_u16(), ?errors, "Error reading secret");
            return Err(VaultError::Remote {
                status: status.as_u16(),
                errors,
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&body).map(Some).map_err(|e| {
            error!(path, error = %e, "Error decoding Vault response");
            VaultError::Serialization(e)
        })
    }
}

#[async_trait]
impl LogicalBackend for HttpLogical {
    async fn read(&self, path: &str) -> VaultResult<Option<LogicalSecret>> {
        self.get(path, false).await
    }

    async fn list(&self, path: &str) -> VaultResult<Option<LogicalSecret>> {
        self.get(path, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_address() {
        let config = VaultConfig {
            addr: "https://exa mple:8200".to_string(),
            ..Default::default()
        };
        let result = HttpLogical::new(&config);
        assert!(matches!(result, Err(VaultError::InvalidConfig(_))));
    }

    #[test]
    fn test_endpoint_escapes_key_characters() {
        let backend = HttpLogical::new(&VaultConfig::new("http://127.0.0.1:8200")).unwrap();

        let url = backend.endpoint("secret/app#1").unwrap();
        assert_eq!(url.path(), "/v1/secret/app%231");
        assert_eq!(url.fragment(), None);

        let url = backend.endpoint("secret/a?b").unwrap();
        assert_eq!(url.path(), "/v1/secret/a%3Fb");
        assert_eq!(url.query(), None);

        let url = backend.endpoint("secret/apps/").unwrap();
        assert_eq!(url.path(), "/v1/secret/apps/");
    }

    #[test]
    fn test_endpoint_keeps_address_path() {
        let backend = HttpLogical::new(&VaultConfig::new("http://127.0.0.1:8200/vault")).unwrap();
        let url = backend.endpoint("secret/app1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8200/vault/v1/secret/app1");
    }

    #[test]
    fn test_new_does_not_contact_server() {
        let config = VaultConfig::new("https://127.0.0.1:1").with_insecure(true);
        assert!(HttpLogical::new(&config).is_ok());
    }

    #[test]
    fn test_envelope_defaults() {
        let secret: LogicalSecret =
            serde_json::from_str(r#"{"data":{"user":"bob"}}"#).unwrap();
        assert_eq!(secret.lease_duration, 0);
        assert!(!secret.renewable);
        assert_eq!(secret.data.unwrap()["user"], "bob");

        let empty: LogicalSecret = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(empty.data.is_none());
    }
}
