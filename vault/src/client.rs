//! Secret reader built on a [`LogicalBackend`].

use crate::{
    config::{Resolved, VaultConfig},
    convert,
    error::{VaultError, VaultResult},
    logical::{HttpLogical, LogicalBackend, LogicalSecret, SecretData},
};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Reads and lists secrets below a mount prefix.
///
/// Every call goes to the backend; nothing is cached.
pub struct SecretClient<B = HttpLogical> {
    config: VaultConfig,
    backend: B,
}

impl SecretClient<HttpLogical> {
    /// Create a client from the process environment.
    ///
    /// Configuration warnings are returned alongside the client.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built; see [`SecretClient::new`].
    pub fn from_env() -> VaultResult<Resolved<Self>> {
        let Resolved { value, warnings } = VaultConfig::from_env();
        Ok(Resolved {
            value: Self::new(value)?,
            warnings,
        })
    }

    /// Create a client talking HTTP to `config.addr`.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidConfig`] for an unparseable address and
    /// [`VaultError::Connection`] when the HTTP client cannot be built.
    pub fn new(config: VaultConfig) -> VaultResult<Self> {
        let backend = HttpLogical::new(&config)?;
        info!(
            addr = %config.addr,
            storage = %config.storage,
            insecure = config.insecure,
            "Vault client initialized"
        );
        Ok(Self::with_backend(config, backend))
    }
}

impl<B: LogicalBackend> SecretClient<B> {
    /// Create a client over an arbitrary backend.
    pub const fn with_backend(config: VaultConfig, backend: B) -> Self {
        Self { config, backend }
    }

    /// The resolved configuration.
    pub const fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Full storage path for `key`.
    pub fn storage_path(&self, key: &str) -> String {
        self.config.storage_path(key)
    }

    /// Read the payload stored at `key`.
    ///
    /// # Errors
    ///
    /// [`VaultError::KeyNotFound`] when nothing is stored there, otherwise
    /// whatever the backend reports.
    #[instrument(skip(self), fields(path = %self.storage_path(key)))]
    pub async fn read(&self, key: &str) -> VaultResult<SecretData> {
        let secret = self.backend.read(&self.storage_path(key)).await?;
        Self::into_data(key, secret)
    }

    /// Raw payload stored at `key`.
    ///
    /// # Errors
    ///
    /// See [`SecretClient::read`].
    pub async fn get_plain_data(&self, key: &str) -> VaultResult<SecretData> {
        self.read(key).await
    }

    /// Same as [`SecretClient::get_plain_data`], kept for older callers.
    ///
    /// # Errors
    ///
    /// See [`SecretClient::read`].
    pub async fn get_plain_config(&self, key: &str) -> VaultResult<SecretData> {
        self.read(key).await
    }

    /// Payload stored at `key`, encoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`SecretClient::read`]; also [`VaultError::Serialization`].
    pub async fn get_json(&self, key: &str) -> VaultResult<Vec<u8>> {
        let data = self.read(key).await?;
        convert::to_json(&data).inspect_err(|e| warn!(key, error = %e, "Error marshalling secret"))
    }

    /// Payload stored at `key` with every value rendered as text bytes.
    ///
    /// Type information is lost; see [`convert::to_byte_map`].
    ///
    /// # Errors
    ///
    /// See [`SecretClient::read`].
    pub async fn get_config(&self, key: &str) -> VaultResult<HashMap<String, Vec<u8>>> {
        let data = self.read(key).await?;
        Ok(convert::to_byte_map(&data))
    }

    /// List the entries below `key`.
    ///
    /// The returned map is Vault's list payload, normally `{"keys": [...]}`.
    ///
    /// # Errors
    ///
    /// [`VaultError::KeyNotFound`] when nothing is listed there, otherwise
    /// whatever the backend reports.
    #[instrument(skip(self), fields(path = %self.storage_path(key)))]
    pub async fn list(&self, key: &str) -> VaultResult<SecretData> {
        let secret = self.backend.list(&self.storage_path(key)).await?;
        Self::into_data(key, secret)
    }

    /// Names listed below `key`. Entries ending in `/` are sub-folders.
    ///
    /// # Errors
    ///
    /// See [`SecretClient::list`].
    pub async fn list_keys(&self, key: &str) -> VaultResult<Vec<String>> {
        let data = self.list(key).await?;
        let keys = data
            .get("keys")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(keys)
    }

    fn into_data(key: &str, secret: Option<LogicalSecret>) -> VaultResult<SecretData> {
        let Some(secret) = secret else {
            debug!(key, "Key does not exist");
            return Err(VaultError::not_found(key));
        };

        for warning in secret.warnings.iter().flatten() {
            warn!(key, warning = %warning, "Vault warning");
        }

        secret.data.ok_or_else(|| {
            debug!(key, "Key has no data");
            VaultError::not_found(key)
        })
    }
}
