//! Vault reader configuration.
//!
//! [`VaultConfig`] is a plain struct handed to
//! [`SecretClient::new`](crate::SecretClient::new). Reading the process
//! environment is a separate step ([`VaultConfig::from_env`]) that never
//! fails: bad values fall back to defaults and are reported as
//! [`ConfigWarning`]s next to the resolved config.

use secrecy::SecretString;
use std::{fmt, time::Duration};
use tracing::warn;

/// Server address variable.
pub const ENV_ADDR: &str = "VAULT_ADDR";
/// TLS verification switch variable.
pub const ENV_INSECURE: &str = "VAULT_INSECURE";
/// Mount prefix variable.
pub const ENV_STORAGE: &str = "VAULT_STORAGE";
/// Auth token variable.
pub const ENV_TOKEN: &str = "VAULT_TOKEN";

/// Loopback address used when no address is configured.
pub const DEFAULT_ADDR: &str = "https://127.0.0.1:8200";
/// Mount prefix used when none is configured.
pub const DEFAULT_STORAGE: &str = "secret/";

/// Vault reader configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server base address, without trailing slash
    pub addr: String,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Mount prefix, always ending in a single `/`
    pub storage: String,
    /// Token sent as `X-Vault-Token`; empty means unauthenticated
    pub token: SecretString,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            insecure: false,
            storage: DEFAULT_STORAGE.to_string(),
            token: SecretString::from(String::new()),
            timeout: rust_common::http::DEFAULT_TIMEOUT,
        }
    }
}

impl VaultConfig {
    /// Create a configuration for the given address with default settings.
    #[must_use]
    pub fn new(addr: impl AsRef<str>) -> Self {
        Self {
            addr: normalize_addr(addr.as_ref()),
            ..Default::default()
        }
    }

    /// Set TLS verification.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set the mount prefix; a trailing `/` is appended when missing.
    #[must_use]
    pub fn with_storage(mut self, storage: impl AsRef<str>) -> Self {
        self.storage = normalize_storage(storage.as_ref());
        self
    }

    /// Set the auth token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = SecretString::from(token.into());
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full storage path for a logical key. The key is not escaped.
    #[must_use]
    pub fn storage_path(&self, key: &str) -> String {
        format!("{}{key}", self.storage)
    }

    /// Resolve the configuration from the process environment.
    ///
    /// Reads `VAULT_ADDR`, `VAULT_INSECURE`, `VAULT_STORAGE` and `VAULT_TOKEN`.
    #[must_use]
    pub fn from_env() -> Resolved<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Resolved<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let addr = lookup(ENV_ADDR)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| DEFAULT_ADDR.to_string(), |v| normalize_addr(&v));

        let insecure = match lookup(ENV_INSECURE) {
            None => false,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warnings.push(ConfigWarning::InvalidInsecureFlag { value: raw });
                false
            }),
        };

        let storage = normalize_storage(&lookup(ENV_STORAGE).unwrap_or_default());
        let token = SecretString::from(lookup(ENV_TOKEN).unwrap_or_default());

        for warning in &warnings {
            warn!(%warning, "Vault configuration value ignored");
        }

        Resolved {
            value: Self {
                addr,
                insecure,
                storage,
                token,
                ..Default::default()
            },
            warnings,
        }
    }
}

/// A configuration value paired with the warnings raised while resolving it.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Values that were ignored in favour of defaults
    pub warnings: Vec<ConfigWarning>,
}

impl<T> Resolved<T> {
    /// Whether every configured value was used as given.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Drop the warnings.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// A configuration value that was present but could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `VAULT_INSECURE` was not a boolean; TLS verification stays on
    InvalidInsecureFlag {
        /// The raw value
        value: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInsecureFlag { value } => {
                write!(f, "{ENV_INSECURE}={value:?} is not a boolean, using false")
            }
        }
    }
}

/// Parse a boolean the way Vault tooling does: `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Empty becomes [`DEFAULT_STORAGE`]; otherwise one `/` is appended if missing.
#[must_use]
pub fn normalize_storage(raw: &str) -> String {
    if raw.is_empty() {
        DEFAULT_STORAGE.to_string()
    } else if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    }
}

fn normalize_addr(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
