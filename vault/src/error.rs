//! Vault reader error types using thiserror 2.0.
//!
//! Configuration problems never surface here: they are defaulted and
//! reported as [`ConfigWarning`](crate::config::ConfigWarning)s instead.

use thiserror::Error;

/// Vault reader errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The HTTP client could not be constructed
    #[error("Error connecting to Vault: {0}")]
    Connection(#[source] reqwest::Error),

    /// Invalid configuration (e.g. an address that is not a URL)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Nothing is stored at the requested key
    #[error("Key {0} does not exist")]
    KeyNotFound(String),

    /// Request could not be sent or its response not received
    #[error("Error reading secret: {0}")]
    Transport(#[from] reqwest::Error),

    /// Vault answered with a non-success status
    #[error("Vault returned status {status}: {}", errors.join("; "))]
    Remote {
        /// HTTP status code
        status: u16,
        /// Messages from the `errors` array of the response body
        errors: Vec<String>,
    },

    /// Serialization error
    #[error("Error marshalling secret: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Whether the error means "no data at this key".
    ///
    /// Callers usually treat this as a normal outcome rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// Create a key not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound(key.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_carries_key() {
        let err = VaultError::not_found("missing");
        assert_eq!(err.to_string(), "Key missing does not exist");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remote_display() {
        let err = VaultError::Remote {
            status: 403,
            errors: vec!["permission denied".to_string(), "bad token".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Vault returned status 403: permission denied; bad token"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: VaultError = serde_err.into();
        assert!(matches!(err, VaultError::Serialization(_)));
    }
}
