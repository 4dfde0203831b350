//! HashiCorp Vault secret reader.
//!
//! Configuration comes from `VAULT_ADDR`, `VAULT_INSECURE`, `VAULT_STORAGE`
//! and `VAULT_TOKEN`. Secrets are read from `<storage><key>` and returned as
//! raw maps, JSON bytes or byte maps.
//!
//! ```no_run
//! use vault_reader::SecretClient;
//!
//! # async fn run() -> vault_reader::VaultResult<()> {
//! let client = SecretClient::from_env()?.into_inner();
//! let data = client.get_plain_data("app1").await?;
//! println!("user = {}", data["user"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod logical;

pub use client::SecretClient;
pub use config::{ConfigWarning, Resolved, VaultConfig};
pub use error::{VaultError, VaultResult};
pub use logical::{HttpLogical, LogicalBackend, LogicalSecret, SecretData};
