//! Shared library for cross-cutting concerns in the vault-reader workspace.
//!
//! This crate provides:
//! - HTTP client configuration and building
//! - Tracing subscriber setup for binaries embedding the reader

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http;
pub mod tracing_config;

pub use http::{HttpConfig, build_http_client};
pub use tracing_config::{LogFormat, TracingConfig, init_tracing};
