//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → env overlay (BACKEND_ENDPOINT_URLS wins over the file)
//!     → validation.rs (semantic checks)
//!     → HostConfig (validated, immutable)
//!     → consumed once at host construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; endpoint hints are read exactly once
//! - All fields have defaults so an absent file still yields a runnable host
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ENDPOINT_URLS_ENV};
pub use schema::{
    EndpointConfig, HostConfig, HostingConfig, HostingMode, ShutdownConfig, TlsConfig,
};
