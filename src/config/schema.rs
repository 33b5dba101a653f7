//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the endpoint host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Hosting mode (local, disabled, external).
    pub hosting: HostingConfig,

    /// Endpoint bind hints.
    pub endpoint: EndpointConfig,

    /// Optional TLS material for an https endpoint.
    pub tls: Option<TlsConfig>,

    /// Shutdown behavior.
    pub shutdown: ShutdownConfig,
}

/// Hosting mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostingConfig {
    /// Whether this process hosts the endpoint at all.
    pub mode: HostingMode,
}

/// Whether the endpoint is hosted locally, turned off, or superseded by an
/// output mode that publishes the endpoint elsewhere. Only `Local` hosts a
/// listener; the other two modes pre-cancel the advertised address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostingMode {
    /// Host the endpoint in this process.
    #[default]
    Local,
    /// Explicit opt-out; no endpoint is hosted.
    Disabled,
    /// Another output mode supersedes local hosting.
    External,
}

/// Endpoint bind hints.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EndpointConfig {
    /// Candidate endpoint URLs. Absent or empty selects a loopback address
    /// with an OS-assigned port. At most one candidate is accepted, and it
    /// must be a loopback address.
    pub urls: Option<Vec<String>>,
}

/// TLS material for the listener. Paths only; loading happens at start.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Shutdown behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Grace period for draining connections on stop, in seconds.
    pub grace_period_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: HostConfig = toml::from_str("").unwrap();
        assert_eq!(config.hosting.mode, HostingMode::Local);
        assert!(config.endpoint.urls.is_none());
        assert!(config.tls.is_none());
        assert_eq!(config.shutdown.grace_period_secs, 10);
    }

    #[test]
    fn hosting_mode_parses_lowercase() {
        let config: HostConfig = toml::from_str("[hosting]\nmode = \"external\"\n").unwrap();
        assert_eq!(config.hosting.mode, HostingMode::External);
    }

    #[test]
    fn endpoint_urls_parse() {
        let config: HostConfig =
            toml::from_str("[endpoint]\nurls = [\"http://127.0.0.1:5050\"]\n").unwrap();
        assert_eq!(
            config.endpoint.urls.as_deref(),
            Some(&["http://127.0.0.1:5050".to_string()][..])
        );
    }
}
