//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (grace period > 0)
//! - Reject half-specified TLS material
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//!
//! Endpoint URL hints are deliberately not validated here: the configurator
//! owns the loopback/single-candidate rules and reports them as
//! configuration errors at host construction.

use thiserror::Error;

use crate::config::schema::HostConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A zero grace period would make every shutdown abrupt.
    #[error("shutdown.grace_period_secs must be greater than zero")]
    ZeroGracePeriod,

    /// TLS was requested but a required path is empty.
    #[error("tls.{0} must not be empty")]
    EmptyTlsPath(&'static str),
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.shutdown.grace_period_secs == 0 {
        errors.push(ValidationError::ZeroGracePeriod);
    }

    if let Some(tls) = &config.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert_path"));
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key_path"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
