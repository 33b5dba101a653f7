//! Error definitions for endpoint hosting.

use thiserror::Error;

/// Errors that can terminate endpoint setup, start, or a wait on the
/// resolved address.
///
/// The enum is `Clone` because a single terminal failure fans out to every
/// task waiting on the endpoint future.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// Invalid or unsupported endpoint hint (non-loopback address, multiple
    /// addresses, unparseable URL, missing TLS material for https).
    #[error("endpoint configuration error: {0}")]
    Configuration(String),

    /// Failure while assembling or booting the server.
    #[error("endpoint construction error: {0}")]
    Construction(String),

    /// Bound-address discovery reported zero or multiple addresses, or the
    /// server exited before publishing one.
    #[error("endpoint address discovery failed: {0}")]
    Discovery(String),

    /// Hosting is disabled, or shutdown happened before an address resolved.
    /// A deliberate outcome, not a fault; callers treat it as "no endpoint
    /// available".
    #[error("endpoint hosting was cancelled")]
    Cancelled,

    /// This caller's wait was cancelled. The future and other waiters are
    /// unaffected.
    #[error("wait for endpoint was cancelled")]
    WaitCancelled,
}
