//! Endpoint lifecycle coordination.
//!
//! # Data Flow
//! ```text
//! construction:
//!     hosting mode != local → future pre-cancelled, no server
//!     hints → configurator → BackendServer (built, not bound)
//!
//! start:
//!     bind → discover bound address(es) → exactly one → resolve future
//!                                       → zero/many  → fail future
//!
//! stop:
//!     cancel future (no-op once a result exists) → graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Explicit two-phase lifecycle: construct synchronously, bind on start,
//!   so stop-before-start races stay well-defined
//! - Exactly one logical writer commits the future; stop's cancel is a safe
//!   no-op after any commit
//! - Fail fast: fatal setup errors surface to the caller and are mirrored
//!   into the future so waiters fail identically instead of hanging

use std::net::SocketAddr;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use axum::Router;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::schema::{HostConfig, HostingMode};
use crate::endpoint::configurator::{self, ListenDecision};
use crate::endpoint::future::{EndpointFuture, ResolvedEndpoint};
use crate::endpoint::server::BackendServer;
use crate::error::EndpointError;

/// Lifecycle states of the endpoint host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// Hosting is administratively off; the future is pre-cancelled.
    /// Terminal.
    Disabled,
    /// Server constructed, not yet bound.
    Ready,
    /// Bind and address discovery in progress.
    Starting,
    /// Listener bound and the future resolved.
    Started,
    /// Start hit a fatal error; the future carries it.
    StartFailed,
    /// Draining connections.
    Stopping,
    /// Shut down.
    Stopped,
}

/// Coordinates the endpoint's start/stop sequence and owns the
/// single-resolution future for the advertised address.
///
/// One instance per process. Share via `Arc`; all operations take `&self`.
#[derive(Debug)]
pub struct EndpointHost {
    future: EndpointFuture,
    server: Mutex<Option<BackendServer>>,
    decision: Option<ListenDecision>,
    state: StdMutex<HostState>,
    grace: Duration,
}

impl EndpointHost {
    /// Build the host around the registered backend service.
    ///
    /// When the hosting mode is not `Local` the future is committed
    /// cancelled and no server is constructed; this path is cheap and
    /// side-effect-free. Construction failures are mirrored into the future
    /// before being returned, so waiters fail the same way the caller does.
    pub fn new(config: &HostConfig, service: Router) -> Result<Self, EndpointError> {
        let future = EndpointFuture::new();

        if config.hosting.mode != HostingMode::Local {
            tracing::info!(mode = ?config.hosting.mode, "endpoint hosting disabled");
            future.cancel();
            return Ok(Self {
                future,
                server: Mutex::new(None),
                decision: None,
                state: StdMutex::new(HostState::Disabled),
                grace: Duration::from_secs(config.shutdown.grace_period_secs),
            });
        }

        let hints = config.endpoint.urls.clone().unwrap_or_default();
        let decision = match configurator::decide(&hints) {
            Ok(decision) => decision,
            Err(e) => {
                future.fail(e.clone());
                return Err(e);
            }
        };

        let server = match BackendServer::new(decision.clone(), service, config.tls.clone()) {
            Ok(server) => server,
            Err(e) => {
                future.fail(e.clone());
                return Err(e);
            }
        };

        tracing::debug!(
            address = %decision.socket_addr(),
            scheme = %decision.scheme,
            "endpoint server constructed"
        );

        Ok(Self {
            future,
            server: Mutex::new(Some(server)),
            decision: Some(decision),
            state: StdMutex::new(HostState::Ready),
            grace: Duration::from_secs(config.shutdown.grace_period_secs),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HostState {
        *self.state.lock().expect("state lock poisoned")
    }

    fn set_state(&self, next: HostState) {
        let mut state = self.state.lock().expect("state lock poisoned");
        tracing::debug!(from = ?*state, to = ?next, "endpoint host state");
        *state = next;
    }

    /// Start the listener and resolve the advertised address.
    ///
    /// No-op when hosting is disabled. Exactly one bound address must be
    /// discovered; anything else fails the future and this call alike.
    pub async fn start(&self) -> Result<(), EndpointError> {
        let Some(decision) = &self.decision else {
            tracing::debug!("start skipped: no endpoint server constructed");
            return Ok(());
        };

        let mut slot = self.server.lock().await;
        let Some(server) = slot.as_mut() else {
            tracing::debug!("start skipped: endpoint server already taken down");
            return Ok(());
        };

        self.set_state(HostState::Starting);

        let discovered = server.start().await.and_then(expect_single_address);
        match discovered {
            Ok(bound) => {
                let endpoint = ResolvedEndpoint::new(decision.scheme, bound);
                if self.future.resolve(endpoint.clone()) {
                    self.set_state(HostState::Started);
                    tracing::info!(endpoint = %endpoint, "endpoint resolved");
                } else {
                    // Shutdown's cancel won the race; the address is bound
                    // but never advertised.
                    tracing::info!(
                        endpoint = %endpoint,
                        "endpoint bound after shutdown was requested; address not advertised"
                    );
                }
                Ok(())
            }
            Err(e) => {
                self.future.fail(e.clone());
                self.set_state(HostState::StartFailed);
                tracing::error!(error = %e, "endpoint start failed");
                Err(e)
            }
        }
    }

    /// Wait for the advertised endpoint address.
    ///
    /// All concurrent callers observe the same terminal outcome; the
    /// optional token cancels only this caller's wait. A `Cancelled` outcome
    /// means hosting is disabled or was shut down first — a legitimate
    /// "no endpoint available" signal, not a fault.
    pub async fn resolved_endpoint(
        &self,
        cancel: Option<CancellationToken>,
    ) -> Result<ResolvedEndpoint, EndpointError> {
        self.future.wait(cancel).await
    }

    /// Stop hosting.
    ///
    /// Cancels the future first (a no-op once a result exists), then drains
    /// the server within the configured grace period. Safe to call even if
    /// start never ran, never finished, or failed. The optional token
    /// abandons the drain early without waiting out the grace period.
    pub async fn stop(&self, cancel: Option<CancellationToken>) {
        self.future.cancel();

        let server = self.server.lock().await.take();
        let Some(mut server) = server else {
            if self.state() != HostState::Disabled {
                self.set_state(HostState::Stopped);
            }
            return;
        };

        self.set_state(HostState::Stopping);
        match cancel {
            Some(token) => {
                tokio::select! {
                    () = server.shutdown(Some(self.grace)) => {}
                    () = token.cancelled() => {
                        tracing::warn!("endpoint shutdown abandoned before draining finished");
                    }
                }
            }
            None => server.shutdown(Some(self.grace)).await,
        }
        self.set_state(HostState::Stopped);
    }
}

/// The platform must report exactly one bound address; anything else is a
/// fatal discovery error rather than something to guess around.
fn expect_single_address(addrs: Vec<SocketAddr>) -> Result<SocketAddr, EndpointError> {
    match addrs.as_slice() {
        [single] => Ok(*single),
        [] => Err(EndpointError::Discovery(
            "listener reported no bound address".to_string(),
        )),
        many => Err(EndpointError::Discovery(format!(
            "expected a single bound address, listener reported {}",
            many.len()
        ))),
    }
}
