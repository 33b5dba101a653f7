//! Single-resolution future for the advertised endpoint address.
//!
//! # Responsibilities
//! - Hold the one terminal outcome of endpoint resolution
//! - Fan the outcome out to any number of waiting tasks
//! - Keep per-caller wait cancellation isolated from the future itself
//!
//! # Design Decisions
//! - Built on a watch channel: one committer, many independent subscribers
//! - First commit wins; later conflicting commits are no-ops
//! - Cancellation may be attempted idempotently during shutdown, even after
//!   a result exists
//! - A slow wait logs a warning but still completes normally

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::endpoint::configurator::Scheme;
use crate::error::EndpointError;

/// How long a caller may wait before a diagnostic warning is logged.
const SLOW_WAIT_WARNING: Duration = Duration::from_secs(2);

/// The advertised endpoint address. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    uri: String,
}

impl ResolvedEndpoint {
    /// Build the advertised URI from the listener scheme and the address the
    /// transport confirmed it bound.
    pub fn new(scheme: Scheme, addr: SocketAddr) -> Self {
        Self {
            uri: format!("{}://{}", scheme.as_str(), addr),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Terminal outcome of endpoint resolution.
pub type EndpointOutcome = Result<ResolvedEndpoint, EndpointError>;

/// Single-assignment future for the resolved endpoint.
///
/// Exactly one terminal outcome may ever be committed. Any number of tasks
/// may wait concurrently and all observe the same outcome.
#[derive(Debug)]
pub struct EndpointFuture {
    tx: watch::Sender<Option<EndpointOutcome>>,
}

impl EndpointFuture {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    fn commit(&self, outcome: EndpointOutcome) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        })
    }

    /// Commit a successful resolution. Returns false if an outcome already
    /// exists.
    pub fn resolve(&self, endpoint: ResolvedEndpoint) -> bool {
        self.commit(Ok(endpoint))
    }

    /// Commit a failure. Returns false if an outcome already exists.
    pub fn fail(&self, error: EndpointError) -> bool {
        self.commit(Err(error))
    }

    /// Attempt to cancel. No effect if a terminal outcome already exists;
    /// safe to call repeatedly during shutdown.
    pub fn cancel(&self) {
        self.commit(Err(EndpointError::Cancelled));
    }

    /// Current outcome, if one has been committed.
    pub fn peek(&self) -> Option<EndpointOutcome> {
        self.tx.borrow().clone()
    }

    /// Wait for the terminal outcome.
    ///
    /// Every concurrent waiter observes the same committed value. The
    /// optional token cancels only this caller's wait; the future and other
    /// waiters are untouched. A wait outlasting [`SLOW_WAIT_WARNING`] logs
    /// one warning and keeps waiting.
    pub async fn wait(&self, cancel: Option<CancellationToken>) -> EndpointOutcome {
        let mut rx = self.tx.subscribe();

        let existing = rx.borrow().clone();
        if let Some(outcome) = existing {
            return outcome;
        }

        let cancelled = async move {
            match cancel {
                Some(token) => token.cancelled_owned().await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(cancelled);

        let slow = tokio::time::sleep(SLOW_WAIT_WARNING);
        tokio::pin!(slow);
        let mut warned = false;

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        // Committer dropped without a result; hosting is gone.
                        return Err(EndpointError::Cancelled);
                    }
                    let outcome = rx.borrow_and_update().clone();
                    if let Some(outcome) = outcome {
                        return outcome;
                    }
                }
                () = &mut slow, if !warned => {
                    warned = true;
                    tracing::warn!(
                        waited = ?SLOW_WAIT_WARNING,
                        "endpoint resolution is taking longer than expected"
                    );
                }
                () = &mut cancelled => return Err(EndpointError::WaitCancelled),
            }
        }
    }
}

impl Default for EndpointFuture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddrV4};
    use std::sync::Arc;

    fn endpoint(port: u16) -> ResolvedEndpoint {
        ResolvedEndpoint::new(
            Scheme::Http,
            SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)),
        )
    }

    #[test]
    fn resolved_endpoint_formats_uri() {
        assert_eq!(endpoint(5050).as_str(), "http://127.0.0.1:5050");
    }

    #[tokio::test]
    async fn first_commit_wins() {
        let future = EndpointFuture::new();
        assert!(future.resolve(endpoint(1000)));
        assert!(!future.resolve(endpoint(2000)));
        assert!(!future.fail(EndpointError::Discovery("late".into())));
        assert_eq!(future.wait(None).await.unwrap(), endpoint(1000));
    }

    #[tokio::test]
    async fn cancel_after_resolve_is_noop() {
        let future = EndpointFuture::new();
        future.resolve(endpoint(1000));
        future.cancel();
        future.cancel();
        assert_eq!(future.wait(None).await.unwrap(), endpoint(1000));
    }

    #[tokio::test]
    async fn cancel_before_commit_sticks() {
        let future = EndpointFuture::new();
        future.cancel();
        assert!(!future.resolve(endpoint(1000)));
        assert_eq!(future.wait(None).await.unwrap_err(), EndpointError::Cancelled);
    }

    #[tokio::test]
    async fn all_waiters_observe_the_same_outcome() {
        let future = Arc::new(EndpointFuture::new());

        let mut waiters = Vec::new();
        for _ in 0..8 {
            let future = Arc::clone(&future);
            waiters.push(tokio::spawn(async move { future.wait(None).await }));
        }

        tokio::task::yield_now().await;
        future.resolve(endpoint(4242));

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap().unwrap(), endpoint(4242));
        }
    }

    #[tokio::test]
    async fn failure_fans_out_to_every_waiter() {
        let future = Arc::new(EndpointFuture::new());

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let future = Arc::clone(&future);
            waiters.push(tokio::spawn(async move { future.wait(None).await }));
        }

        tokio::task::yield_now().await;
        future.fail(EndpointError::Discovery("two addresses".into()));

        for waiter in waiters {
            assert_eq!(
                waiter.await.unwrap().unwrap_err(),
                EndpointError::Discovery("two addresses".into())
            );
        }
    }

    #[tokio::test]
    async fn wait_cancellation_is_caller_local() {
        let future = Arc::new(EndpointFuture::new());
        let token = CancellationToken::new();

        let cancelled_waiter = {
            let future = Arc::clone(&future);
            let token = token.clone();
            tokio::spawn(async move { future.wait(Some(token)).await })
        };
        let patient_waiter = {
            let future = Arc::clone(&future);
            tokio::spawn(async move { future.wait(None).await })
        };

        tokio::task::yield_now().await;
        token.cancel();
        assert_eq!(
            cancelled_waiter.await.unwrap().unwrap_err(),
            EndpointError::WaitCancelled
        );

        // The cancelled wait must not have corrupted the future.
        assert!(future.peek().is_none());
        future.resolve(endpoint(9000));
        assert_eq!(patient_waiter.await.unwrap().unwrap(), endpoint(9000));
    }
}
