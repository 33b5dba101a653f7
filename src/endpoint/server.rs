//! Backend server wrapper.
//!
//! # Responsibilities
//! - Build the serving stack from a listen decision and one registered
//!   service
//! - Start the accept loop; no binding happens at construction time
//! - Report the bound address(es) once the transport confirms binding
//! - Graceful shutdown within a caller-supplied grace period
//!
//! # Design Decisions
//! - HTTP/2-only framing is fixed on the listener (prior knowledge on
//!   plaintext, ALPN on TLS); there is no per-connection upgrade path
//! - TLS material is loaded at start, not construction, so construction
//!   stays synchronous and side-effect-free
//! - The serve task is owned here so shutdown can await its exit

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::config::schema::TlsConfig;
use crate::endpoint::configurator::{ListenDecision, Scheme};
use crate::error::EndpointError;

/// Server hosting the single registered backend service.
///
/// Construction performs no network I/O; `start` binds and begins serving.
#[derive(Debug)]
pub struct BackendServer {
    decision: ListenDecision,
    service: Option<Router>,
    tls: Option<TlsConfig>,
    handle: Handle,
    serve_task: Option<JoinHandle<std::io::Result<()>>>,
}

impl BackendServer {
    /// Assemble the server around the registered service.
    ///
    /// An https decision without TLS material is rejected here, before any
    /// listener exists.
    pub fn new(
        decision: ListenDecision,
        service: Router,
        tls: Option<TlsConfig>,
    ) -> Result<Self, EndpointError> {
        if decision.scheme == Scheme::Https && tls.is_none() {
            return Err(EndpointError::Configuration(
                "https endpoint requires [tls] certificate paths".to_string(),
            ));
        }

        Ok(Self {
            decision,
            service: Some(service.layer(TraceLayer::new_for_http())),
            tls,
            handle: Handle::new(),
            serve_task: None,
        })
    }

    /// Bind the listener and start serving.
    ///
    /// Returns the address(es) the transport reports once it is listening.
    /// A server that exits before publishing an address surfaces as a
    /// discovery error carrying the underlying I/O failure.
    pub async fn start(&mut self) -> Result<Vec<SocketAddr>, EndpointError> {
        let service = self.service.take().ok_or_else(|| {
            EndpointError::Construction("server was already started".to_string())
        })?;

        let addr = self.decision.socket_addr();
        let handle = self.handle.clone();
        let make_service = service.into_make_service();

        let task = if self.decision.scheme == Scheme::Https {
            let tls = self.tls.as_ref().ok_or_else(|| {
                EndpointError::Configuration(
                    "https endpoint requires [tls] certificate paths".to_string(),
                )
            })?;
            let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .map_err(|e| {
                    EndpointError::Construction(format!("failed to load TLS material: {e}"))
                })?;
            let mut server = axum_server::bind_rustls(addr, rustls).handle(handle);
            let builder = server.http_builder().clone().http2_only();
            *server.http_builder() = builder;
            tokio::spawn(server.serve(make_service))
        } else {
            let mut server = axum_server::bind(addr).handle(handle);
            let builder = server.http_builder().clone().http2_only();
            *server.http_builder() = builder;
            tokio::spawn(server.serve(make_service))
        };
        self.serve_task = Some(task);

        match self.handle.listening().await {
            Some(bound) => {
                tracing::info!(
                    address = %bound,
                    scheme = %self.decision.scheme,
                    "listener bound"
                );
                Ok(vec![bound])
            }
            None => {
                // The serve task exited before publishing an address; its
                // error is the most useful diagnostic we have.
                let detail = match self.serve_task.take() {
                    Some(task) => match task.await {
                        Ok(Err(e)) => e.to_string(),
                        Ok(Ok(())) => "server exited before binding".to_string(),
                        Err(e) => format!("serve task failed: {e}"),
                    },
                    None => "server exited before binding".to_string(),
                };
                Err(EndpointError::Discovery(detail))
            }
        }
    }

    /// Orderly shutdown: stop accepting, drain within the grace period, then
    /// wait for the serve task to exit. Safe to call if start never ran.
    pub async fn shutdown(&mut self, grace: Option<Duration>) {
        self.handle.graceful_shutdown(grace);

        if let Some(task) = self.serve_task.take() {
            match task.await {
                Ok(Ok(())) => tracing::info!("endpoint server stopped"),
                Ok(Err(e)) => tracing::warn!(error = %e, "endpoint server exited with error"),
                Err(e) => tracing::warn!(error = %e, "endpoint serve task failed"),
            }
        }
    }
}
