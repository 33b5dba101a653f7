//! Endpoint hosting subsystem.
//!
//! # Data Flow
//! ```text
//! BACKEND_ENDPOINT_URLS / config file
//!     → configurator.rs (hints → ListenDecision)
//!     → server.rs (build at construction, bind at start, HTTP/2-only)
//!     → host.rs (lifecycle coordination, exactly-one-address check)
//!     → future.rs (single-resolution advertised address)
//!     → any task: host.resolved_endpoint().await
//! ```
//!
//! # Design Decisions
//! - Two-phase lifecycle: construct synchronously, bind on start
//! - One coordinator per process; the future is the only synchronization
//!   point between the startup writer and address readers
//! - Disabled/external hosting modes pre-cancel the future instead of
//!   erroring

pub mod configurator;
pub mod future;
pub mod host;
pub mod server;

pub use configurator::{decide, ListenDecision, ListenerProtocol, Scheme};
pub use future::{EndpointFuture, ResolvedEndpoint};
pub use host::{EndpointHost, HostState};
pub use server::BackendServer;
