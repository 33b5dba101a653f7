//! Local Backend Endpoint Host
//!
//! Hosts a loopback-only HTTP/2 endpoint for a single backend service and
//! publishes the bound address exactly once through a single-resolution
//! future.
//!
//! # Architecture Overview
//!
//! ```text
//!  BACKEND_ENDPOINT_URLS / TOML file
//!        │
//!        ▼
//!  ┌──────────────┐   ListenDecision   ┌───────────────┐
//!  │ configurator │───────────────────▶│ BackendServer │◀── service Router
//!  └──────────────┘                    └───────┬───────┘
//!                                              │ start (bind, HTTP/2-only)
//!                                              ▼
//!  ┌──────────────┐   bound address    ┌───────────────┐
//!  │ EndpointHost │◀───────────────────│   transport   │
//!  └──────┬───────┘                    └───────────────┘
//!         │ resolve exactly once
//!         ▼
//!  EndpointFuture ──▶ resolved_endpoint().await  (any number of tasks)
//! ```

pub mod config;
pub mod endpoint;
pub mod error;

pub use config::HostConfig;
pub use endpoint::{EndpointHost, HostState, ResolvedEndpoint};
pub use error::EndpointError;
