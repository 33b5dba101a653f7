//! Shared utilities for integration testing.

use axum::routing::get;
use axum::{Json, Router};

use endpoint_host::HostConfig;

/// Build a minimal backend service with a single JSON handler.
pub fn service_router() -> Router {
    Router::new().route(
        "/status",
        get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
    )
}

/// Host config with local hosting and the given endpoint hints.
#[allow(dead_code)]
pub fn host_config(urls: Option<Vec<&str>>) -> HostConfig {
    let mut config = HostConfig::default();
    config.endpoint.urls = urls.map(|urls| urls.into_iter().map(String::from).collect());
    config
}
