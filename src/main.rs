use std::path::Path;

use axum::routing::get;
use axum::{Json, Router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use endpoint_host::config::{self, HostConfig};
use endpoint_host::endpoint::EndpointHost;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "endpoint_host=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("endpoint-host v0.1.0 starting");

    // Load configuration; a missing file falls back to defaults plus the
    // environment overlay.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "endpoint-host.toml".to_string());
    let config = if Path::new(&config_path).exists() {
        config::load_config(Path::new(&config_path))?
    } else {
        let mut config = HostConfig::default();
        config::loader::apply_env_overlay(&mut config);
        config
    };

    tracing::info!(
        mode = ?config.hosting.mode,
        endpoint_urls = ?config.endpoint.urls,
        grace_period_secs = config.shutdown.grace_period_secs,
        "Configuration loaded"
    );

    let host = EndpointHost::new(&config, status_service())?;
    host.start().await?;

    match host.resolved_endpoint(None).await {
        Ok(endpoint) => tracing::info!(endpoint = %endpoint, "backend service available"),
        Err(e) => tracing::info!(reason = %e, "no endpoint advertised"),
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    host.stop(None).await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Placeholder backend service: a single JSON status handler.
fn status_service() -> Router {
    Router::new().route(
        "/status",
        get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
    )
}
