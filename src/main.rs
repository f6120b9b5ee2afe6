// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::remote_source::RemoteReadingSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;

    // Create reading source (infrastructure layer)
    let source = Arc::new(RemoteReadingSource::new(config.source.base_url.clone()));

    // Create service (application layer)
    let dashboard_service = DashboardService::new(source, config.source.default_key.clone());
    let refresher = dashboard_service.spawn_auto_refresh(config.dashboard.refresh_interval());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        refresh_interval_secs: config.dashboard.refresh_interval_secs,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    tracing::info!(
        "Starting fetalalert dashboard on http://{} (refresh every {}s)",
        listener.local_addr()?,
        config.dashboard.refresh_interval_secs
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresher.abort();
    tracing::info!("Dashboard stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
