//! Todo-Pilot - AI-assisted todo service with a companion article board
//!
//! Standalone REST server: model-backed extraction and summaries, user-scoped
//! todo CRUD, and a form-backed board surface.

use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::info;

use todo_pilot::auth;
use todo_pilot::config::ServerConfig;
use todo_pilot::handlers::{build_protected_routes, build_public_routes, AppStateInner};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_pilot=info,tower_http=info".into()),
        )
        .init();

    info!("Starting Todo-Pilot server...");

    // Load configuration from environment
    let server_config = ServerConfig::from_env();
    server_config.log();

    let state = Arc::new(AppStateInner::new(server_config.clone()));

    // Configure rate limiting from config
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(server_config.rate_limit_per_second)
        .burst_size(server_config.rate_limit_burst)
        .finish()
        .expect("Failed to build governor rate limiter configuration");

    let governor_layer = GovernorLayer::new(governor_conf);

    info!(
        "Rate limiting enabled: {} req/sec, burst of {}",
        server_config.rate_limit_per_second, server_config.rate_limit_burst
    );

    // Build CORS layer from configuration
    let cors = server_config.cors.to_layer();

    // Protected API routes: auth + rate limiting apply here only, so health
    // probes and the board stay reachable.
    let protected_routes = build_protected_routes(state.clone())
        .layer(axum::middleware::from_fn(auth::auth_middleware))
        .layer(governor_layer);

    let public_routes = build_public_routes(state.clone());

    let max_concurrent = server_config.max_concurrent_requests;
    info!("Concurrency limiting enabled: max_concurrent={max_concurrent}");

    let app = public_routes
        .merge(protected_routes)
        .layer(ConcurrencyLimitLayer::new(max_concurrent))
        .layer(cors);

    let addr = format!("{}:{}", server_config.host, server_config.port);
    info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
