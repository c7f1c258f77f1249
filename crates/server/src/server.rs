//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (request ids, logging, compression, CORS)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{analytics, estimate, exports, health};
use crate::routes::{api_info, method_not_allowed, not_found};
use crate::state::ServerState;
use crate::telemetry;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the Axum router with all routes and middleware
///
/// Every `/api/*` path answers other methods with 405 and
/// `{"error":"Method not allowed"}`; unknown paths get 404.
///
/// Middleware stack (outermost first):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS
/// 5. Compression
/// 6. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics));

    let api_routes = Router::new()
        .route(
            "/api/estimate",
            post(estimate::estimate).fallback(method_not_allowed),
        )
        .route(
            "/api/export",
            post(exports::export_to_sheet).fallback(method_not_allowed),
        )
        .route(
            "/api/export/csv",
            post(exports::export_csv).fallback(method_not_allowed),
        )
        .route(
            "/api/analytics",
            get(analytics::analytics_summary).fallback(method_not_allowed),
        )
        .route(
            "/api/metadata",
            get(health::server_metadata).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the adforecast HTTP server
///
/// Blocks until the server is shut down via SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
///
/// Initialization:
/// 1. JSON logging filtered at the configured level
/// 2. Prometheus recorder, when metrics are enabled
/// 3. Keyword provider, fallback table and export sink from the environment
/// 4. Router, TCP bind, serve with graceful shutdown
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let mut state = ServerState::from_env(config.clone())?;
    if config.metrics_enabled {
        state = state.with_prometheus(telemetry::install_recorder()?);
    }
    let live_metrics = state.provider.is_available();
    let export_configured = state.sink.destination().is_some();
    let fallback_entries = state.fallback.len();

    let app = build_router(Arc::new(state));
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        %addr,
        live_metrics,
        export_configured,
        fallback_entries,
        "starting adforecast server"
    );
    tracing::info!(
        timeout_secs = config.timeout_secs,
        max_body_size_mb = config.max_body_size_mb,
        provider_timeout_secs = config.provider_timeout_secs,
        cors = config.enable_cors,
        metrics = config.metrics_enabled,
        "server limits"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
