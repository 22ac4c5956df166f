use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    check_status, describe_attributes, describe_check, describe_discovery, describe_target,
    discovered_targets, health_check, index, prepare_check, start_check, AppState,
};
use crate::check::AlertCheck;
use crate::config::ExtensionConfig;
use crate::discovery::{AlertDiscovery, DiscoveryCache, DEFAULT_REFRESH_INTERVAL};
use crate::splunk::SplunkClient;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub discovery_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            discovery_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl From<&ExtensionConfig> for ServerConfig {
    fn from(config: &ExtensionConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            ..Default::default()
        }
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        // Discovery
        .route("/discovery", get(describe_discovery))
        .route("/discovery/target-description", get(describe_target))
        .route("/discovery/attribute-descriptions", get(describe_attributes))
        .route("/discovery/targets", get(discovered_targets))
        // Alert check
        .route("/actions/check", get(describe_check))
        .route("/actions/check/prepare", post(prepare_check))
        .route("/actions/check/start", post(start_check))
        .route("/actions/check/status", post(check_status))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: ExtensionConfig) -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from(&config);

    // One client shared by discovery and every check
    let client = Arc::new(SplunkClient::new(config.client_config())?);

    let discovery = AlertDiscovery::new(
        client.clone(),
        config.discovery_attributes_excludes_alert.clone(),
    );
    let cache = Arc::new(DiscoveryCache::new(
        discovery,
        server_config.discovery_interval,
    ));
    let refresh_handle = Arc::clone(&cache).start();

    let state = Arc::new(AppState {
        discovery: Arc::clone(&cache),
        check: AlertCheck::new(client),
    });

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port).parse()?;
    tracing::info!("Starting extension server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&cache)))
        .await?;

    refresh_handle.abort();

    tracing::info!("Extension server stopped");
    Ok(())
}

async fn shutdown_signal(cache: Arc<DiscoveryCache>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, stopping discovery refresher...");
    cache.stop();
}
