//! Splunk alerts extension server
//!
//! Run with: cargo run
//!
//! Configuration is read from `STEADYBIT_EXTENSION_*` environment variables,
//! see [`splunk_alerts::config`]. Log level via RUST_LOG (default: info).

use splunk_alerts::api::run_server;
use splunk_alerts::ExtensionConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "splunk_alerts=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExtensionConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Failed to parse configuration from environment");
        e
    })?;

    tracing::info!("Splunk alerts extension configuration:");
    tracing::info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  Listen: {}:{}", config.host, config.port);
    tracing::info!("  Splunk API: {}", config.api_base_url);
    tracing::info!("  Insecure skip verify: {}", config.insecure_skip_verify);
    tracing::info!("  Request timeout: {:?}", config.request_timeout);
    if !config.discovery_attributes_excludes_alert.is_empty() {
        tracing::info!(
            "  Excluded attributes: {}",
            config.discovery_attributes_excludes_alert.join(", ")
        );
    }

    run_server(config).await
}
