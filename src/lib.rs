//! Splunk alert discovery and alert-state checks
//!
//! Polls the Splunk REST API for saved searches that are configured for
//! alert tracking and exposes them as targets, and checks over a bounded
//! time window whether such an alert fired.
//!
//! # Components
//!
//! - **splunk**: paginated client for saved searches and fired alerts
//! - **discovery**: projects tracked alerts into targets, cached between cycles
//! - **check**: per-check window with `atLeastOnce` / `allTheTime` policies
//! - **api**: HTTP endpoints for the host that schedules discovery and checks
//!
//! # Example
//!
//! ```no_run
//! use splunk_alerts::check::{AlertCheck, PrepareRequest};
//! use splunk_alerts::splunk::{ClientConfig, SplunkClient};
//! use std::sync::Arc;
//!
//! # async fn run(request: PrepareRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let client = SplunkClient::new(ClientConfig::new("https://splunk:8089", "token"))?;
//! let check = AlertCheck::new(Arc::new(client));
//!
//! let mut window = check.prepare(&request)?;
//! let result = check.status(&mut window).await?;
//! println!("completed={} error={:?}", result.completed, result.error);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod check;
pub mod config;
pub mod discovery;
pub mod splunk;

// Re-export commonly used types
pub use check::{AlertCheck, CheckError, CheckWindow, StatusResult};
pub use config::{ConfigError, ExtensionConfig};
pub use discovery::{AlertDiscovery, DiscoveryCache, Target};
pub use splunk::{SplunkClient, TransportError};
