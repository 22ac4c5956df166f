//! Narrow capabilities consumed by discovery and the alert check.
//!
//! Both are implemented by [`SplunkClient`](super::SplunkClient); tests
//! supply in-memory stand-ins instead.

use async_trait::async_trait;

use super::client::TransportError;
use super::model::AlertRecord;

/// Lists saved searches that are configured for alert tracking
#[async_trait]
pub trait TrackedAlertSource: Send + Sync {
    async fn tracked_alerts(&self) -> Result<Vec<AlertRecord>, TransportError>;
}

/// Lists fired-alert events behind a saved search's alerts link
#[async_trait]
pub trait FiredAlertSource: Send + Sync {
    async fn fired_alerts(&self, url: &str) -> Result<Vec<AlertRecord>, TransportError>;
}
