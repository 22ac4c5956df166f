use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::config::CheckConfig;
use super::result::StatusResult;
use super::window::CheckWindow;
use crate::discovery::{ATTRIBUTE_ID, ATTRIBUTE_NAME, ATTRIBUTE_URL};
use crate::splunk::{FiredAlertSource, TransportError};

/// Prepare call payload: the selected target and the raw parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrepareRequest {
    pub target: TargetRef,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRef {
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl TargetRef {
    fn first(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Checks whether a Splunk alert fired within a time window
#[derive(Clone)]
pub struct AlertCheck {
    source: Arc<dyn FiredAlertSource>,
}

impl AlertCheck {
    pub fn new(source: Arc<dyn FiredAlertSource>) -> Self {
        Self { source }
    }

    /// Validate the request and open a window starting now
    pub fn prepare(&self, request: &PrepareRequest) -> Result<CheckWindow, CheckError> {
        self.prepare_at(request, Utc::now())
    }

    pub fn prepare_at(
        &self,
        request: &PrepareRequest,
        now: DateTime<Utc>,
    ) -> Result<CheckWindow, CheckError> {
        let target_id = request
            .target
            .first(ATTRIBUTE_ID)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CheckError::Config("target is missing the id attribute".to_string()))?;

        let config = CheckConfig::from_request(&request.config)?;
        let duration = chrono::Duration::from_std(config.duration)
            .map_err(|e| CheckError::Config(format!("invalid duration: {}", e)))?;
        let end = now
            .checked_add_signed(duration)
            .ok_or_else(|| CheckError::Config("duration out of range".to_string()))?;

        let window = CheckWindow {
            target_id: target_id.to_string(),
            target_name: request.target.first(ATTRIBUTE_NAME).unwrap_or_default().to_string(),
            fired_alerts_url: request.target.first(ATTRIBUTE_URL).unwrap_or_default().to_string(),
            start: now,
            end,
            check_new_alerts_only: config.check_new_alerts_only,
            expected_state: config.expected_state,
            mode: config.mode,
            success_latched: false,
            captured_trigger_time: None,
        };

        tracing::debug!(window = ?window, "Prepared alert check");
        Ok(window)
    }

    /// Nothing to do; the window opened at prepare time
    pub fn start(&self, _window: &CheckWindow) -> Result<(), CheckError> {
        Ok(())
    }

    /// Run one status tick against the current time
    pub async fn status(&self, window: &mut CheckWindow) -> Result<StatusResult, CheckError> {
        // Judge the tick at the time the fetch was issued
        let now = Utc::now();
        let fired = self.source.fired_alerts(&window.fired_alerts_url).await?;
        let result = window.evaluate(fired, now);

        if let Some(violation) = &result.error {
            tracing::info!(
                alert = %window.target_name,
                completed = result.completed,
                "{}",
                violation.title
            );
        }

        Ok(result)
    }
}

/// Alert check errors
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Invalid check configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
