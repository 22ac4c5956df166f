//! Status tick results

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const METRIC_ID: &str = "splunk.alert.metric.id";
pub const METRIC_LABEL: &str = "splunk.alert.metric.label";
pub const METRIC_STATE: &str = "splunk.alert.metric.severity";
pub const METRIC_TOOLTIP: &str = "splunk.alert.metric.tooltip";
pub const METRIC_TRIGGER_TIME: &str = "splunk.alert.metric.triggerTime";

/// Outcome of one status tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
    /// The check window has elapsed
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CheckViolation>,
    pub metrics: Vec<Metric>,
}

/// The expected temporal condition was not met
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckViolation {
    pub title: String,
    pub status: ViolationStatus,
}

impl CheckViolation {
    pub fn failed(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: ViolationStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationStatus {
    Failed,
}

/// One state-over-time sample for the alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub metric: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Metric {
    /// Sample for `alert_name`, populated from the most recent fired event
    pub fn for_alert(alert_name: &str, last_trigger_time: Option<i64>, now: DateTime<Utc>) -> Self {
        let (state, tooltip, trigger_time) = match last_trigger_time {
            Some(secs) => {
                let at = format_trigger_time(secs);
                (
                    "success".to_string(),
                    format!("Splunk Alert \"{}\" fired at {}", alert_name, at),
                    at,
                )
            }
            None => (String::new(), String::new(), String::new()),
        };

        let mut metric = BTreeMap::new();
        metric.insert(METRIC_ID.to_string(), alert_name.to_string());
        metric.insert(METRIC_LABEL.to_string(), alert_name.to_string());
        metric.insert(METRIC_STATE.to_string(), state);
        metric.insert(METRIC_TOOLTIP.to_string(), tooltip);
        metric.insert(METRIC_TRIGGER_TIME.to_string(), trigger_time);

        Self {
            name: format!("Splunk Alert {}", alert_name),
            metric,
            timestamp: now,
            value: 0.0,
        }
    }
}

/// Render epoch seconds as an RFC3339 UTC timestamp
pub fn format_trigger_time(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_trigger_time() {
        assert_eq!(format_trigger_time(946684800), "2000-01-01T00:00:00Z");
        assert_eq!(format_trigger_time(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_metric_with_fired_event() {
        let now = Utc::now();
        let metric = Metric::for_alert("Disk Full", Some(946684800), now);

        assert_eq!(metric.name, "Splunk Alert Disk Full");
        assert_eq!(metric.timestamp, now);
        assert_eq!(metric.metric[METRIC_ID], "Disk Full");
        assert_eq!(metric.metric[METRIC_LABEL], "Disk Full");
        assert_eq!(metric.metric[METRIC_STATE], "success");
        assert_eq!(
            metric.metric[METRIC_TOOLTIP],
            "Splunk Alert \"Disk Full\" fired at 2000-01-01T00:00:00Z"
        );
        assert_eq!(metric.metric[METRIC_TRIGGER_TIME], "2000-01-01T00:00:00Z");
    }

    #[test]
    fn test_metric_without_fired_event() {
        let metric = Metric::for_alert("Disk Full", None, Utc::now());

        assert_eq!(metric.metric.len(), 5);
        assert_eq!(metric.metric[METRIC_STATE], "");
        assert_eq!(metric.metric[METRIC_TOOLTIP], "");
        assert_eq!(metric.metric[METRIC_TRIGGER_TIME], "");
    }
}
