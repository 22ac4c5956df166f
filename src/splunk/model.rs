//! Wire types for the Splunk REST collection responses

use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of a paginated collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub paging: Paging,
    #[serde(default, rename = "entry")]
    pub entries: Vec<AlertRecord>,
}

/// Paging block of a collection response
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Paging {
    /// Server-declared size of the full collection
    #[serde(default)]
    pub total: usize,
    #[serde(default, rename = "perPage")]
    pub per_page: usize,
    #[serde(default)]
    pub offset: usize,
}

/// A saved search or a fired alert event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: AlertContent,
    #[serde(default)]
    pub links: AlertLinks,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertContent {
    #[serde(default, rename = "alert.severity")]
    pub severity: Severity,
    /// Epoch seconds, 0 when the alert never fired
    #[serde(default)]
    pub trigger_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertLinks {
    /// Fired-alerts endpoint of a saved search
    #[serde(default)]
    pub alerts: String,
}

impl AlertRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.content.severity = severity;
        self
    }

    pub fn with_trigger_time(mut self, trigger_time: i64) -> Self {
        self.content.trigger_time = trigger_time;
        self
    }

    pub fn with_fired_alerts_url(mut self, url: impl Into<String>) -> Self {
        self.links.alerts = url.into();
        self
    }

    pub fn severity(&self) -> Severity {
        self.content.severity
    }

    pub fn trigger_time(&self) -> i64 {
        self.content.trigger_time
    }

    pub fn fired_alerts_url(&self) -> &str {
        &self.links.alerts
    }
}

/// Ordinal alert urgency, 1 (lowest) to 6 (highest)
///
/// Out-of-range ordinals are kept as-is and render as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(pub i64);

impl Severity {
    pub const DEBUG: Severity = Severity(1);
    pub const INFO: Severity = Severity(2);
    pub const WARN: Severity = Severity(3);
    pub const ERROR: Severity = Severity(4);
    pub const SEVERE: Severity = Severity(5);
    pub const FATAL: Severity = Severity(6);

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Debug",
            2 => "Info",
            3 => "Warn",
            4 => "Error",
            5 => "Severe",
            6 => "Fatal",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
