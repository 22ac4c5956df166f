//! Check parameters as sent by the host

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::CheckError;

pub const PARAM_DURATION: &str = "duration";
pub const PARAM_CHECK_NEW_ALERTS_ONLY: &str = "checkNewAlertsOnly";
pub const PARAM_EXPECTED_STATE: &str = "expectedState";
pub const PARAM_STATE_CHECK_MODE: &str = "stateCheckMode";

/// Whether the alert is expected to fire during the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedState {
    #[serde(rename = "alertFired")]
    Fired,
    #[serde(rename = "alertNotFired")]
    NotFired,
}

impl ExpectedState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedState::Fired => "alertFired",
            ExpectedState::NotFired => "alertNotFired",
        }
    }
}

impl FromStr for ExpectedState {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alertFired" => Ok(ExpectedState::Fired),
            "alertNotFired" => Ok(ExpectedState::NotFired),
            other => Err(CheckError::Config(format!(
                "unknown expected state '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ExpectedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often the observation has to match the expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateCheckMode {
    /// Matching on any tick suffices
    #[serde(rename = "atLeastOnce")]
    AtLeastOnce,
    /// Every tick has to match
    #[serde(rename = "allTheTime")]
    AllTheTime,
}

impl StateCheckMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateCheckMode::AtLeastOnce => "atLeastOnce",
            StateCheckMode::AllTheTime => "allTheTime",
        }
    }
}

impl FromStr for StateCheckMode {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atLeastOnce" => Ok(StateCheckMode::AtLeastOnce),
            "allTheTime" => Ok(StateCheckMode::AllTheTime),
            other => Err(CheckError::Config(format!(
                "unknown state check mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for StateCheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated check parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub duration: Duration,
    pub check_new_alerts_only: bool,
    pub expected_state: ExpectedState,
    pub mode: StateCheckMode,
}

impl CheckConfig {
    /// Parse the host's loosely typed parameter map.
    ///
    /// `duration` is in milliseconds and may arrive as a number or a numeric
    /// string; missing or empty `expectedState`/`stateCheckMode` is rejected.
    pub fn from_request(params: &serde_json::Map<String, Value>) -> Result<Self, CheckError> {
        let duration = Duration::from_millis(to_millis(params.get(PARAM_DURATION)));
        let check_new_alerts_only = to_bool(params.get(PARAM_CHECK_NEW_ALERTS_ONLY));

        let expected_state: ExpectedState = non_empty(params.get(PARAM_EXPECTED_STATE))
            .ok_or_else(|| CheckError::Config("expected state parameter is missing".to_string()))?
            .parse()?;

        let mode: StateCheckMode = non_empty(params.get(PARAM_STATE_CHECK_MODE))
            .ok_or_else(|| {
                CheckError::Config("expected state check mode parameter is missing".to_string())
            })?
            .parse()?;

        Ok(Self {
            duration,
            check_new_alerts_only,
            expected_state,
            mode,
        })
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn to_millis(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_or(0, |f| f.max(0.0) as u64),
        _ => 0,
    }
}

fn to_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim(), "true" | "1"),
        Some(Value::Number(n)) => n.as_i64().is_some_and(|i| i != 0),
        _ => false,
    }
}
