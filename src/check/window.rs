use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::{ExpectedState, StateCheckMode};
use super::result::{format_trigger_time, CheckViolation, Metric, StatusResult};
use crate::splunk::AlertRecord;

/// State of one alert check between status ticks.
///
/// `success_latched` only ever goes from false to true, and
/// `captured_trigger_time` is written at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckWindow {
    pub target_id: String,
    pub target_name: String,
    pub fired_alerts_url: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub check_new_alerts_only: bool,
    pub expected_state: ExpectedState,
    pub mode: StateCheckMode,
    #[serde(default)]
    pub success_latched: bool,
    #[serde(default)]
    pub captured_trigger_time: Option<i64>,
}

impl CheckWindow {
    pub fn is_elapsed(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }

    /// Evaluate one tick's worth of fired events
    pub fn evaluate(&mut self, fired: Vec<AlertRecord>, now: DateTime<Utc>) -> StatusResult {
        let fired: Vec<AlertRecord> = if self.check_new_alerts_only {
            let start = self.start.timestamp();
            fired
                .into_iter()
                .filter(|alert| alert.trigger_time() > start)
                .collect()
        } else {
            fired
        };

        let completed = self.is_elapsed(now);
        let error = match self.mode {
            StateCheckMode::AllTheTime => self.check_all_the_time(&fired),
            StateCheckMode::AtLeastOnce => self.check_at_least_once(completed, &fired),
        };

        let metric = Metric::for_alert(
            &self.target_name,
            fired.first().map(AlertRecord::trigger_time),
            now,
        );

        StatusResult {
            completed,
            error,
            metrics: vec![metric],
        }
    }

    fn check_all_the_time(&self, fired: &[AlertRecord]) -> Option<CheckViolation> {
        match (self.expected_state, fired.first()) {
            (ExpectedState::NotFired, Some(first)) => {
                Some(self.fired_but_should_not(first.trigger_time()))
            }
            (ExpectedState::Fired, None) => Some(CheckViolation::failed(format!(
                "Alert \"{}\" should have been fired all the time but was not.",
                self.target_name
            ))),
            _ => None,
        }
    }

    fn check_at_least_once(
        &mut self,
        completed: bool,
        fired: &[AlertRecord],
    ) -> Option<CheckViolation> {
        let matches = match self.expected_state {
            ExpectedState::NotFired => fired.is_empty(),
            ExpectedState::Fired => !fired.is_empty(),
        };
        if matches {
            self.success_latched = true;
        }

        if self.expected_state == ExpectedState::NotFired && self.captured_trigger_time.is_none() {
            self.captured_trigger_time = fired.first().map(AlertRecord::trigger_time);
        }

        if !completed || self.success_latched {
            return None;
        }

        Some(match self.expected_state {
            ExpectedState::NotFired => {
                self.fired_but_should_not(self.captured_trigger_time.unwrap_or_default())
            }
            ExpectedState::Fired => CheckViolation::failed(format!(
                "Alert \"{}\" should have been fired but was not.",
                self.target_name
            )),
        })
    }

    fn fired_but_should_not(&self, trigger_time: i64) -> CheckViolation {
        CheckViolation::failed(format!(
            "Alert \"{}\" should not have been fired but was at {}.",
            self.target_name,
            format_trigger_time(trigger_time)
        ))
    }
}
