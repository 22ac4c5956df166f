//! Host-facing description of the alert check action

use serde::{Deserialize, Serialize};

use super::config::{
    ExpectedState, StateCheckMode, PARAM_CHECK_NEW_ALERTS_ONLY, PARAM_DURATION,
    PARAM_EXPECTED_STATE, PARAM_STATE_CHECK_MODE,
};
use super::result::{METRIC_ID, METRIC_LABEL, METRIC_STATE, METRIC_TOOLTIP};
use crate::discovery::{ATTRIBUTE_NAME, TARGET_TYPE};

pub const ACTION_ID: &str = "com.steadybit.extension_splunk_platform.alert.check";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescription {
    pub id: String,
    pub label: String,
    pub description: String,
    pub version: String,
    pub technology: String,
    pub category: String,
    pub kind: String,
    pub time_control: String,
    pub target_selection: TargetSelection,
    pub parameters: Vec<ActionParameter>,
    pub widgets: Vec<serde_json::Value>,
    /// How often the host calls status
    pub status_call_interval: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSelection {
    pub target_type: String,
    pub quantity_restriction: String,
    pub selection_templates: Vec<SelectionTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionTemplate {
    pub label: String,
    pub description: String,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub default_value: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterOption {
    pub label: String,
    pub value: String,
}

impl ActionParameter {
    fn new(name: &str, label: &str, kind: &str, default_value: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: None,
            kind: kind.to_string(),
            default_value: default_value.to_string(),
            required: true,
            options: Vec::new(),
        }
    }

    fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn with_option(mut self, label: &str, value: &str) -> Self {
        self.options.push(ParameterOption {
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }
}

pub fn action_description() -> ActionDescription {
    ActionDescription {
        id: ACTION_ID.to_string(),
        label: "Alert Status".to_string(),
        description: "Check the status of an alert.".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        technology: "Splunk".to_string(),
        category: "Monitoring".to_string(),
        kind: "check".to_string(),
        time_control: "internal".to_string(),
        target_selection: TargetSelection {
            target_type: TARGET_TYPE.to_string(),
            quantity_restriction: "all".to_string(),
            selection_templates: vec![SelectionTemplate {
                label: "Alert name".to_string(),
                description: "Find alert by name".to_string(),
                query: format!("{}=\"\"", ATTRIBUTE_NAME),
            }],
        },
        parameters: vec![
            ActionParameter::new(PARAM_DURATION, "Duration", "duration", "30s"),
            ActionParameter::new(
                PARAM_CHECK_NEW_ALERTS_ONLY,
                "New Alerts Only",
                "boolean",
                "false",
            )
            .with_description("Only check events fired after the start of the experiment."),
            ActionParameter::new(
                PARAM_EXPECTED_STATE,
                "Expected State",
                "string",
                ExpectedState::Fired.as_str(),
            )
            .with_option("Alert fired", ExpectedState::Fired.as_str())
            .with_option("Alert not fired", ExpectedState::NotFired.as_str()),
            ActionParameter::new(
                PARAM_STATE_CHECK_MODE,
                "State Check Mode",
                "string",
                StateCheckMode::AtLeastOnce.as_str(),
            )
            .with_description("How often should the observed state match the expectation?")
            .with_option("All the time", StateCheckMode::AllTheTime.as_str())
            .with_option("At least once", StateCheckMode::AtLeastOnce.as_str()),
        ],
        widgets: vec![serde_json::json!({
            "type": "com.steadybit.widget.state_over_time",
            "title": "Alert State",
            "identity": { "from": METRIC_ID },
            "label": { "from": METRIC_LABEL },
            "state": { "from": METRIC_STATE },
            "tooltip": { "from": METRIC_TOOLTIP },
            "value": { "hide": true },
        })],
        status_call_interval: "1s".to_string(),
    }
}
