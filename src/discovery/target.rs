//! Target records and their describing metadata

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Type tag of every discovered alert target
pub const TARGET_TYPE: &str = "com.steadybit.extension_splunk_platform.alert";

pub const ATTRIBUTE_ID: &str = "splunk.alert.id";
pub const ATTRIBUTE_NAME: &str = "splunk.alert.name";
pub const ATTRIBUTE_AUTHOR: &str = "splunk.alert.author";
pub const ATTRIBUTE_SEVERITY: &str = "splunk.alert.severity";
pub const ATTRIBUTE_URL: &str = "splunk.alert.url";

/// An addressable alert, rebuilt on every discovery cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: String,
    pub target_type: String,
    pub label: String,
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl Target {
    /// First value of an attribute, if present
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Drop every attribute whose key is excluded
    pub fn without_attributes(mut self, excludes: &HashSet<String>) -> Self {
        if !excludes.is_empty() {
            self.attributes.retain(|key, _| !excludes.contains(key));
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluralLabel {
    pub one: String,
    pub other: String,
}

impl PluralLabel {
    pub fn new(one: &str, other: &str) -> Self {
        Self {
            one: one.to_string(),
            other: other.to_string(),
        }
    }
}

/// How the host renders the target type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescription {
    pub id: String,
    pub label: PluralLabel,
    pub category: String,
    pub version: String,
    pub table: TargetTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetTable {
    pub columns: Vec<TableColumn>,
    pub order_by: Vec<TableOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    pub attribute: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOrder {
    pub attribute: String,
    pub direction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDescription {
    pub attribute: String,
    pub label: PluralLabel,
}

/// Discovery endpoint description with the host's call interval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDescription {
    pub id: String,
    pub call_interval: String,
}

pub fn target_description() -> TargetDescription {
    TargetDescription {
        id: TARGET_TYPE.to_string(),
        label: PluralLabel::new("Alert", "Alerts"),
        category: "monitoring".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        table: TargetTable {
            columns: vec![TableColumn {
                attribute: ATTRIBUTE_NAME.to_string(),
            }],
            order_by: vec![TableOrder {
                attribute: ATTRIBUTE_NAME.to_string(),
                direction: "ASC".to_string(),
            }],
        },
    }
}

pub fn attribute_descriptions() -> Vec<AttributeDescription> {
    [
        (ATTRIBUTE_ID, "ID", "IDs"),
        (ATTRIBUTE_NAME, "Name", "Names"),
        (ATTRIBUTE_AUTHOR, "Author", "Authors"),
        (ATTRIBUTE_SEVERITY, "Severity", "Severities"),
        (ATTRIBUTE_URL, "Fired Alert Url", "Fired Alert Urls"),
    ]
    .into_iter()
    .map(|(attribute, one, other)| AttributeDescription {
        attribute: attribute.to_string(),
        label: PluralLabel::new(one, other),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_attributes() {
        let mut attributes = BTreeMap::new();
        attributes.insert(ATTRIBUTE_ID.to_string(), vec!["a1".to_string()]);
        attributes.insert(ATTRIBUTE_AUTHOR.to_string(), vec!["admin".to_string()]);
        let target = Target {
            id: "a1".to_string(),
            target_type: TARGET_TYPE.to_string(),
            label: "A1".to_string(),
            attributes,
        };

        let excludes: HashSet<String> = [ATTRIBUTE_AUTHOR.to_string()].into_iter().collect();
        let target = target.without_attributes(&excludes);

        assert_eq!(target.attribute(ATTRIBUTE_ID), Some("a1"));
        assert_eq!(target.attribute(ATTRIBUTE_AUTHOR), None);
    }

    #[test]
    fn test_every_attribute_is_described() {
        let described: Vec<String> = attribute_descriptions()
            .into_iter()
            .map(|d| d.attribute)
            .collect();
        for key in [
            ATTRIBUTE_ID,
            ATTRIBUTE_NAME,
            ATTRIBUTE_AUTHOR,
            ATTRIBUTE_SEVERITY,
            ATTRIBUTE_URL,
        ] {
            assert!(described.iter().any(|d| d == key), "{key} not described");
        }
    }
}
