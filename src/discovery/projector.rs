use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::target::{
    Target, ATTRIBUTE_AUTHOR, ATTRIBUTE_ID, ATTRIBUTE_NAME, ATTRIBUTE_SEVERITY, ATTRIBUTE_URL,
    TARGET_TYPE,
};
use crate::splunk::{AlertRecord, TrackedAlertSource, TransportError};

/// Projects tracked Splunk alerts into discovery targets
#[derive(Clone)]
pub struct AlertDiscovery {
    source: Arc<dyn TrackedAlertSource>,
    /// Attribute keys stripped from every produced target
    excludes: HashSet<String>,
}

impl AlertDiscovery {
    pub fn new<I, S>(source: Arc<dyn TrackedAlertSource>, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source,
            excludes: excludes.into_iter().map(Into::into).collect(),
        }
    }

    /// Run one discovery cycle
    pub async fn discover(&self) -> Result<Vec<Target>, TransportError> {
        let alerts = self.source.tracked_alerts().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to retrieve alerts");
            e
        })?;

        let targets: Vec<Target> = alerts
            .iter()
            .map(|alert| to_target(alert).without_attributes(&self.excludes))
            .collect();

        tracing::debug!(count = targets.len(), "Discovered alert targets");
        Ok(targets)
    }
}

fn to_target(alert: &AlertRecord) -> Target {
    let mut attributes = BTreeMap::new();
    attributes.insert(ATTRIBUTE_ID.to_string(), vec![alert.id.clone()]);
    attributes.insert(ATTRIBUTE_NAME.to_string(), vec![alert.name.clone()]);
    attributes.insert(ATTRIBUTE_AUTHOR.to_string(), vec![alert.author.clone()]);
    attributes.insert(
        ATTRIBUTE_SEVERITY.to_string(),
        vec![alert.severity().label().to_string()],
    );
    attributes.insert(
        ATTRIBUTE_URL.to_string(),
        vec![alert.fired_alerts_url().to_string()],
    );

    Target {
        id: alert.id.clone(),
        target_type: TARGET_TYPE.to_string(),
        label: alert.name.clone(),
        attributes,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::splunk::Severity;
    use async_trait::async_trait;

    /// Canned tracked-alert source
    pub(crate) struct StaticAlerts {
        pub alerts: Vec<AlertRecord>,
        pub fail: bool,
    }

    impl StaticAlerts {
        pub fn ok(alerts: Vec<AlertRecord>) -> Arc<Self> {
            Arc::new(Self {
                alerts,
                fail: false,
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                alerts: vec![],
                fail: true,
            })
        }
    }

    #[async_trait]
    impl TrackedAlertSource for StaticAlerts {
        async fn tracked_alerts(&self) -> Result<Vec<AlertRecord>, TransportError> {
            if self.fail {
                Err(TransportError::Network("some error".to_string()))
            } else {
                Ok(self.alerts.clone())
            }
        }
    }

    fn no_excludes() -> Vec<String> {
        Vec::new()
    }

    #[tokio::test]
    async fn test_discover_empty() {
        let discovery = AlertDiscovery::new(StaticAlerts::ok(vec![]), no_excludes());

        let targets = discovery.discover().await.unwrap();

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_discover_multiple_alerts() {
        let discovery = AlertDiscovery::new(
            StaticAlerts::ok(vec![
                AlertRecord::new("alert1", "Alert One")
                    .with_author("Author1")
                    .with_severity(Severity::FATAL)
                    .with_fired_alerts_url("/alerts/one"),
                AlertRecord::new("alert2", "Alert Two")
                    .with_author("Author2")
                    .with_severity(Severity::DEBUG),
            ]),
            no_excludes(),
        );

        let targets = discovery.discover().await.unwrap();

        assert_eq!(targets.len(), 2);

        assert_eq!(targets[0].id, "alert1");
        assert_eq!(targets[0].label, "Alert One");
        assert_eq!(targets[0].target_type, TARGET_TYPE);
        assert_eq!(targets[0].attributes[ATTRIBUTE_SEVERITY], vec!["Fatal"]);
        assert_eq!(targets[0].attributes[ATTRIBUTE_AUTHOR], vec!["Author1"]);
        assert_eq!(targets[0].attributes[ATTRIBUTE_URL], vec!["/alerts/one"]);
        assert_eq!(targets[0].attributes[ATTRIBUTE_ID], vec!["alert1"]);

        assert_eq!(targets[1].id, "alert2");
        assert_eq!(targets[1].label, "Alert Two");
        assert_eq!(targets[1].attributes[ATTRIBUTE_SEVERITY], vec!["Debug"]);
        assert_eq!(targets[1].attributes[ATTRIBUTE_AUTHOR], vec!["Author2"]);
    }

    #[tokio::test]
    async fn test_discover_unknown_severity() {
        let discovery = AlertDiscovery::new(
            StaticAlerts::ok(vec![
                AlertRecord::new("alert1", "Alert One").with_severity(Severity(99))
            ]),
            no_excludes(),
        );

        let targets = discovery.discover().await.unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].attributes[ATTRIBUTE_SEVERITY], vec!["Unknown"]);
    }

    #[tokio::test]
    async fn test_discover_excluded_attributes() {
        let discovery = AlertDiscovery::new(
            StaticAlerts::ok(vec![
                AlertRecord::new("alert1", "Alert One")
                    .with_author("Author1")
                    .with_severity(Severity::INFO),
                AlertRecord::new("alert2", "Alert Two").with_author("Author2"),
            ]),
            [ATTRIBUTE_AUTHOR],
        );

        let targets = discovery.discover().await.unwrap();

        assert_eq!(targets.len(), 2);
        for target in &targets {
            assert!(!target.attributes.contains_key(ATTRIBUTE_AUTHOR));
            assert!(target.attributes.contains_key(ATTRIBUTE_ID));
            assert!(target.attributes.contains_key(ATTRIBUTE_NAME));
            assert!(target.attributes.contains_key(ATTRIBUTE_SEVERITY));
            assert!(target.attributes.contains_key(ATTRIBUTE_URL));
        }
    }

    #[tokio::test]
    async fn test_discover_error() {
        let discovery = AlertDiscovery::new(StaticAlerts::failing(), no_excludes());

        let result = discovery.discover().await;

        assert!(result.is_err());
    }
}
