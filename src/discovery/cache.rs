use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time;

use super::projector::AlertDiscovery;
use super::target::Target;

/// Default refresh interval for discovered targets
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
struct Snapshot {
    targets: Vec<Target>,
    /// Unix millis of the last successful refresh
    refreshed_at: Option<i64>,
    last_error: Option<String>,
}

/// Serves the last good discovery result, refreshed in the background
pub struct DiscoveryCache {
    discovery: AlertDiscovery,
    interval: Duration,
    snapshot: RwLock<Snapshot>,
    running: Arc<AtomicBool>,
    shutdown: Notify,
}

impl DiscoveryCache {
    pub fn new(discovery: AlertDiscovery, interval: Duration) -> Self {
        Self {
            discovery,
            interval,
            snapshot: RwLock::new(Snapshot::default()),
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Notify::new(),
        }
    }

    /// Run one discovery cycle; a failure keeps the previous targets
    pub async fn refresh(&self) {
        match self.discovery.discover().await {
            Ok(targets) => {
                let mut snapshot = self.snapshot.write();
                snapshot.targets = targets;
                snapshot.refreshed_at = Some(chrono::Utc::now().timestamp_millis());
                snapshot.last_error = None;
            }
            Err(e) => {
                let mut snapshot = self.snapshot.write();
                tracing::warn!(
                    error = %e,
                    cached = snapshot.targets.len(),
                    "Discovery refresh failed, keeping cached targets"
                );
                snapshot.last_error = Some(e.to_string());
            }
        }
    }

    pub fn targets(&self) -> Vec<Target> {
        self.snapshot.read().targets.clone()
    }

    pub fn refreshed_at(&self) -> Option<i64> {
        self.snapshot.read().refreshed_at
    }

    pub fn last_error(&self) -> Option<String> {
        self.snapshot.read().last_error.clone()
    }

    /// Start the background refresher; the first cycle runs immediately
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!("Discovery refresher started with interval {:?}", self.interval);

            let mut interval = time::interval(self.interval);

            while self.running.load(Ordering::SeqCst) {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = self.shutdown.notified() => break,
                }
                if !self.running.load(Ordering::SeqCst) {
                    break;
                }
                self.refresh().await;
            }

            tracing::info!("Discovery refresher stopped");
        })
    }

    /// Stop the refresher without waiting for the next tick
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splunk::{AlertRecord, TrackedAlertSource, TransportError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Replays a scripted sequence of discovery outcomes
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<Vec<AlertRecord>, TransportError>>>,
    }

    #[async_trait]
    impl TrackedAlertSource for Scripted {
        async fn tracked_alerts(&self) -> Result<Vec<AlertRecord>, TransportError> {
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn cache_with(outcomes: Vec<Result<Vec<AlertRecord>, TransportError>>) -> DiscoveryCache {
        let source = Arc::new(Scripted {
            outcomes: Mutex::new(outcomes.into()),
        });
        DiscoveryCache::new(
            AlertDiscovery::new(source, Vec::<String>::new()),
            DEFAULT_REFRESH_INTERVAL,
        )
    }

    #[tokio::test]
    async fn test_keeps_last_good_targets_on_failure() {
        let cache = cache_with(vec![
            Ok(vec![AlertRecord::new("a1", "Alert One")]),
            Err(TransportError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        ]);
        assert!(cache.targets().is_empty());
        assert!(cache.refreshed_at().is_none());

        cache.refresh().await;
        assert_eq!(cache.targets().len(), 1);
        let refreshed_at = cache.refreshed_at();
        assert!(refreshed_at.is_some());
        assert!(cache.last_error().is_none());

        cache.refresh().await;
        assert_eq!(cache.targets().len(), 1);
        assert_eq!(cache.targets()[0].id, "a1");
        assert_eq!(cache.refreshed_at(), refreshed_at);
        assert!(cache.last_error().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_successful_refresh_replaces_targets() {
        let cache = cache_with(vec![
            Ok(vec![AlertRecord::new("a1", "Alert One")]),
            Ok(vec![
                AlertRecord::new("a2", "Alert Two"),
                AlertRecord::new("a3", "Alert Three"),
            ]),
        ]);

        cache.refresh().await;
        cache.refresh().await;

        let ids: Vec<String> = cache.targets().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a2", "a3"]);
    }

    #[tokio::test]
    async fn test_background_refresh_runs_immediately() {
        let cache = Arc::new(cache_with(vec![Ok(vec![AlertRecord::new("a1", "A")])]));

        let handle = Arc::clone(&cache).start();
        assert!(cache.is_running());

        for _ in 0..50 {
            if !cache.targets().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(cache.targets().len(), 1);

        cache.stop();
        assert!(!cache.is_running());
        handle.abort();
    }

    #[tokio::test]
    async fn test_stop_ends_refresher_before_next_tick() {
        let cache = Arc::new(cache_with(vec![Ok(vec![AlertRecord::new("a1", "A")])]));

        let handle = Arc::clone(&cache).start();
        for _ in 0..50 {
            if !cache.targets().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        cache.stop();

        let finished = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(finished.is_ok());
    }
}
