//! Point Store: the current talent snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use catalog::{CatalogSource, ChangeEvent, Talent};
use foundation::TimeWindow;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::retry::RetryPolicy;

/// Holds the latest full talent collection.
///
/// Every refresh replaces the whole collection. Readers take an
/// `Arc<[Talent]>` snapshot, so they never observe a half-applied refresh.
pub struct PointStore {
    source: Arc<dyn CatalogSource>,
    retry: RetryPolicy,
    talents: RwLock<Arc<[Talent]>>,
    revision: AtomicU64,
    window: RwLock<TimeWindow>,
}

impl PointStore {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_retry(source, RetryPolicy::default())
    }

    pub fn with_retry(source: Arc<dyn CatalogSource>, retry: RetryPolicy) -> Self {
        Self {
            source,
            retry,
            talents: RwLock::new(Arc::from(Vec::new())),
            revision: AtomicU64::new(0),
            window: RwLock::new(TimeWindow::last_week()),
        }
    }

    pub fn snapshot(&self) -> Arc<[Talent]> {
        Arc::clone(&self.talents.read())
    }

    pub fn len(&self) -> usize {
        self.talents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bumped once per completed refresh, including degraded ones.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn time_window(&self) -> TimeWindow {
        *self.window.read()
    }

    pub fn set_time_window(&self, window: TimeWindow) {
        *self.window.write() = window;
    }

    /// Fetches the full collection. On failure, after the retry policy is
    /// exhausted, the store degrades to an empty collection.
    ///
    /// Returns the number of talents now held.
    pub async fn refresh(&self) -> usize {
        let next: Arc<[Talent]> = match self.retry.run(|| self.source.fetch_talents()).await {
            Ok(talents) => {
                info!(count = talents.len(), "talent catalog refreshed");
                Arc::from(talents)
            }
            Err(err) => {
                warn!(error = %err, "talent fetch failed; showing empty catalog");
                Arc::from(Vec::new())
            }
        };
        let count = next.len();
        *self.talents.write() = next;
        self.revision.fetch_add(1, Ordering::AcqRel);
        count
    }

    /// Any remote change triggers a full refetch.
    pub async fn on_remote_change(&self, event: &ChangeEvent) -> usize {
        debug!(table = %event.table, kind = ?event.kind, "remote change");
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{BoxFuture, CatalogError, ChangeKind, InMemoryCatalog};
    use std::sync::atomic::AtomicUsize;

    struct Flaky {
        failures_left: AtomicUsize,
        calls: AtomicUsize,
        inner: InMemoryCatalog,
    }

    impl CatalogSource for Flaky {
        fn fetch_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if fail {
                Box::pin(async { Err(CatalogError::Transport("connection refused".into())) })
            } else {
                self.inner.fetch_talents()
            }
        }
    }

    fn flaky(failures: usize) -> Arc<Flaky> {
        Arc::new(Flaky {
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
            inner: InMemoryCatalog::seeded(),
        })
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot() {
        let store = PointStore::with_retry(flaky(0), RetryPolicy::none());
        let before = store.snapshot();
        assert!(before.is_empty());
        assert_eq!(store.refresh().await, 3);
        assert_eq!(store.revision(), 1);
        assert!(before.is_empty());
        assert_eq!(store.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let source = flaky(2);
        let store = PointStore::with_retry(source.clone(), RetryPolicy::immediate(3));
        assert_eq!(store.refresh().await, 3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn persistent_failure_degrades_to_empty() {
        let source = flaky(10);
        let store = PointStore::with_retry(source, RetryPolicy::immediate(2));
        assert_eq!(store.refresh().await, 0);
        assert!(store.is_empty());
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn remote_change_refetches() {
        let source = flaky(0);
        let store = PointStore::with_retry(source.clone(), RetryPolicy::none());
        store.refresh().await;
        store
            .on_remote_change(&ChangeEvent::talents(ChangeKind::Insert, None))
            .await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.revision(), 2);
    }
}
