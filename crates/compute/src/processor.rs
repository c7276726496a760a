//! Analytics Processor.
//!
//! Requests are queued and drained in batches of [`BATCH_SIZE`]. A drain is
//! skipped while another one is still running. Each item is processed on its
//! own: a failing item is logged and dropped without affecting the rest of
//! its batch.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use catalog::{
    ActivityAnalytics, AnalyticsKind, AnalyticsPayload, AnalyticsRequest, AnalyticsResult,
    LiveChannels, MarketAnalytics, MarketSample,
};
use foundation::Timestamp;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::analysis::{SpatialAnalysis, Statistics, volume_by_region};
use crate::error::AnalyticsError;
use crate::sink::AnalyticsSink;

pub const BATCH_SIZE: usize = 10;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    /// A drain was already running, nothing was taken from the queue.
    pub skipped: bool,
}

pub struct AnalyticsProcessor {
    queue: Mutex<VecDeque<AnalyticsRequest>>,
    processing: AtomicBool,
    previous_volumes: Mutex<BTreeMap<String, f64>>,
    sink: Arc<dyn AnalyticsSink>,
    live: LiveChannels,
}

impl AnalyticsProcessor {
    pub fn new(live: LiveChannels, sink: Arc<dyn AnalyticsSink>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            processing: AtomicBool::new(false),
            previous_volumes: Mutex::new(BTreeMap::new()),
            sink,
            live,
        })
    }

    /// Appends a request stamped with the current time.
    pub fn queue_analytics(&self, kind: AnalyticsKind, data: Value) {
        self.enqueue(AnalyticsRequest {
            kind,
            data,
            timestamp: Timestamp::now(),
        });
    }

    pub fn enqueue(&self, request: AnalyticsRequest) {
        self.queue.lock().push_back(request);
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Takes up to [`BATCH_SIZE`] requests and processes them in order.
    pub async fn process_next_batch(&self) -> BatchReport {
        if self
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return BatchReport {
                skipped: true,
                ..BatchReport::default()
            };
        }
        // Released on every exit, including a cancelled drain.
        let _busy = BusyFlag(&self.processing);

        let batch: Vec<_> = {
            let mut queue = self.queue.lock();
            let n = queue.len().min(BATCH_SIZE);
            queue.drain(..n).collect()
        };

        let mut report = BatchReport::default();
        for request in batch {
            let kind = request.kind;
            match self.process_one(request).await {
                Ok(result) => {
                    self.live.analytics.publish(result);
                    report.processed += 1;
                }
                Err(err) => {
                    warn!(?kind, error = %err, "analytics item failed");
                    report.failed += 1;
                }
            }
        }

        if report.processed + report.failed > 0 {
            debug!(processed = report.processed, failed = report.failed, "analytics batch done");
        }
        report
    }

    async fn process_one(&self, request: AnalyticsRequest) -> Result<AnalyticsResult, AnalyticsError> {
        let payload = match request.kind {
            AnalyticsKind::Market => AnalyticsPayload::Market(self.market(&request.data)?),
            AnalyticsKind::Activity => {
                let samples = decode_samples("activity", &request.data)?;
                AnalyticsPayload::Activity(ActivityAnalytics {
                    cells: SpatialAnalysis::activity_cells(&samples),
                })
            }
            AnalyticsKind::Performance => {
                let values: Vec<f64> = serde_json::from_value(request.data).map_err(|e| {
                    AnalyticsError::InvalidPayload {
                        kind: "performance",
                        reason: e.to_string(),
                    }
                })?;
                AnalyticsPayload::Performance(
                    Statistics::summarize(&values).ok_or(AnalyticsError::Empty("performance"))?,
                )
            }
        };
        let result = AnalyticsResult {
            payload,
            timestamp: Timestamp::now(),
        };
        self.sink.save_analytics(&result).await?;
        Ok(result)
    }

    fn market(&self, data: &Value) -> Result<MarketAnalytics, AnalyticsError> {
        let samples = decode_samples("market", data)?;
        let mut previous = self.previous_volumes.lock();
        let volume_by_region = volume_by_region(&samples, &previous);
        previous.clear();
        previous.extend(volume_by_region.iter().map(|m| (m.region.clone(), m.volume)));
        Ok(MarketAnalytics {
            volume_by_region,
            price_heatmap: SpatialAnalysis::price_heatmap(&samples),
            activity_hotspots: SpatialAnalysis::hotspots(&samples),
        })
    }

    /// Drains the queue on a fixed interval until the handle is shut down.
    pub fn start(self: &Arc<Self>, interval: Duration) -> ProcessorHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let processor = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            // The first tick completes immediately.
            timer.tick().await;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = timer.tick() => {
                        if !processor.is_processing() && processor.pending() > 0 {
                            processor.process_next_batch().await;
                        }
                    }
                }
            }
            debug!("analytics loop stopped");
        });
        info!(interval_ms = interval.as_millis() as u64, "analytics processor started");
        ProcessorHandle {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

struct BusyFlag<'a>(&'a AtomicBool);

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn decode_samples(kind: &'static str, data: &Value) -> Result<Vec<MarketSample>, AnalyticsError> {
    Vec::<MarketSample>::deserialize(data).map_err(|e| AnalyticsError::InvalidPayload {
        kind,
        reason: e.to_string(),
    })
}

/// Owner of the processing loop. Dropping it also stops the loop, but only
/// [`ProcessorHandle::shutdown`] waits for an in-flight batch to finish.
pub struct ProcessorHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ProcessorHandle {
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(error = %err, "analytics loop ended abnormally");
        }
    }
}

impl Drop for ProcessorHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, TransactionRecord};
    use catalog::BoxFuture;
    use serde_json::json;

    struct SlowSink {
        inner: MemorySink,
        delay: Duration,
    }

    impl AnalyticsSink for SlowSink {
        fn save_analytics<'a>(
            &'a self,
            result: &'a AnalyticsResult,
        ) -> BoxFuture<'a, Result<(), AnalyticsError>> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                self.inner.save_analytics(result).await
            })
        }

        fn store_transaction<'a>(
            &'a self,
            record: &'a TransactionRecord,
        ) -> BoxFuture<'a, Result<(), AnalyticsError>> {
            self.inner.store_transaction(record)
        }
    }

    fn processor() -> (Arc<AnalyticsProcessor>, Arc<MemorySink>, LiveChannels) {
        let live = LiveChannels::new();
        let sink = Arc::new(MemorySink::new());
        let p = AnalyticsProcessor::new(live.clone(), sink.clone());
        (p, sink, live)
    }

    fn market_data() -> Value {
        json!([
            {"lat": 41.0, "lng": -74.0, "value": 120.0, "region": "North America"},
            {"lat": 48.8, "lng": 2.3, "value": 80.0, "region": "Europe"}
        ])
    }

    #[tokio::test]
    async fn batch_takes_at_most_ten_items() {
        let (p, _, live) = processor();
        let mut results = live.analytics.subscribe();
        for i in 0..12 {
            p.queue_analytics(AnalyticsKind::Performance, json!([i as f64]));
        }
        let report = p.process_next_batch().await;
        assert_eq!(report.processed, BATCH_SIZE);
        assert_eq!(p.pending(), 2);
        assert_eq!(results.drain().len(), BATCH_SIZE);
    }

    #[tokio::test]
    async fn failing_item_is_isolated() {
        let (p, sink, live) = processor();
        let mut results = live.analytics.subscribe();
        for i in 0..10 {
            let data = if i == 4 { json!("not samples") } else { market_data() };
            p.queue_analytics(AnalyticsKind::Market, data);
        }
        let report = p.process_next_batch().await;
        assert_eq!((report.processed, report.failed), (9, 1));
        assert_eq!(results.drain().len(), 9);
        assert_eq!(sink.analytics().len(), 9);
        assert!(!p.is_processing());
    }

    #[tokio::test]
    async fn market_volume_change_tracks_previous_batch() {
        let (p, _, live) = processor();
        let mut results = live.analytics.subscribe();
        p.queue_analytics(AnalyticsKind::Market, market_data());
        p.queue_analytics(AnalyticsKind::Market, json!([
            {"lat": 48.8, "lng": 2.3, "value": 100.0, "region": "Europe"}
        ]));
        p.process_next_batch().await;
        let out = results.drain();
        let AnalyticsPayload::Market(second) = &out[1].payload else {
            panic!("expected market payload");
        };
        assert_eq!(second.volume_by_region.len(), 1);
        assert_eq!(second.volume_by_region[0].change, 20.0);
    }

    #[tokio::test]
    async fn empty_performance_payload_fails() {
        let (p, _, _) = processor();
        p.queue_analytics(AnalyticsKind::Performance, json!([]));
        p.queue_analytics(AnalyticsKind::Activity, market_data());
        let report = p.process_next_batch().await;
        assert_eq!((report.processed, report.failed), (1, 1));
    }

    #[tokio::test]
    async fn cancelled_drain_releases_the_guard() {
        let live = LiveChannels::new();
        let sink = Arc::new(SlowSink {
            inner: MemorySink::new(),
            delay: Duration::from_millis(200),
        });
        let p = AnalyticsProcessor::new(live, sink);
        p.queue_analytics(AnalyticsKind::Performance, json!([1.0]));
        let cancelled =
            tokio::time::timeout(Duration::from_millis(10), p.process_next_batch()).await;
        assert!(cancelled.is_err());
        assert!(!p.is_processing());

        p.queue_analytics(AnalyticsKind::Performance, json!([2.0]));
        let report = p.process_next_batch().await;
        assert!(!report.skipped);
        assert_eq!(report.processed, 1);
        assert_eq!(p.pending(), 0);
    }

    #[tokio::test]
    async fn loop_drains_queue_and_stops() {
        let (p, _, live) = processor();
        let mut results = live.analytics.subscribe();
        p.queue_analytics(AnalyticsKind::Performance, json!([1.0, 2.0]));
        let handle = p.start(Duration::from_millis(10));
        let got = tokio::time::timeout(Duration::from_secs(2), results.recv())
            .await
            .expect("result before timeout");
        assert_eq!(got.map(|r| r.kind()), Some(AnalyticsKind::Performance));
        handle.shutdown().await;

        p.queue_analytics(AnalyticsKind::Performance, json!([3.0]));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(p.pending(), 1);
    }
}
