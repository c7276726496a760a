//! Coordinating context for one globe on screen.
//!
//! `GlobeSession` is the single writer of the filter state and the only
//! consumer that pushes datasets into the view. Live events are drained at
//! the start of every tick, so everything the view shows is consistent with
//! the latest store snapshot and filter selection.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use catalog::{
    AnalyticsPayload, AnalyticsResult, ChangeEvent, LiveChannels, MarketAnalytics, MarketSample,
    SystemAlert, Transaction,
};
use layers::{
    DensitySample, DisplayModes, FilterDimension, FilterState, FilterUpdate, HeatSample,
    LayerDatasets, LayerKind, derive, visible_talents,
};
use runtime::{Frame, Subscription};
use scene::{GlobeView, PickEvent, SceneError, Surface};
use streaming::{DEFAULT_LOG_CAPACITY, PointStore, TransactionLog};
use tracing::{debug, info, warn};

pub struct GlobeSession {
    store: Arc<PointStore>,
    view: GlobeView,
    filters: FilterState,
    modes: DisplayModes,
    changes: Subscription<ChangeEvent>,
    transactions: Subscription<Transaction>,
    analytics: Subscription<AnalyticsResult>,
    alerts: Subscription<SystemAlert>,
    log: TransactionLog,
    market: Option<MarketOverlay>,
    last_alert: Option<SystemAlert>,
    base: LayerDatasets,
    derived_revision: Option<u64>,
    filter_generation: u64,
    filters_dirty: bool,
    push_pending: bool,
}

/// A market result together with the talent set it was accepted against.
/// A filter change or a store refresh after that point makes it stale.
struct MarketOverlay {
    analytics: MarketAnalytics,
    filter_generation: u64,
    revision: u64,
}

/// What a single tick did, mostly for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub refreshed: bool,
    pub rederived: bool,
    pub arcs_added: usize,
    pub analytics_applied: usize,
    pub frame: Option<Frame>,
}

impl GlobeSession {
    pub fn new(store: Arc<PointStore>, live: &LiveChannels, view: GlobeView) -> Self {
        Self {
            store,
            view,
            filters: FilterState::new(),
            modes: DisplayModes::default(),
            changes: live.remote_changes.subscribe(),
            transactions: live.transactions.subscribe(),
            analytics: live.analytics.subscribe(),
            alerts: live.alerts.subscribe(),
            log: TransactionLog::with_capacity(DEFAULT_LOG_CAPACITY),
            market: None,
            last_alert: None,
            base: LayerDatasets::default(),
            derived_revision: None,
            filter_generation: 0,
            filters_dirty: true,
            push_pending: true,
        }
    }

    /// Mounts the view and performs the initial load.
    pub async fn start(&mut self, surface: Surface) -> Result<(), SceneError> {
        self.view.mount(surface)?;
        let count = self.store.refresh().await;
        info!(talents = count, "globe session started");
        self.sync_view();
        Ok(())
    }

    /// Drains live events, refreshes and re-derives as needed, then
    /// advances the view by `dt`.
    pub async fn tick(&mut self, dt: Duration) -> TickReport {
        let mut report = TickReport::default();

        // Any number of pending changes collapse into one refetch.
        let pending = self.changes.drain();
        if let Some(last) = pending.last() {
            debug!(events = pending.len(), "remote changes pending");
            self.store.on_remote_change(last).await;
            report.refreshed = true;
        }

        for tx in self.transactions.drain() {
            self.log.push(&tx);
            if self.view.add_transient_arc(&tx).is_ok() {
                report.arcs_added += 1;
            }
        }

        for result in self.analytics.drain() {
            match result.payload {
                AnalyticsPayload::Market(analytics) => {
                    self.market = Some(MarketOverlay {
                        analytics,
                        filter_generation: self.filter_generation,
                        revision: self.store.revision(),
                    });
                    self.push_pending = true;
                    report.analytics_applied += 1;
                }
                other => debug!(kind = ?result_kind(&other), "analytics result not shown"),
            }
        }

        for alert in self.alerts.drain() {
            info!(kind = ?alert.kind, message = %alert.message, "system alert");
            self.last_alert = Some(alert);
        }

        report.rederived = self.sync_view();
        report.frame = self.view.tick(dt);
        report
    }

    /// Re-derives when the store or the filters changed and pushes the
    /// result to the view. Returns whether a derivation ran.
    fn sync_view(&mut self) -> bool {
        let revision = self.store.revision();
        if self.market.as_ref().is_some_and(|m| {
            m.filter_generation != self.filter_generation || m.revision != revision
        }) {
            debug!("market overlay stale, dropped");
            self.market = None;
            self.push_pending = true;
        }
        let rederive = self.filters_dirty || self.derived_revision != Some(revision);
        if rederive {
            let talents = self.store.snapshot();
            self.base = derive(&talents, &self.filters);
            self.derived_revision = Some(revision);
            self.filters_dirty = false;
            self.push_pending = true;
        }
        if self.push_pending {
            let market = self.market.as_ref().map(|m| &m.analytics);
            let shown = with_market_overlay(self.base.clone(), market);
            self.view.update(shown, self.modes);
            self.push_pending = false;
        }
        rederive
    }

    pub fn apply_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.mark_filters_changed();
    }

    pub fn set_filter(&mut self, dimension: FilterDimension, values: BTreeSet<String>) {
        self.filters.apply_update(dimension, values);
        self.mark_filters_changed();
    }

    pub fn toggle_filter(&mut self, dimension: FilterDimension, value: &str) {
        self.filters.toggle(dimension, value);
        self.mark_filters_changed();
    }

    fn mark_filters_changed(&mut self) {
        self.filters_dirty = true;
        self.filter_generation += 1;
    }

    pub fn set_display_mode(&mut self, kind: LayerKind, enabled: bool) {
        self.modes.set(kind, enabled);
        self.push_pending = true;
    }

    /// Drops the market overlay; heat and density go back to the talents.
    pub fn clear_market(&mut self) {
        if self.market.take().is_some() {
            self.push_pending = true;
        }
    }

    pub fn click(&mut self, kind: LayerKind, index: usize) -> PickEvent {
        self.view.click(kind, index)
    }

    /// Visible talents as market samples, priced by hourly rate.
    pub fn market_samples(&self) -> Vec<MarketSample> {
        let talents = self.store.snapshot();
        visible_talents(&talents, &self.filters)
            .into_iter()
            .map(|v| MarketSample {
                lat: v.position.lat,
                lng: v.position.lng,
                value: v.talent.hourly_rate,
                region: v.talent.region.clone(),
            })
            .collect()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn display_modes(&self) -> DisplayModes {
        self.modes
    }

    /// Datasets as last derived, before any analytics overlay.
    pub fn datasets(&self) -> &LayerDatasets {
        &self.base
    }

    pub fn view(&self) -> &GlobeView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut GlobeView {
        &mut self.view
    }

    pub fn transaction_log(&self) -> &TransactionLog {
        &self.log
    }

    pub fn market(&self) -> Option<&MarketAnalytics> {
        self.market.as_ref().map(|m| &m.analytics)
    }

    pub fn last_alert(&self) -> Option<&SystemAlert> {
        self.last_alert.as_ref()
    }

    /// Releases every subscription and unmounts the view.
    pub fn shutdown(mut self) {
        self.view.unmount();
        let Self {
            changes,
            transactions,
            analytics,
            alerts,
            ..
        } = self;
        changes.unsubscribe();
        transactions.unsubscribe();
        analytics.unsubscribe();
        alerts.unsubscribe();
        info!("globe session shut down");
    }
}

fn result_kind(payload: &AnalyticsPayload) -> &'static str {
    match payload {
        AnalyticsPayload::Market(_) => "market",
        AnalyticsPayload::Activity(_) => "activity",
        AnalyticsPayload::Performance(_) => "performance",
    }
}

/// Market heatmap replaces heat, hotspots replace density.
fn with_market_overlay(
    mut datasets: LayerDatasets,
    market: Option<&MarketAnalytics>,
) -> LayerDatasets {
    let Some(market) = market else {
        return datasets;
    };
    datasets.heat = market
        .price_heatmap
        .iter()
        .map(|p| HeatSample {
            lat: p.lat,
            lng: p.lng,
            weight: p.weight,
        })
        .collect();
    if market.activity_hotspots.is_empty() {
        warn!("market result without hotspots; density left unchanged");
    } else {
        datasets.density = market
            .activity_hotspots
            .iter()
            .map(|p| DensitySample {
                lat: p.lat,
                lng: p.lng,
                weight: p.value,
            })
            .collect();
    }
    datasets
}
