use foundation::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsKind {
    Market,
    Activity,
    Performance,
}

/// A queued analytics job. The payload shape depends on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    #[serde(rename = "type")]
    pub kind: AnalyticsKind,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

/// One geo-tagged numeric observation fed to market and activity analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSample {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsDataPoint {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetric {
    pub region: String,
    pub volume: f64,
    /// Difference from the previous market batch for the same region.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalytics {
    pub volume_by_region: Vec<VolumeMetric>,
    pub price_heatmap: Vec<AnalyticsDataPoint>,
    pub activity_hotspots: Vec<AnalyticsDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAnalytics {
    pub cells: Vec<AnalyticsDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AnalyticsPayload {
    Market(MarketAnalytics),
    Activity(ActivityAnalytics),
    Performance(PerformanceSummary),
}

/// A processed analytics item, republished on the analytics channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub payload: AnalyticsPayload,
    pub timestamp: Timestamp,
}

impl AnalyticsResult {
    pub fn kind(&self) -> AnalyticsKind {
        match self.payload {
            AnalyticsPayload::Market(_) => AnalyticsKind::Market,
            AnalyticsPayload::Activity(_) => AnalyticsKind::Activity,
            AnalyticsPayload::Performance(_) => AnalyticsKind::Performance,
        }
    }
}
