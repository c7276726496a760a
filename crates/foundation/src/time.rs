use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock instant in milliseconds since the Unix epoch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(ms)
    }

    pub fn saturating_sub(self, d: Duration) -> Self {
        Self(self.0.saturating_sub(d.as_millis() as u64))
    }
}

/// Closed time interval `[start, end]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// The `span` leading up to `end`.
    pub fn trailing(end: Timestamp, span: Duration) -> Self {
        Self {
            start: end.saturating_sub(span),
            end,
        }
    }

    /// Last seven days, the default window for the globe.
    pub fn last_week() -> Self {
        Self::trailing(Timestamp::now(), Duration::from_secs(7 * 24 * 60 * 60))
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t <= self.end
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.end.0.saturating_sub(self.start.0))
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeWindow, Timestamp};
    use std::time::Duration;

    #[test]
    fn trailing_window_contains_edges() {
        let w = TimeWindow::trailing(Timestamp(10_000), Duration::from_secs(4));
        assert_eq!(w.start, Timestamp(6_000));
        assert!(w.contains(Timestamp(6_000)));
        assert!(w.contains(Timestamp(10_000)));
        assert!(!w.contains(Timestamp(10_001)));
        assert_eq!(w.duration(), Duration::from_secs(4));
    }

    #[test]
    fn trailing_window_saturates_at_epoch() {
        let w = TimeWindow::trailing(Timestamp(5), Duration::from_secs(1));
        assert_eq!(w.start, Timestamp(0));
    }
}
