use std::collections::BTreeMap;

use catalog::{AnalyticsDataPoint, MarketSample};

/// Cell size of the activity grid, in degrees.
pub const GRID_DEGREES: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub fn containing(lat: f64, lng: f64) -> Self {
        Self {
            row: (lat / GRID_DEGREES).floor() as i32,
            col: (lng / GRID_DEGREES).floor() as i32,
        }
    }

    pub fn center(self) -> (f64, f64) {
        (
            (self.row as f64 + 0.5) * GRID_DEGREES,
            (self.col as f64 + 0.5) * GRID_DEGREES,
        )
    }
}

pub struct SpatialAnalysis;

impl SpatialAnalysis {
    /// Sample counts per grid cell, ordered by cell.
    pub fn cell_counts(samples: &[MarketSample]) -> BTreeMap<GridCell, usize> {
        let mut counts = BTreeMap::new();
        for s in samples {
            *counts.entry(GridCell::containing(s.lat, s.lng)).or_insert(0) += 1;
        }
        counts
    }

    /// One point per sample, weight normalized by the largest value.
    pub fn price_heatmap(samples: &[MarketSample]) -> Vec<AnalyticsDataPoint> {
        let max = samples.iter().map(|s| s.value).fold(0.0_f64, f64::max);
        samples
            .iter()
            .map(|s| AnalyticsDataPoint {
                lat: s.lat,
                lng: s.lng,
                value: s.value,
                weight: if max > 0.0 { s.value / max } else { 0.0 },
            })
            .collect()
    }

    /// Every occupied cell as a point at its center.
    pub fn activity_cells(samples: &[MarketSample]) -> Vec<AnalyticsDataPoint> {
        let counts = Self::cell_counts(samples);
        let max = counts.values().copied().max().unwrap_or(0);
        counts
            .into_iter()
            .map(|(cell, n)| cell_point(cell, n, max))
            .collect()
    }

    /// Cells holding at least twice the mean occupied-cell count. When no cell
    /// qualifies the busiest one is reported, so a non-empty input always has
    /// a hotspot.
    pub fn hotspots(samples: &[MarketSample]) -> Vec<AnalyticsDataPoint> {
        let counts = Self::cell_counts(samples);
        if counts.is_empty() {
            return Vec::new();
        }
        let max = counts.values().copied().max().unwrap_or(0);
        let mean = samples.len() as f64 / counts.len() as f64;
        let hot: Vec<_> = counts
            .iter()
            .filter(|&(_, &n)| n as f64 >= 2.0 * mean)
            .map(|(&cell, &n)| cell_point(cell, n, max))
            .collect();
        if !hot.is_empty() {
            return hot;
        }
        // First cell in grid order wins ties.
        let (cell, n) = counts
            .iter()
            .fold(None::<(GridCell, usize)>, |best, (&c, &n)| match best {
                Some((_, bn)) if bn >= n => best,
                _ => Some((c, n)),
            })
            .unwrap_or((GridCell { row: 0, col: 0 }, 0));
        vec![cell_point(cell, n, max)]
    }
}

fn cell_point(cell: GridCell, count: usize, max: usize) -> AnalyticsDataPoint {
    let (lat, lng) = cell.center();
    AnalyticsDataPoint {
        lat,
        lng,
        value: count as f64,
        weight: if max > 0 { count as f64 / max as f64 } else { 0.0 },
    }
}
