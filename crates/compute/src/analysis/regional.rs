use std::collections::BTreeMap;

use catalog::{MarketSample, VolumeMetric};

pub const UNKNOWN_REGION: &str = "Unknown";

/// Sums sample values per region, with the change against `previous`.
///
/// Regions that disappeared since the previous batch are not reported.
pub fn volume_by_region(
    samples: &[MarketSample],
    previous: &BTreeMap<String, f64>,
) -> Vec<VolumeMetric> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for s in samples {
        let region = if s.region.is_empty() {
            UNKNOWN_REGION
        } else {
            s.region.as_str()
        };
        *totals.entry(region).or_insert(0.0) += s.value;
    }
    totals
        .into_iter()
        .map(|(region, volume)| VolumeMetric {
            region: region.to_string(),
            volume,
            change: volume - previous.get(region).copied().unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(region: &str, value: f64) -> MarketSample {
        MarketSample {
            lat: 0.0,
            lng: 0.0,
            value,
            region: region.into(),
        }
    }

    #[test]
    fn sums_and_diffs_against_previous() {
        let previous = BTreeMap::from([("Europe".to_string(), 100.0)]);
        let metrics = volume_by_region(
            &[sample("Europe", 70.0), sample("Asia", 10.0), sample("Europe", 50.0), sample("", 5.0)],
            &previous,
        );
        let rows: Vec<_> = metrics
            .iter()
            .map(|m| (m.region.as_str(), m.volume, m.change))
            .collect();
        assert_eq!(
            rows,
            vec![("Asia", 10.0, 10.0), ("Europe", 120.0, 20.0), (UNKNOWN_REGION, 5.0, 5.0)]
        );
    }
}
