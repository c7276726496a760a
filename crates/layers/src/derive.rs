//! Layer Derivation Engine.
//!
//! Every dataset is a pure, order-preserving function of the talent sequence
//! and the filter state. Nothing here keeps state between passes.

use catalog::Talent;
use serde::Serialize;

use crate::bars::{Bar, BarsLayer};
use crate::density::{ConstantWeight, DensityLayer, DensitySample, WeightPolicy};
use crate::filter::{FilterState, visible_talents};
use crate::heat::{HeatLayer, HeatSample};
use crate::labels::{Label, LabelsLayer};
use crate::layer::Layer;
use crate::paths::{ConnectionPath, PathsLayer};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LayerDatasets {
    /// Talents that passed the visibility predicate, in store order.
    pub visible: Vec<Talent>,
    pub density: Vec<DensitySample>,
    pub heat: Vec<HeatSample>,
    pub paths: Vec<ConnectionPath>,
    pub bars: Vec<Bar>,
    pub labels: Vec<Label>,
}

impl LayerDatasets {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

pub fn derive(talents: &[Talent], filters: &FilterState) -> LayerDatasets {
    derive_with(talents, filters, &ConstantWeight::default())
}

pub fn derive_with(
    talents: &[Talent],
    filters: &FilterState,
    weights: &dyn WeightPolicy,
) -> LayerDatasets {
    let visible = visible_talents(talents, filters);
    LayerDatasets {
        density: DensityLayer::with_policy(DynWeight(weights)).extract(&visible),
        heat: HeatLayer.extract(&visible),
        paths: PathsLayer.extract(&visible),
        bars: BarsLayer::default().extract(&visible),
        labels: LabelsLayer::default().extract(&visible),
        visible: visible.iter().map(|v| v.talent.clone()).collect(),
    }
}

struct DynWeight<'a>(&'a dyn WeightPolicy);

impl WeightPolicy for DynWeight<'_> {
    fn weight(&self, talent: &Talent) -> f64 {
        self.0.weight(talent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterDimension;
    use crate::filter::tests::talent;
    use crate::symbology::FALLBACK_COLOR;
    use pretty_assertions::assert_eq;

    fn scenario() -> Vec<Talent> {
        vec![
            talent("t1", "English", 150.0, 40.0, -74.0, ["Calm", "Happy", "North America", "Morning"]),
            talent("t2", "French", 130.0, 48.0, 2.0, ["Calm", "Serious", "Europe", "Evening"]),
            talent("t3", "Japanese", 170.0, 35.0, 139.0, ["Energetic", "Excited", "Asia", "Night"]),
        ]
    }

    #[test]
    fn pattern_filter_drives_bars_and_paths() {
        let talents = scenario();
        let mut filters = FilterState::new();
        filters.apply_update(FilterDimension::Patterns, ["Calm".to_string()].into());

        let out = derive(&talents, &filters);
        let bars: Vec<_> = out.bars.iter().map(|b| (b.height, b.color)).collect();
        assert_eq!(bars, vec![(15.0, "#ff5722"), (13.0, "#4caf50")]);
        assert_eq!(out.paths.len(), 1);
        assert_eq!(out.paths[0].color, "#ff5722");
        assert_eq!(
            (out.paths[0].start_lat, out.paths[0].end_lng),
            (40.0, 2.0)
        );
    }

    #[test]
    fn two_talents_without_filters() {
        let talents = vec![
            talent("en", "English", 150.0, 40.71, -74.0, ["", "", "", ""]),
            talent("fr", "French", 130.0, 48.85, 2.35, ["", "", "", ""]),
        ];
        let out = derive(&talents, &FilterState::new());

        let bars: Vec<_> = out.bars.iter().map(|b| (b.height, b.color)).collect();
        assert_eq!(bars, vec![(15.0, "#ff5722"), (13.0, "#4caf50")]);
        assert_eq!(
            out.paths,
            vec![ConnectionPath {
                start_lat: 40.71,
                start_lng: -74.0,
                end_lat: 48.85,
                end_lng: 2.35,
                color: "#ff5722",
            }]
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let talents = scenario();
        let filters = FilterState::new();
        assert_eq!(derive(&talents, &filters), derive(&talents, &filters));
    }

    #[test]
    fn path_count_is_visible_minus_one() {
        let filters = FilterState::new();
        for n in 0usize..5 {
            let talents: Vec<_> = (0..n)
                .map(|i| talent(&i.to_string(), "German", 10.0, i as f64, i as f64, ["", "", "", ""]))
                .collect();
            let out = derive(&talents, &filters);
            assert_eq!(out.paths.len(), n.saturating_sub(1));
            assert_eq!(out.density.len(), n);
            assert_eq!(out.labels.len(), n);
        }
    }

    #[test]
    fn every_channel_sees_the_same_visible_set() {
        let mut talents = scenario();
        talents[1].lat = None;
        let out = derive(&talents, &FilterState::new());
        assert_eq!(out.visible.len(), 2);
        assert_eq!(out.heat.len(), 2);
        assert_eq!(out.bars.len(), 2);
        assert_eq!(out.heat[1].weight, 170.0);
        assert_eq!(out.labels[0].text, "Talent t1");
        assert_eq!(out.labels[0].size, 1.0);
        assert_eq!(out.labels[0].dot_radius, 0.5);
    }

    #[test]
    fn unknown_language_falls_back_to_grey() {
        let talents = vec![
            talent("x", "Klingon", 50.0, 0.0, 0.0, ["", "", "", ""]),
            talent("y", "", 50.0, 1.0, 1.0, ["", "", "", ""]),
        ];
        let out = derive(&talents, &FilterState::new());
        assert!(out.bars.iter().all(|b| b.color == FALLBACK_COLOR));
        assert_eq!(out.paths[0].color, FALLBACK_COLOR);
    }

    struct RateWeight;

    impl WeightPolicy for RateWeight {
        fn weight(&self, talent: &Talent) -> f64 {
            talent.hourly_rate / 100.0
        }
    }

    #[test]
    fn density_weight_policy_is_pluggable() {
        let talents = scenario();
        let filters = FilterState::new();
        assert!(derive(&talents, &filters).density.iter().all(|d| d.weight == 1.0));
        let weighted = derive_with(&talents, &filters, &RateWeight);
        assert_eq!(weighted.density[0].weight, 1.5);
    }
}
