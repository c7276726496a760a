use serde::Serialize;

use crate::filter::VisibleTalent;
use crate::layer::{Layer, LayerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatSample {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

/// Heat channel: weight is the hourly rate, so hot spots track pricing.
#[derive(Debug, Default, Copy, Clone)]
pub struct HeatLayer;

impl Layer for HeatLayer {
    type Item = HeatSample;

    fn kind(&self) -> LayerKind {
        LayerKind::Heat
    }

    fn extract(&self, visible: &[VisibleTalent<'_>]) -> Vec<HeatSample> {
        visible
            .iter()
            .map(|v| HeatSample {
                lat: v.position.lat,
                lng: v.position.lng,
                weight: v.talent.hourly_rate,
            })
            .collect()
    }
}
