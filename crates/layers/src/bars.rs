use serde::Serialize;

use crate::filter::VisibleTalent;
use crate::layer::{Layer, LayerKind};
use crate::symbology::color_for;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub lat: f64,
    pub lng: f64,
    pub height: f64,
    pub color: &'static str,
}

/// Extruded-bar channel; height is the hourly rate divided by `rate_per_unit`.
#[derive(Debug, Copy, Clone)]
pub struct BarsLayer {
    pub rate_per_unit: f64,
}

impl Default for BarsLayer {
    fn default() -> Self {
        Self {
            rate_per_unit: 10.0,
        }
    }
}

impl Layer for BarsLayer {
    type Item = Bar;

    fn kind(&self) -> LayerKind {
        LayerKind::Bars
    }

    fn extract(&self, visible: &[VisibleTalent<'_>]) -> Vec<Bar> {
        visible
            .iter()
            .map(|v| Bar {
                lat: v.position.lat,
                lng: v.position.lng,
                height: v.talent.hourly_rate / self.rate_per_unit,
                color: color_for(v.talent.language_name()),
            })
            .collect()
    }
}
