use catalog::Talent;
use serde::Serialize;

use crate::filter::VisibleTalent;
use crate::layer::{Layer, LayerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensitySample {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

/// Weight assigned to each talent in the density layer.
pub trait WeightPolicy {
    fn weight(&self, talent: &Talent) -> f64;
}

/// Every talent counts the same.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConstantWeight(pub f64);

impl Default for ConstantWeight {
    fn default() -> Self {
        Self(1.0)
    }
}

impl WeightPolicy for ConstantWeight {
    fn weight(&self, _talent: &Talent) -> f64 {
        self.0
    }
}

/// Density-bin channel: one weighted sample per visible talent.
pub struct DensityLayer<P = ConstantWeight> {
    policy: P,
}

impl Default for DensityLayer {
    fn default() -> Self {
        Self {
            policy: ConstantWeight::default(),
        }
    }
}

impl<P: WeightPolicy> DensityLayer<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: WeightPolicy> Layer for DensityLayer<P> {
    type Item = DensitySample;

    fn kind(&self) -> LayerKind {
        LayerKind::Density
    }

    fn extract(&self, visible: &[VisibleTalent<'_>]) -> Vec<DensitySample> {
        visible
            .iter()
            .map(|v| DensitySample {
                lat: v.position.lat,
                lng: v.position.lng,
                weight: self.policy.weight(v.talent),
            })
            .collect()
    }
}
