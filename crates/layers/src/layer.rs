use serde::{Deserialize, Serialize};

use crate::filter::VisibleTalent;

/// The five visual channels of the globe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Density,
    Heat,
    Paths,
    Bars,
    Labels,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Density,
        LayerKind::Heat,
        LayerKind::Paths,
        LayerKind::Bars,
        LayerKind::Labels,
    ];
}

/// A pure derivation from the visible talents to one channel's dataset.
pub trait Layer {
    type Item;

    fn kind(&self) -> LayerKind;

    fn extract(&self, visible: &[VisibleTalent<'_>]) -> Vec<Self::Item>;
}

/// Per-channel "layer enabled" toggles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayModes {
    pub density: bool,
    pub heat: bool,
    pub paths: bool,
    pub bars: bool,
    pub labels: bool,
}

impl Default for DisplayModes {
    fn default() -> Self {
        Self {
            density: true,
            heat: true,
            paths: true,
            bars: true,
            labels: true,
        }
    }
}

impl DisplayModes {
    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Density => self.density,
            LayerKind::Heat => self.heat,
            LayerKind::Paths => self.paths,
            LayerKind::Bars => self.bars,
            LayerKind::Labels => self.labels,
        }
    }

    pub fn set(&mut self, kind: LayerKind, enabled: bool) {
        match kind {
            LayerKind::Density => self.density = enabled,
            LayerKind::Heat => self.heat = enabled,
            LayerKind::Paths => self.paths = enabled,
            LayerKind::Bars => self.bars = enabled,
            LayerKind::Labels => self.labels = enabled,
        }
    }
}
