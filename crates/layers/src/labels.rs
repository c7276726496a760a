use serde::Serialize;

use crate::filter::VisibleTalent;
use crate::layer::{Layer, LayerKind};
use crate::symbology::color_for;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub lat: f64,
    pub lng: f64,
    pub text: String,
    pub size: f64,
    pub dot_radius: f64,
    pub color: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelStyle {
    pub size: f64,
    pub dot_radius: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: 1.0,
            dot_radius: 0.5,
        }
    }
}

/// Text channel: the talent's name at its position.
#[derive(Debug, Default, Copy, Clone)]
pub struct LabelsLayer {
    pub style: LabelStyle,
}

impl Layer for LabelsLayer {
    type Item = Label;

    fn kind(&self) -> LayerKind {
        LayerKind::Labels
    }

    fn extract(&self, visible: &[VisibleTalent<'_>]) -> Vec<Label> {
        visible
            .iter()
            .map(|v| Label {
                lat: v.position.lat,
                lng: v.position.lng,
                text: v.talent.name.clone(),
                size: self.style.size,
                dot_radius: self.style.dot_radius,
                color: color_for(v.talent.language_name()),
            })
            .collect()
    }
}
