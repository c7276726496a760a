use serde::Serialize;

use crate::filter::VisibleTalent;
use crate::layer::{Layer, LayerKind};
use crate::symbology::color_for;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionPath {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    /// Color of the origin talent's language.
    pub color: &'static str,
}

/// Connection channel: links consecutive visible talents in store order.
#[derive(Debug, Default, Copy, Clone)]
pub struct PathsLayer;

impl Layer for PathsLayer {
    type Item = ConnectionPath;

    fn kind(&self) -> LayerKind {
        LayerKind::Paths
    }

    fn extract(&self, visible: &[VisibleTalent<'_>]) -> Vec<ConnectionPath> {
        visible
            .windows(2)
            .map(|pair| {
                let (from, to) = (&pair[0], &pair[1]);
                ConnectionPath {
                    start_lat: from.position.lat,
                    start_lng: from.position.lng,
                    end_lat: to.position.lat,
                    end_lng: to.position.lng,
                    color: color_for(from.talent.language_name()),
                }
            })
            .collect()
    }
}
