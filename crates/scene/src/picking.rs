//! Resolving clicks and hovers on channel items.

use catalog::Talent;
use layers::{LayerDatasets, LayerKind};

#[derive(Debug, Clone, PartialEq)]
pub enum PickEvent {
    /// A talent was resolved from the clicked item.
    Selected(Talent),
    /// The item exists but maps to no talent.
    Unresolved { kind: LayerKind, index: usize },
    /// No item at that index.
    Miss,
}

/// Position of item `index` in channel `kind`. Paths report their origin.
pub fn item_position(datasets: &LayerDatasets, kind: LayerKind, index: usize) -> Option<(f64, f64)> {
    match kind {
        LayerKind::Density => datasets.density.get(index).map(|d| (d.lat, d.lng)),
        LayerKind::Heat => datasets.heat.get(index).map(|h| (h.lat, h.lng)),
        LayerKind::Paths => datasets.paths.get(index).map(|p| (p.start_lat, p.start_lng)),
        LayerKind::Bars => datasets.bars.get(index).map(|b| (b.lat, b.lng)),
        LayerKind::Labels => datasets.labels.get(index).map(|l| (l.lat, l.lng)),
    }
}

/// First visible talent at exactly this position.
pub fn talent_at(datasets: &LayerDatasets, lat: f64, lng: f64) -> Option<&Talent> {
    datasets
        .visible
        .iter()
        .find(|t| t.lat == Some(lat) && t.lng == Some(lng))
}

/// Label clicks select the talent at the label's coordinates; clicks on
/// other channels do not select anything.
pub fn resolve_click(datasets: &LayerDatasets, kind: LayerKind, index: usize) -> PickEvent {
    let Some((lat, lng)) = item_position(datasets, kind, index) else {
        return PickEvent::Miss;
    };
    match kind {
        LayerKind::Labels => match talent_at(datasets, lat, lng) {
            Some(t) => PickEvent::Selected(t.clone()),
            None => PickEvent::Unresolved { kind, index },
        },
        _ => PickEvent::Unresolved { kind, index },
    }
}
