pub mod arcs;
pub mod bars;
pub mod density;
pub mod derive;
pub mod filter;
pub mod heat;
pub mod labels;
pub mod layer;
pub mod paths;
pub mod symbology;

pub use arcs::TransactionArc;
pub use bars::Bar;
pub use density::{ConstantWeight, DensitySample, WeightPolicy};
pub use derive::{LayerDatasets, derive, derive_with};
pub use filter::{FilterDimension, FilterState, FilterUpdate, LegacyFilters, VisibleTalent, visible_talents};
pub use heat::HeatSample;
pub use labels::Label;
pub use layer::{DisplayModes, Layer, LayerKind};
pub use paths::ConnectionPath;
pub use symbology::{FALLBACK_COLOR, color_for, density_bin_color, transaction_color};
