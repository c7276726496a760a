pub mod regional;
pub mod spatial;
pub mod statistics;

pub use regional::volume_by_region;
pub use spatial::{GridCell, SpatialAnalysis};
pub use statistics::Statistics;
