pub mod analytics;
pub mod events;
pub mod memory;
pub mod model;
pub mod radius;
pub mod seed;
pub mod source;

pub use analytics::*;
pub use events::*;
pub use memory::*;
pub use model::*;
pub use radius::*;
pub use source::*;
