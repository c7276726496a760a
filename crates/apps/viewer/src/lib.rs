pub mod session;

pub use session::{GlobeSession, TickReport};
