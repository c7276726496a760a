pub mod booking;
pub mod changes;
pub mod client;
pub mod error;
pub mod retry;
pub mod store;
pub mod transactions;

pub use booking::*;
pub use changes::*;
pub use client::*;
pub use error::*;
pub use retry::*;
pub use store::*;
pub use transactions::*;
