pub mod analysis;
pub mod error;
pub mod processor;
pub mod sink;
pub mod transactions;

pub use error::AnalyticsError;
pub use processor::{AnalyticsProcessor, BatchReport, ProcessorHandle};
pub use sink::{AnalyticsSink, MemorySink, TransactionRecord};
pub use transactions::{ArcParams, TransactionProcessor};
