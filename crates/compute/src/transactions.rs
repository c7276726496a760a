use std::sync::Arc;

use catalog::{LiveChannels, Transaction};
use foundation::Timestamp;
use layers::TransactionArc;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::sink::{AnalyticsSink, TransactionRecord};

pub type ArcParams = TransactionArc;

/// Turns completed payments into arc parameters, persists them and
/// broadcasts the transaction.
pub struct TransactionProcessor {
    sink: Arc<dyn AnalyticsSink>,
    live: LiveChannels,
}

impl TransactionProcessor {
    pub fn new(live: LiveChannels, sink: Arc<dyn AnalyticsSink>) -> Arc<Self> {
        Arc::new(Self { sink, live })
    }

    /// A storage failure is returned before anything is broadcast.
    pub async fn process(&self, tx: Transaction) -> Result<ArcParams, AnalyticsError> {
        let arc = TransactionArc::from_transaction(&tx);
        let record = TransactionRecord::from_transaction(&tx, Timestamp::now());
        self.sink.store_transaction(&record).await?;
        let delivered = self.live.transactions.publish(tx);
        debug!(id = %arc.id, altitude = arc.altitude, delivered, "transaction processed");
        Ok(arc)
    }
}
