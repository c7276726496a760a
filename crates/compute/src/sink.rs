use catalog::{AnalyticsResult, BoxFuture, Transaction};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Row written to the transaction analytics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub amount: f64,
    /// WKT `POINT(lng lat)`.
    pub location_start: String,
    pub location_end: String,
    pub timestamp: foundation::Timestamp,
}

impl TransactionRecord {
    pub fn from_transaction(tx: &Transaction, recorded_at: foundation::Timestamp) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            amount: tx.amount,
            location_start: format!("POINT({} {})", tx.source.lng, tx.source.lat),
            location_end: format!("POINT({} {})", tx.destination.lng, tx.destination.lat),
            timestamp: recorded_at,
        }
    }
}

/// Persistence for processed analytics and transactions.
pub trait AnalyticsSink: Send + Sync {
    fn save_analytics<'a>(
        &'a self,
        result: &'a AnalyticsResult,
    ) -> BoxFuture<'a, Result<(), AnalyticsError>>;

    fn store_transaction<'a>(
        &'a self,
        record: &'a TransactionRecord,
    ) -> BoxFuture<'a, Result<(), AnalyticsError>>;
}

/// Keeps everything in memory; used by the viewer and in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    analytics: Mutex<Vec<AnalyticsResult>>,
    transactions: Mutex<Vec<TransactionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analytics(&self) -> Vec<AnalyticsResult> {
        self.analytics.lock().clone()
    }

    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.transactions.lock().clone()
    }
}

impl AnalyticsSink for MemorySink {
    fn save_analytics<'a>(
        &'a self,
        result: &'a AnalyticsResult,
    ) -> BoxFuture<'a, Result<(), AnalyticsError>> {
        Box::pin(async move {
            self.analytics.lock().push(result.clone());
            Ok(())
        })
    }

    fn store_transaction<'a>(
        &'a self,
        record: &'a TransactionRecord,
    ) -> BoxFuture<'a, Result<(), AnalyticsError>> {
        Box::pin(async move {
            self.transactions.lock().push(record.clone());
            Ok(())
        })
    }
}
