use std::collections::VecDeque;

use catalog::{MarketTransaction, Transaction};
use foundation::TimeWindow;

pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Ordered record of observed transactions. Once full, the oldest entry is
/// dropped for each new one.
#[derive(Debug, Clone)]
pub struct TransactionLog {
    entries: VecDeque<MarketTransaction>,
    capacity: usize,
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl TransactionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// Returns the evicted entry, if any.
    pub fn push(&mut self, tx: &Transaction) -> Option<MarketTransaction> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(MarketTransaction::from(tx));
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketTransaction> {
        self.entries.iter()
    }

    pub fn within(&self, window: TimeWindow) -> impl Iterator<Item = &MarketTransaction> {
        self.entries.iter().filter(move |t| window.contains(t.timestamp))
    }

    pub fn total_value(&self) -> f64 {
        self.entries.iter().map(|t| t.value).sum()
    }
}
