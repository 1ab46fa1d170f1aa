//! Thread-safe handle to a ledger service
//!
//! This module provides `SharedLedgerService`, a cloneable handle that lets
//! several threads or async tasks drive one `LedgerService`.
//!
//! # Design
//!
//! A debit walks a snapshot of eligible records while it mutates them, so two
//! operations must never interleave. Every method therefore takes the one
//! mutex guarding the whole service and runs to completion under it. Reads
//! return owned snapshots taken under the same lock.
//!
//! ```text
//! SharedLedgerService (Clone)
//!     └── Arc<Mutex<LedgerService>>
//!             └── Ledger
//! ```

use crate::core::service::{LedgerService, ServiceConfig};
use crate::types::{
    LedgerError, PayerBalances, PayerDeltas, Points, Transaction, TransactionRecord,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one `LedgerService`
#[derive(Debug, Clone, Default)]
pub struct SharedLedgerService {
    inner: Arc<Mutex<LedgerService>>,
}

impl SharedLedgerService {
    /// Create a handle over a fresh service
    pub fn new(config: ServiceConfig) -> Self {
        Self::from_service(LedgerService::new(config))
    }

    /// Wrap an existing service
    pub fn from_service(service: LedgerService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Record a transaction
    ///
    /// # Returns
    ///
    /// The number of records in the ledger afterwards
    pub fn record_transaction(&self, record: TransactionRecord) -> Result<usize, LedgerError> {
        let mut service = self.inner.lock();
        service.record_transaction(record).map(|all| all.len())
    }

    /// Spend points, oldest first
    pub fn spend_points(&self, points: Points) -> Result<PayerDeltas, LedgerError> {
        self.inner.lock().spend_points(points)
    }

    /// Spend points, oldest first, stamping the debit records with `now`
    pub fn spend_points_at(
        &self,
        points: Points,
        now: DateTime<Utc>,
    ) -> Result<PayerDeltas, LedgerError> {
        self.inner.lock().spend_points_at(points, now)
    }

    /// Snapshot of all ledger records in order
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.inner.lock().list_transactions().to_vec()
    }

    /// Snapshot of every payer's balance
    pub fn get_balances(&self) -> PayerBalances {
        self.inner.lock().get_balances()
    }

    pub fn total_balance(&self) -> Points {
        self.inner.lock().total_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::thread;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 11, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let handle = SharedLedgerService::default();
        let other = handle.clone();

        handle
            .record_transaction(TransactionRecord::new("A", 100, at(0)))
            .unwrap();

        assert_eq!(other.total_balance(), 100);
        assert_eq!(other.list_transactions().len(), 1);
    }

    #[test]
    fn test_record_returns_ledger_length() {
        let handle = SharedLedgerService::new(ServiceConfig::default());

        assert_eq!(
            handle.record_transaction(TransactionRecord::new("A", 100, at(0))),
            Ok(1)
        );
        assert_eq!(
            handle.record_transaction(TransactionRecord::new("B", 100, at(1))),
            Ok(2)
        );
    }

    #[test]
    fn test_concurrent_spends_never_overspend() {
        let handle = SharedLedgerService::default();
        for minute in 0..50 {
            let payer = format!("P{}", minute % 5);
            handle
                .record_transaction(TransactionRecord::new(payer, 10, at(minute)))
                .unwrap();
        }

        // 8 threads x 10 spends of 7 points = 560 requested, 500 available
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    let mut spent = 0;
                    for _ in 0..10 {
                        if let Ok(deltas) = handle.spend_points_at(7, at(59)) {
                            spent -= deltas.values().sum::<Points>();
                        }
                    }
                    spent
                })
            })
            .collect();

        let spent: Points = workers.into_iter().map(|w| w.join().unwrap()).sum();

        assert_eq!(spent % 7, 0);
        assert!(spent <= 500);
        assert_eq!(handle.total_balance(), 500 - spent);
        assert!(handle.get_balances().values().all(|balance| *balance >= 0));
    }

    #[test]
    fn test_rejected_spend_leaves_state_untouched() {
        let handle = SharedLedgerService::default();
        handle
            .record_transaction(TransactionRecord::new("A", 10, at(0)))
            .unwrap();

        let result = handle.spend_points_at(11, at(1));

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(handle.get_balances()["A"], 10);
    }
}
