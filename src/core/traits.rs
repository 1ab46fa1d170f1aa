//! Core trait for driving a points ledger
//!
//! This module defines the trait abstraction that allows the owned
//! `LedgerService` and the thread-safe `SharedLedgerService` to be used
//! interchangeably by the processing strategies.

use crate::core::service::LedgerService;
use crate::core::shared::SharedLedgerService;
use crate::types::{
    LedgerCommand, LedgerError, PayerBalances, PayerDeltas, Points, Transaction,
    TransactionRecord,
};

/// What a successfully applied command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A transaction was recorded; the ledger now holds this many records
    Recorded(usize),

    /// Points were spent with these per-payer deltas
    Spent(PayerDeltas),
}

/// Trait for the operations a caller can perform on a points ledger
pub trait PointsLedger {
    /// Record a transaction, returning the number of ledger records afterwards
    fn record(&mut self, record: TransactionRecord) -> Result<usize, LedgerError>;

    /// Spend points, oldest first
    fn spend(&mut self, points: Points) -> Result<PayerDeltas, LedgerError>;

    /// All ledger records in order
    fn transactions(&self) -> Vec<Transaction>;

    /// Current balance of every payer
    fn balances(&self) -> PayerBalances;

    /// Apply a single command
    fn apply(&mut self, command: LedgerCommand) -> Result<CommandOutcome, LedgerError> {
        match command {
            LedgerCommand::Record(record) => self.record(record).map(CommandOutcome::Recorded),
            LedgerCommand::Spend(points) => self.spend(points).map(CommandOutcome::Spent),
        }
    }
}

impl PointsLedger for LedgerService {
    fn record(&mut self, record: TransactionRecord) -> Result<usize, LedgerError> {
        self.record_transaction(record).map(|all| all.len())
    }

    fn spend(&mut self, points: Points) -> Result<PayerDeltas, LedgerError> {
        self.spend_points(points)
    }

    fn transactions(&self) -> Vec<Transaction> {
        self.list_transactions().to_vec()
    }

    fn balances(&self) -> PayerBalances {
        self.get_balances()
    }
}

impl PointsLedger for SharedLedgerService {
    fn record(&mut self, record: TransactionRecord) -> Result<usize, LedgerError> {
        self.record_transaction(record)
    }

    fn spend(&mut self, points: Points) -> Result<PayerDeltas, LedgerError> {
        self.spend_points(points)
    }

    fn transactions(&self) -> Vec<Transaction> {
        self.list_transactions()
    }

    fn balances(&self) -> PayerBalances {
        self.get_balances()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn commands() -> Vec<LedgerCommand> {
        let at = |hour| Utc.with_ymd_and_hms(2020, 11, 1, hour, 0, 0).unwrap();
        vec![
            LedgerCommand::Record(TransactionRecord::new("A", 100, at(10))),
            LedgerCommand::Record(TransactionRecord::new("B", 50, at(11))),
            LedgerCommand::Spend(120),
        ]
    }

    fn run<L: PointsLedger>(ledger: &mut L) -> Vec<CommandOutcome> {
        commands()
            .into_iter()
            .map(|command| ledger.apply(command).unwrap())
            .collect()
    }

    #[test]
    fn test_apply_on_owned_service() {
        let mut service = LedgerService::default();

        let outcomes = run(&mut service);

        assert_eq!(outcomes[0], CommandOutcome::Recorded(1));
        assert_eq!(outcomes[1], CommandOutcome::Recorded(2));
        assert_eq!(
            outcomes[2],
            CommandOutcome::Spent(PayerDeltas::from([
                ("A".to_string(), -100),
                ("B".to_string(), -20)
            ]))
        );
        assert_eq!(service.balances()["B"], 30);
        assert_eq!(service.transactions().len(), 4);
    }

    #[test]
    fn test_apply_on_shared_service_matches_owned() {
        let mut owned = LedgerService::default();
        let mut shared = SharedLedgerService::default();

        assert_eq!(run(&mut owned), run(&mut shared));
        assert_eq!(owned.balances(), shared.balances());
    }

    #[test]
    fn test_apply_propagates_errors() {
        let mut service = LedgerService::default();

        let result = service.apply(LedgerCommand::Spend(1));

        assert_eq!(result, Err(LedgerError::insufficient_balance(0, 1)));
    }
}
