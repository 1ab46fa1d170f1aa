//! Ledger service
//!
//! This module provides the `LedgerService`, the boundary between callers and
//! the `Ledger`. The ledger trusts its inputs; the service is where requests
//! are validated before they reach it.
//!
//! The service enforces these rules:
//! - A transaction needs a non-blank payer
//! - A negative transaction may not take its payer below zero (strict mode)
//! - A spend must be non-negative and no larger than the total balance

use crate::core::debit::SpendOutcome;
use crate::core::ledger::Ledger;
use crate::types::{
    LedgerError, PayerBalances, PayerDeltas, Points, Transaction, TransactionRecord,
};
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

/// Service behavior settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Reject negative transactions larger than the payer's current balance
    pub strict_payer_balance: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            strict_payer_balance: true,
        }
    }
}

/// Front door of the ledger
///
/// Owns the one `Ledger` instance of a run. Create it once and hand it (or a
/// `SharedLedgerService` wrapping it) to whatever drives the commands.
#[derive(Debug, Clone, Default)]
pub struct LedgerService {
    ledger: Ledger,
    config: ServiceConfig,
}

impl LedgerService {
    /// Create a service over an empty ledger
    pub fn new(config: ServiceConfig) -> Self {
        LedgerService {
            ledger: Ledger::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Record a credit or a historic adjustment
    ///
    /// # Returns
    ///
    /// All ledger records in order, including the new one
    ///
    /// # Errors
    ///
    /// - `EmptyPayer` if the payer is blank
    /// - `NegativePayerBalance` if, in strict mode, a negative transaction is
    ///   larger than the payer's current balance
    /// - `ArithmeticOverflow` if the payer or ledger total would overflow, now
    ///   or once pending adjustments are replayed
    pub fn record_transaction(
        &mut self,
        record: TransactionRecord,
    ) -> Result<&[Transaction], LedgerError> {
        if record.payer.trim().is_empty() {
            return Err(LedgerError::EmptyPayer);
        }

        let balance = self.ledger.payer_balance(&record.payer);
        let new_balance = balance
            .checked_add(record.points)
            .ok_or_else(|| LedgerError::arithmetic_overflow("record", &record.payer))?;
        self.ledger
            .total_balance()
            .checked_add(record.points)
            .ok_or_else(|| LedgerError::arithmetic_overflow("record", &record.payer))?;
        // Replay can raise the total up to the unspent credit, so bound that too
        if record.points > 0 {
            self.ledger
                .unspent_credits()
                .checked_add(record.points)
                .ok_or_else(|| LedgerError::arithmetic_overflow("record", &record.payer))?;
        }

        if self.config.strict_payer_balance && record.points < 0 && new_balance < 0 {
            return Err(LedgerError::negative_payer_balance(
                &record.payer,
                record.points,
                balance,
            ));
        }

        debug!(
            payer = %record.payer,
            points = record.points,
            timestamp = %record.timestamp,
            "recording transaction"
        );
        Ok(self.ledger.append(record.into()))
    }

    /// Spend points, oldest first, stamping the debit records with the current time
    pub fn spend_points(&mut self, points: Points) -> Result<PayerDeltas, LedgerError> {
        self.spend_points_at(points, Utc::now().trunc_subsecs(0))
    }

    /// Spend points, oldest first, stamping the debit records with `now`
    ///
    /// # Errors
    ///
    /// - `NegativeSpend` if `points` is negative
    /// - `InsufficientBalance` if `points` exceeds the total balance
    pub fn spend_points_at(
        &mut self,
        points: Points,
        now: DateTime<Utc>,
    ) -> Result<PayerDeltas, LedgerError> {
        if points < 0 {
            return Err(LedgerError::NegativeSpend { points });
        }

        let available = self.ledger.total_balance();
        if points > available {
            return Err(LedgerError::insufficient_balance(available, points));
        }

        let SpendOutcome { deltas, shortfalls } = self.ledger.spend(points, now)?;
        for shortfall in &shortfalls {
            warn!(
                payer = %shortfall.payer,
                timestamp = %shortfall.timestamp,
                unapplied = shortfall.unapplied,
                "historic adjustment exceeded the payer's earlier credits; remainder discarded"
            );
        }

        info!(points, payers = deltas.len(), "points spent");
        Ok(deltas)
    }

    /// All ledger records in order
    pub fn list_transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    /// Current balance of every payer
    pub fn get_balances(&self) -> PayerBalances {
        self.ledger.balance_by_payer()
    }

    /// Points available to spend
    pub fn total_balance(&self) -> Points {
        self.ledger.total_balance()
    }
}
