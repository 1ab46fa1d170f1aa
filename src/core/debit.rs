//! FIFO debit algorithm and historic replay
//!
//! This module extends the `Ledger` with the operations that consume points:
//!
//! - `debit` - drain the oldest eligible records until a number of points is covered
//! - `replay_historic_adjustments` - apply negative transactions against the
//!   payer's credits as of the adjustment's own timestamp
//! - `spend` - replay, then debit across every payer
//!
//! # Selection vs. consumption
//!
//! Which records a debit may draw from is decided by `Ledger::eligible_for_debit`
//! and a `DebitFilter`; how they are consumed is the same for every caller. A
//! spend records one debit transaction per credit it touched. A replay uses a
//! payer/cutoff filter and records nothing, because the adjustment it
//! reconciles is already in the ledger.

use crate::core::ledger::{DebitFilter, Ledger};
use crate::types::{LedgerError, Payer, PayerDeltas, Points, Transaction};
use chrono::{DateTime, Utc};

/// Result of a debit pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebitOutcome {
    /// Points taken from each payer (non-positive values)
    pub deltas: PayerDeltas,

    /// Points that could not be covered by the eligible records
    pub unfulfilled: Points,
}

/// Part of a historic adjustment that found no credit to draw from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayShortfall {
    /// Payer of the adjustment
    pub payer: Payer,

    /// Timestamp of the adjustment
    pub timestamp: DateTime<Utc>,

    /// Points of the reduction that were discarded
    pub unapplied: Points,
}

/// Result of a spend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendOutcome {
    /// Points taken from each payer (non-positive values)
    pub deltas: PayerDeltas,

    /// Adjustments the replay preceding the spend could not fully apply
    pub shortfalls: Vec<ReplayShortfall>,
}

/// Build the ledger record for `points` consumed from `payer`
///
/// The record is already settled, so its remaining points are zero.
pub fn make_debit_record(payer: &str, points: Points, now: DateTime<Utc>) -> Transaction {
    Transaction {
        payer: payer.to_string(),
        points: -points,
        timestamp: now,
        remaining_points: 0,
    }
}

impl Ledger {
    /// Consume up to `points` from the oldest eligible records
    ///
    /// Each eligible record is drained completely or, for the last one, only
    /// by what is still owed. Unless `filter` is a replay filter, one debit
    /// record per drained record is inserted with `now` as its timestamp.
    ///
    /// # Returns
    ///
    /// The per-payer deltas and the part of `points` left uncovered. Payers
    /// that were not drawn from do not appear in the deltas.
    pub fn debit(
        &mut self,
        points: Points,
        filter: &DebitFilter,
        now: DateTime<Utc>,
    ) -> DebitOutcome {
        let drained = self.drain(points, filter);

        if !filter.is_replay() {
            for (payer, taken) in &drained.consumed {
                self.insert_ordered(make_debit_record(payer, *taken, now));
            }
        }

        DebitOutcome {
            deltas: drained.deltas,
            unfulfilled: drained.unfulfilled,
        }
    }

    /// Apply every pending negative transaction to its payer's oldest credits
    ///
    /// Each adjustment draws from the credits of its own payer dated at or
    /// before the adjustment, as if the reduction had happened back then.
    /// Afterwards its remaining points are zero whether or not it was fully
    /// covered; uncovered points are discarded and reported.
    ///
    /// Running it again without new adjustments changes nothing.
    pub fn replay_historic_adjustments(&mut self) -> Vec<ReplayShortfall> {
        let mut shortfalls = Vec::new();

        // Replay never inserts records, so these indices stay valid.
        for index in self.unapplied_reductions() {
            let (payer, timestamp, reduction) = {
                let tx = &self.transactions()[index];
                (
                    tx.payer.clone(),
                    tx.timestamp,
                    tx.remaining_points.saturating_neg(),
                )
            };

            let filter = DebitFilter::payer_as_of(payer.clone(), timestamp);
            let drained = self.drain(reduction, &filter);
            self.settle_reduction(index);

            if drained.unfulfilled > 0 {
                shortfalls.push(ReplayShortfall {
                    payer,
                    timestamp,
                    unapplied: drained.unfulfilled,
                });
            }
        }

        shortfalls
    }

    /// Spend `points` across all payers, oldest points first
    ///
    /// Historic adjustments are replayed first so a spend never draws on
    /// points that were already revoked.
    ///
    /// # Errors
    ///
    /// `LedgerError::Shortfall` if `points` exceeds what is spendable after the
    /// replay. No credit is touched in that case (the replay itself is kept).
    pub fn spend(
        &mut self,
        points: Points,
        now: DateTime<Utc>,
    ) -> Result<SpendOutcome, LedgerError> {
        let shortfalls = self.replay_historic_adjustments();

        let available = self.total_balance();
        if points > available {
            return Err(LedgerError::Shortfall {
                requested: points,
                available,
            });
        }

        let outcome = self.debit(points, &DebitFilter::unrestricted(), now);
        debug_assert_eq!(outcome.unfulfilled, 0);

        Ok(SpendOutcome {
            deltas: outcome.deltas,
            shortfalls,
        })
    }
}
