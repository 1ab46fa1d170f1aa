//! Ordered transaction ledger
//!
//! This module provides the `Ledger`, the in-memory log of every transaction
//! the engine has seen. The ledger is kept sorted by timestamp at all times so
//! that the debit algorithm (see `core::debit`) can consume the oldest points
//! first simply by walking it front to back.
//!
//! # Ordering
//!
//! Records are inserted with stable insert-sort semantics: a record whose
//! timestamp equals existing ones is placed after all of them, so ties keep
//! their insertion order.
//!
//! # Mutation
//!
//! Records are never removed. The only mutable state of a record is its
//! `remaining_points`, which only the debit algorithm updates.
//!
//! # Running totals
//!
//! The total, the per-payer balances and the unspent credit are kept up to
//! date on every mutation, so balance reads and the service's record-time
//! checks never walk the log. Debits start at the first record that still
//! holds credit instead of at the front.

use crate::types::{Payer, PayerBalances, PayerDeltas, Points, Transaction};
use chrono::{DateTime, Utc};

/// Selection criteria for the records a debit may draw from
///
/// A replay restricts the debit to one payer and a cutoff, and the
/// adjustment it reconciles is already in the ledger. Any other filter is a
/// real spend and leaves debit records behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebitFilter {
    /// Only draw from this payer's records
    pub payer: Option<Payer>,

    /// Only draw from records at or before this instant
    pub not_after: Option<DateTime<Utc>>,
}

impl DebitFilter {
    /// Filter selecting every eligible record
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Filter selecting one payer's records up to and including `not_after`
    pub fn payer_as_of(payer: impl Into<Payer>, not_after: DateTime<Utc>) -> Self {
        DebitFilter {
            payer: Some(payer.into()),
            not_after: Some(not_after),
        }
    }

    /// True when both a payer and a cutoff are set
    pub fn is_replay(&self) -> bool {
        self.payer.is_some() && self.not_after.is_some()
    }

    fn matches(&self, tx: &Transaction) -> bool {
        self.payer.as_ref().map_or(true, |payer| tx.payer == *payer)
            && self.not_after.map_or(true, |cutoff| tx.timestamp <= cutoff)
    }
}

fn is_eligible(tx: &Transaction, filter: &DebitFilter) -> bool {
    tx.remaining_points > 0 && tx.points != 0 && filter.matches(tx)
}

/// What a drain pass took from the ledger
#[derive(Debug, Default)]
pub(crate) struct Drained {
    pub(crate) deltas: PayerDeltas,
    pub(crate) unfulfilled: Points,
    /// (payer, points) per record touched, oldest first
    pub(crate) consumed: Vec<(Payer, Points)>,
}

/// Time-ordered log of point transactions
///
/// Owns every record exclusively; callers only ever see shared borrows.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Records sorted by ascending timestamp, ties in insertion order
    transactions: Vec<Transaction>,

    /// No record before this index holds positive remaining points
    settled: usize,

    /// Sum of remaining points over every record
    total: Points,

    /// Sum of positive remaining points
    unspent_credits: Points,

    /// Remaining points per payer
    balances: PayerBalances,

    /// Negative records that have not been replayed yet
    pending_reductions: usize,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a transaction, keeping the ledger ordered by timestamp
    ///
    /// `remaining_points` is reset to `points`, whatever the caller put there.
    /// No validation is performed: a negative amount is a legal historic
    /// adjustment.
    ///
    /// # Returns
    ///
    /// The full ordered sequence of records
    pub fn append(&mut self, mut transaction: Transaction) -> &[Transaction] {
        transaction.remaining_points = transaction.points;
        self.insert_ordered(transaction);
        &self.transactions
    }

    /// Stable ordered insert: after every record with an equal timestamp
    pub(crate) fn insert_ordered(&mut self, transaction: Transaction) {
        let index = self
            .transactions
            .partition_point(|existing| existing.timestamp <= transaction.timestamp);
        let remaining = transaction.remaining_points;

        if index <= self.settled {
            if remaining > 0 {
                self.settled = index;
            } else {
                self.settled += 1;
            }
        }
        if remaining > 0 {
            self.unspent_credits += remaining;
        }
        if transaction.has_unapplied_reduction() {
            self.pending_reductions += 1;
        }
        self.total += remaining;
        *self.balances.entry(transaction.payer.clone()).or_insert(0) += remaining;

        self.transactions.insert(index, transaction);
    }

    /// All records in ledger order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of records, including spend debits
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Indices of the records a debit may draw from, oldest first
    ///
    /// A record is eligible when it still has positive remaining points and a
    /// non-zero amount, and it passes `filter`. This is the one selection
    /// predicate shared by global spends and historic replay.
    ///
    /// The iterator is lazy and borrows the ledger; collect it before mutating.
    pub fn eligible_for_debit<'a>(
        &'a self,
        filter: &'a DebitFilter,
    ) -> impl Iterator<Item = usize> + 'a {
        self.transactions
            .iter()
            .enumerate()
            .skip(self.settled)
            .filter(move |(_, tx)| is_eligible(tx, filter))
            .map(|(index, _)| index)
    }

    /// Take up to `points` from the oldest eligible records
    ///
    /// Stops at the first record that covers what is still owed.
    pub(crate) fn drain(&mut self, mut points: Points, filter: &DebitFilter) -> Drained {
        let mut drained = Drained::default();

        for tx in self.transactions[self.settled..].iter_mut() {
            if points <= 0 {
                break;
            }
            if !is_eligible(tx, filter) {
                continue;
            }
            let taken = tx.remaining_points.min(points);

            tx.remaining_points -= taken;
            points -= taken;
            self.total -= taken;
            self.unspent_credits -= taken;
            *self.balances.entry(tx.payer.clone()).or_insert(0) -= taken;
            *drained.deltas.entry(tx.payer.clone()).or_insert(0) -= taken;
            drained.consumed.push((tx.payer.clone(), taken));
        }

        self.advance_settled();
        drained.unfulfilled = points.max(0);
        drained
    }

    /// Mark the reduction at `index` as replayed, discarding whatever is left of it
    pub(crate) fn settle_reduction(&mut self, index: usize) {
        let tx = &mut self.transactions[index];
        if !tx.has_unapplied_reduction() {
            return;
        }
        let discarded = tx.remaining_points;
        tx.remaining_points = 0;

        self.total -= discarded;
        *self.balances.entry(tx.payer.clone()).or_insert(0) -= discarded;
        self.pending_reductions -= 1;
    }

    fn advance_settled(&mut self) {
        while self
            .transactions
            .get(self.settled)
            .is_some_and(|tx| tx.remaining_points <= 0)
        {
            self.settled += 1;
        }
    }

    /// Indices of records still holding an unapplied historic reduction
    pub(crate) fn unapplied_reductions(&self) -> Vec<usize> {
        if self.pending_reductions == 0 {
            return Vec::new();
        }
        self.transactions
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.has_unapplied_reduction())
            .map(|(index, _)| index)
            .collect()
    }

    /// Sum of remaining points over every record
    pub fn total_balance(&self) -> Points {
        self.total
    }

    /// Sum of the points still held by credits
    ///
    /// Replay never raises a balance above this, so it bounds every total the
    /// ledger can reach from its current records.
    pub fn unspent_credits(&self) -> Points {
        self.unspent_credits
    }

    /// Remaining points per payer
    ///
    /// A payer with at least one record is listed even when its balance is zero.
    pub fn balance_by_payer(&self) -> PayerBalances {
        self.balances.clone()
    }

    /// Remaining points of a single payer (zero for an unknown payer)
    pub fn payer_balance(&self, payer: &str) -> Points {
        self.balances.get(payer).copied().unwrap_or(0)
    }
}
