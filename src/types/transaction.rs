//! Transaction-related types for the points engine
//!
//! This module defines the ledger's transaction record, the caller-supplied
//! request used to record one, and the commands read from input files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payer identifier (e.g. "DANNON")
pub type Payer = String;

/// Point amount
///
/// Signed: credits are positive, historic adjustments and spend debits are negative.
pub type Points = i64;

/// Per-payer point deltas produced by a debit (values are never positive)
pub type PayerDeltas = BTreeMap<Payer, Points>;

/// A single entry of the ledger
///
/// Everything but `remaining_points` is fixed once the record is appended.
/// `remaining_points` is the bookkeeping field the debit algorithm mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The payer that granted (or revoked) the points
    pub payer: Payer,

    /// Signed amount of the transaction
    ///
    /// Positive values are credits. Negative values are either historic
    /// adjustments recorded by a caller or debits generated by a spend.
    pub points: Points,

    /// When the transaction happened; the sole ordering key of the ledger
    pub timestamp: DateTime<Utc>,

    /// Portion of this record not yet settled
    ///
    /// For credits this is the balance still available to spend. For a
    /// historic adjustment it holds the (negative) reduction that has not been
    /// replayed yet, and drops to zero once it has. Spend debits carry zero.
    pub remaining_points: Points,
}

impl Transaction {
    /// Create a transaction whose remaining points equal its amount
    pub fn new(payer: impl Into<Payer>, points: Points, timestamp: DateTime<Utc>) -> Self {
        Transaction {
            payer: payer.into(),
            points,
            timestamp,
            remaining_points: points,
        }
    }

    /// True for points earned from a payer
    pub fn is_credit(&self) -> bool {
        self.points > 0
    }

    /// True while this record still holds a reduction that has not been replayed
    pub fn has_unapplied_reduction(&self) -> bool {
        self.remaining_points < 0
    }
}

/// Request to record a transaction
///
/// This is what callers hand to the service. The ledger derives the remaining
/// points itself, so callers cannot supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub payer: Payer,
    pub points: Points,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(payer: impl Into<Payer>, points: Points, timestamp: DateTime<Utc>) -> Self {
        TransactionRecord {
            payer: payer.into(),
            points,
            timestamp,
        }
    }
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Transaction::new(record.payer, record.points, record.timestamp)
    }
}

/// Command types accepted in an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Record a credit or a historic adjustment for a payer
    Add,

    /// Spend points across all payers, oldest first
    Spend,
}

/// A unit of work for the ledger service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Record a transaction
    Record(TransactionRecord),

    /// Spend the given number of points
    Spend(Points),
}

impl LedgerCommand {
    pub fn command_type(&self) -> CommandType {
        match self {
            LedgerCommand::Record(_) => CommandType::Add,
            LedgerCommand::Spend(_) => CommandType::Spend,
        }
    }
}
