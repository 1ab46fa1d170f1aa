//! Balance-related types for the points engine

use super::transaction::{Payer, Points};
use serde::Serialize;
use std::collections::BTreeMap;

/// Point balance of every payer that has at least one ledger record
///
/// Ordered by payer so reports are deterministic.
pub type PayerBalances = BTreeMap<Payer, Points>;

/// One row of a balance report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayerBalance {
    /// The payer
    pub payer: Payer,

    /// Sum of the remaining points across the payer's records
    pub points: Points,
}

impl PayerBalance {
    pub fn new(payer: impl Into<Payer>, points: Points) -> Self {
        PayerBalance {
            payer: payer.into(),
            points,
        }
    }

    /// Flatten a balance map into report rows, ordered by payer
    pub fn from_balances(balances: &PayerBalances) -> Vec<PayerBalance> {
        balances
            .iter()
            .map(|(payer, points)| PayerBalance::new(payer.clone(), *points))
            .collect()
    }
}
