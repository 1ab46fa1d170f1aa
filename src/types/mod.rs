//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: Balance report types
//! - `transaction`: Ledger records, requests and commands
//! - `error`: Error types for the points engine

pub mod balance;
pub mod error;
pub mod transaction;

pub use balance::{PayerBalance, PayerBalances};
pub use error::LedgerError;
pub use transaction::{
    CommandType, LedgerCommand, Payer, PayerDeltas, Points, Transaction, TransactionRecord,
};
