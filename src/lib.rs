//! Rust Points Engine Library
//! # Overview
//!
//! This library keeps a ledger of loyalty points granted by payers and spends
//! them oldest first, with a streaming CSV driver offering a sync and an async
//! strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, LedgerCommand, LedgerError, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Time-ordered record log and balances
//!   - [`core::debit`] - FIFO debit, historic adjustment replay and spend
//!   - [`core::service`] - Validation in front of the ledger
//!   - [`core::shared`] - Thread-safe handle over one service
//! - [`io`] - CSV command readers and report writers
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Commands
//!
//! - **add**: Record points granted (positive) or taken back (negative) by a
//!   payer at a point in time. Records may arrive out of order.
//! - **spend**: Consume points, oldest credits first, reporting how many
//!   points were taken from each payer.
//!
//! # Ledger Records
//!
//! Each record keeps:
//! - `points`: The signed amount as recorded
//! - `timestamp`: When the points were granted or taken back
//! - `remaining_points`: The part of a credit not yet consumed
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rust_points_engine::{LedgerService, TransactionRecord};
//!
//! let mut service = LedgerService::default();
//! let at = |hour| Utc.with_ymd_and_hms(2020, 11, 1, hour, 0, 0).unwrap();
//! service.record_transaction(TransactionRecord::new("DANNON", 300, at(10))).unwrap();
//! service.record_transaction(TransactionRecord::new("UNILEVER", 200, at(11))).unwrap();
//!
//! let deltas = service.spend_points(400).unwrap();
//! assert_eq!(deltas["DANNON"], -300);
//! assert_eq!(deltas["UNILEVER"], -100);
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{DebitFilter, Ledger, LedgerService, ServiceConfig, SharedLedgerService};
pub use io::{write_balances_csv, write_spends_csv, write_transactions_csv};
pub use types::{
    LedgerCommand, LedgerError, Payer, PayerBalances, PayerDeltas, Points, Transaction,
    TransactionRecord,
};
