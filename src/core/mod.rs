//! Core business logic module
//!
//! This module contains the ledger components:
//! - `ledger` - Time-ordered transaction log, eligibility query and balances
//! - `debit` - FIFO debit algorithm, historic replay and spend
//! - `service` - Request validation in front of the ledger
//! - `shared` - Thread-safe handle serializing access to one service
//! - `traits` - Trait abstraction over the owned and shared services

pub mod debit;
pub mod ledger;
pub mod service;
pub mod shared;
pub mod traits;

pub use debit::{make_debit_record, DebitOutcome, ReplayShortfall, SpendOutcome};
pub use ledger::{DebitFilter, Ledger};
pub use service::{LedgerService, ServiceConfig};
pub use shared::SharedLedgerService;
pub use traits::{CommandOutcome, PointsLedger};
