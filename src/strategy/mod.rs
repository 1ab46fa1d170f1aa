//! Processing strategy module
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! covering CSV parsing, applying commands to the ledger and writing the
//! report. Synchronous and asynchronous implementations are selected at runtime.

use crate::cli::{ReportKind, StrategyType};
use crate::core::{CommandOutcome, PointsLedger, ServiceConfig};
use crate::io::csv_format::{write_balances_csv, write_spends_csv, write_transactions_csv};
use crate::types::{LedgerCommand, LedgerError, PayerDeltas};
use std::io::Write;
use std::path::Path;
use tracing::warn;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Apply the commands in `input_path` to a fresh ledger and write the report
    ///
    /// Commands that fail to parse or are rejected by the ledger are logged
    /// and skipped; processing continues with the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (`FileNotFound`, `IoError`)
    /// - The report cannot be written (`IoError`)
    /// - The async ledger writer task fails (`WorkerFailed`)
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Settings shared by every strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Ledger service behavior
    pub service: ServiceConfig,
    /// Report written after the last command
    pub report: ReportKind,
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch_config` only affects the async strategy; `None` uses its defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    run_config: RunConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(run_config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch_config.unwrap_or_default(),
            run_config,
        )),
    }
}

/// Apply one command, logging rejections instead of returning them
///
/// Deltas of accepted spends are appended to `spends`.
pub(crate) fn apply_command<L: PointsLedger>(
    ledger: &mut L,
    command: LedgerCommand,
    spends: &mut Vec<PayerDeltas>,
) {
    let command_type = command.command_type();
    match ledger.apply(command) {
        Ok(CommandOutcome::Spent(deltas)) => spends.push(deltas),
        Ok(CommandOutcome::Recorded(_)) => {}
        Err(e) => warn!(command = ?command_type, error = %e, "command rejected"),
    }
}

/// Write the selected report for the final ledger state
pub(crate) fn write_report<L: PointsLedger>(
    report: ReportKind,
    ledger: &L,
    spends: &[PayerDeltas],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match report {
        ReportKind::Balances => write_balances_csv(&ledger.balances(), output),
        ReportKind::Transactions => write_transactions_csv(&ledger.transactions(), output),
        ReportKind::Spends => write_spends_csv(spends, output),
    }
}
