use crate::core::ServiceConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a points ledger from a CSV command file and report the result
#[derive(Parser, Debug)]
#[command(name = "points-engine")]
#[command(about = "Replay a loyalty points ledger and spend points oldest first", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for applying commands
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Depth of the channel between reader and ledger writer (async mode only)
    #[arg(
        long = "max-pending",
        value_name = "COUNT",
        help = "Maximum number of parsed batches waiting for the ledger (default: CPU cores)"
    )]
    pub max_pending_batches: Option<usize>,

    /// Report written to stdout once all commands are applied
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "balances",
        help = "Report: 'balances', 'transactions' or 'spends'"
    )]
    pub report: ReportKind,

    /// Accept negative transactions larger than the payer's balance
    #[arg(
        long = "allow-negative-balances",
        help = "Accept negative transactions that leave their payer below zero"
    )]
    pub allow_negative_balances: bool,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available output reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Current balance per payer
    #[default]
    Balances,
    /// Every ledger record with its remaining points
    Transactions,
    /// Per-payer deltas of every accepted spend
    Spends,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values are replaced by the
    /// default with a warning (see `BatchConfig::new`).
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_pending_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_pending_batches
                    .unwrap_or(default.max_pending_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the ledger service settings from CLI arguments
    pub fn to_service_config(&self) -> ServiceConfig {
        ServiceConfig {
            strict_payer_balance: !self.allow_negative_balances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_report(&["program", "input.csv"], ReportKind::Balances)]
    #[case::transactions(&["program", "--report", "transactions", "input.csv"], ReportKind::Transactions)]
    #[case::spends(&["program", "--report", "spends", "input.csv"], ReportKind::Spends)]
    fn test_report_parsing(#[case] args: &[&str], #[case] expected: ReportKind) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.report, expected);
    }

    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "input.csv"], Some(2000), None)]
    #[case::max_pending(&["program", "--max-pending", "8", "input.csv"], None, Some(8))]
    #[case::no_options(&["program", "input.csv"], None, None)]
    #[case::all_options(
        &["program", "--strategy", "async", "--batch-size", "2000", "--max-pending", "8", "input.csv"],
        Some(2000),
        Some(8)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_pending: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_pending_batches, max_pending);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_pending(&["program", "--max-pending", "8", "input.csv"], 1000, 8)]
    #[case::all_custom(
        &["program", "--batch-size", "2000", "--max-pending", "8", "input.csv"],
        2000,
        8
    )]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_pending: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_pending_batches, expected_max_pending);
    }

    // Zero values fall back to defaults
    #[rstest]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_pending(&["program", "--max-pending", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_zero_values_fallback(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_pending: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_pending_batches, expected_max_pending);
    }

    #[rstest]
    #[case::strict_by_default(&["program", "input.csv"], true)]
    #[case::lenient(&["program", "--allow-negative-balances", "input.csv"], false)]
    fn test_service_config_conversion(#[case] args: &[&str], #[case] strict: bool) {
        let parsed = CliArgs::try_parse_from(args).unwrap();

        assert_eq!(parsed.to_service_config().strict_payer_balance, strict);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::invalid_report(&["program", "--report", "accounts", "input.csv"])]
    #[case::negative_batch_size(&["program", "--batch-size", "-1", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
