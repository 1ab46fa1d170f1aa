//! Rust Points Engine CLI
//!
//! Command-line interface for replaying a loyalty points ledger from a CSV file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync commands.csv > balances.csv
//! cargo run -- --report spends commands.csv > spends.csv
//! cargo run -- --strategy async --batch-size 2000 --max-pending 8 commands.csv
//! RUST_LOG=debug cargo run -- commands.csv
//! ```
//!
//! The program reads `add` and `spend` commands from the input CSV file,
//! applies them to a fresh ledger using the selected processing strategy and
//! writes the selected report to stdout. Diagnostics go to stderr, filtered by
//! `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_points_engine::cli;
use rust_points_engine::strategy::{self, RunConfig};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        let run_config = RunConfig {
            service: args.to_service_config(),
            report: args.report,
        };
        strategy::create_strategy(args.strategy, config, run_config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
