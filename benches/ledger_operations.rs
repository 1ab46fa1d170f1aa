//! Benchmark suite for ledger operations and processing strategies
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Inputs are generated in memory (or into a temporary CSV file for the
//! strategy benchmarks). Each dataset interleaves credits from a handful of
//! payers, out-of-order timestamps, historic reductions and spends.

use chrono::{DateTime, Duration, TimeZone, Utc};
use divan::Bencher;
use rust_points_engine::cli::StrategyType;
use rust_points_engine::strategy::{create_strategy, BatchConfig, RunConfig};
use rust_points_engine::{LedgerService, TransactionRecord};
use std::io::Write;
use tempfile::NamedTempFile;

const PAYERS: [&str; 5] = ["DANNON", "UNILEVER", "MILLER COORS", "KRAFT", "NESTLE"];

fn main() {
    divan::main();
}

fn timestamp(i: usize) -> DateTime<Utc> {
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    // Scramble the order so inserts land all over the ledger
    base + Duration::minutes(((i * 7919) % 100_000) as i64)
}

fn credits(count: usize) -> Vec<TransactionRecord> {
    (0..count)
        .map(|i| TransactionRecord::new(PAYERS[i % PAYERS.len()], 100, timestamp(i)))
        .collect()
}

fn filled_service(count: usize) -> LedgerService {
    let mut service = LedgerService::default();
    for record in credits(count) {
        service.record_transaction(record).unwrap();
    }
    service
}

fn command_csv(count: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type,payer,points,timestamp").unwrap();
    for i in 0..count {
        let payer = PAYERS[i % PAYERS.len()];
        let at = timestamp(i).to_rfc3339();
        match i % 10 {
            9 => writeln!(file, "spend,,150,").unwrap(),
            7 => writeln!(file, "add,{},-20,{}", payer, at).unwrap(),
            _ => writeln!(file, "add,{},100,{}", payer, at).unwrap(),
        }
    }
    file.flush().unwrap();
    file
}

/// Record credits with scrambled timestamps
#[divan::bench(args = [100, 1_000, 10_000])]
fn record_out_of_order(bencher: Bencher, count: usize) {
    bencher
        .with_inputs(|| credits(count))
        .bench_values(|records| {
            let mut service = LedgerService::default();
            for record in records {
                service.record_transaction(record).unwrap();
            }
            service
        });
}

/// Spend half of the ledger in one request
#[divan::bench(args = [100, 1_000, 10_000])]
fn spend_half(bencher: Bencher, count: usize) {
    let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    bencher
        .with_inputs(|| filled_service(count))
        .bench_values(|mut service| {
            let half = service.total_balance() / 2;
            service.spend_points_at(half, now).unwrap()
        });
}

/// Spend after many historic reductions, forcing a full replay
#[divan::bench(args = [100, 1_000])]
fn spend_after_historic_reductions(bencher: Bencher, count: usize) {
    let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    bencher
        .with_inputs(|| {
            let mut service = filled_service(count);
            for i in 0..count / 10 {
                let record =
                    TransactionRecord::new(PAYERS[i % PAYERS.len()], -10, timestamp(i * 10 + 3));
                service.record_transaction(record).unwrap();
            }
            service
        })
        .bench_values(|mut service| service.spend_points_at(1, now).unwrap());
}

/// Full pipeline through each strategy
#[divan::bench(args = [StrategyType::Sync, StrategyType::Async])]
fn strategy_pipeline(bencher: Bencher, strategy_type: StrategyType) {
    let file = command_csv(2_000);
    let strategy = create_strategy(
        strategy_type,
        Some(BatchConfig::default()),
        RunConfig::default(),
    );

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(file.path(), &mut output)
            .expect("Processing failed");
        output
    });
}
