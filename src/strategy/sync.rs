//! Synchronous processing strategy
//!
//! Single-threaded implementation of the ProcessingStrategy trait. It
//! delegates:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Validation and FIFO spending to `LedgerService`
//! - Report output to the `csv_format` writers
//!
//! Commands are streamed one row at a time; only the ledger itself grows
//! with the input.

use crate::core::LedgerService;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{apply_command, write_report, ProcessingStrategy, RunConfig};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_points_engine::strategy::{ProcessingStrategy, RunConfig, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(RunConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    config: RunConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let mut service = LedgerService::new(self.config.service.clone());
        let mut spends = Vec::new();

        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(command) => apply_command(&mut service, command, &mut spends),
                Err(e) if e.is_recoverable() => warn!(error = %e, "skipping malformed row"),
                Err(e) => return Err(e),
            }
        }

        info!(
            records = service.list_transactions().len(),
            spends = spends.len(),
            "input processed"
        );
        write_report(self.config.report, &service, &spends, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportKind;
    use crate::core::ServiceConfig;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(config: RunConfig, content: &str) -> String {
        let file = create_temp_csv(content);
        let mut output = Vec::new();

        SyncProcessingStrategy::new(config)
            .process(file.path(), &mut output)
            .unwrap();

        String::from_utf8(output).unwrap()
    }

    const PROVIDED: &str = "type,payer,points,timestamp\n\
        add,DANNON,1000,2020-11-02T14:00:00Z\n\
        add,UNILEVER,200,2020-10-31T11:00:00Z\n\
        add,DANNON,-200,2020-10-31T15:00:00Z\n\
        add,MILLER COORS,10000,2020-11-01T14:00:00Z\n\
        add,DANNON,300,2020-10-31T10:00:00Z\n\
        spend,,5000,\n";

    #[rstest]
    #[case::balances(
        ReportKind::Balances,
        "payer,points\nDANNON,1000\nMILLER COORS,5300\nUNILEVER,0\n"
    )]
    #[case::spends(
        ReportKind::Spends,
        "spend,payer,points\n1,DANNON,-100\n1,MILLER COORS,-4700\n1,UNILEVER,-200\n"
    )]
    fn test_sync_strategy_provided_example(#[case] report: ReportKind, #[case] expected: &str) {
        let config = RunConfig {
            report,
            ..RunConfig::default()
        };

        assert_eq!(run(config, PROVIDED), expected);
    }

    #[test]
    fn test_sync_strategy_transactions_report() {
        let config = RunConfig {
            report: ReportKind::Transactions,
            ..RunConfig::default()
        };

        let output = run(
            config,
            "type,payer,points,timestamp\n\
             add,B,50,2020-11-01T11:00:00Z\n\
             add,A,100,2020-11-01T10:00:00Z\n",
        );

        assert_eq!(
            output,
            "payer,points,timestamp,remaining_points\n\
             A,100,2020-11-01T10:00:00Z,100\n\
             B,50,2020-11-01T11:00:00Z,50\n"
        );
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);

        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        let output = run(
            RunConfig::default(),
            "type,payer,points,timestamp\n\
             add,A,100,2020-11-01T10:00:00Z\n\
             add,B,invalid,2020-11-01T10:00:00Z\n\
             add,C,50,2020-11-01T10:00:00Z\n",
        );

        assert_eq!(output, "payer,points\nA,100\nC,50\n");
    }

    #[rstest]
    #[case::strict(true, "payer,points\nA,100\n")]
    #[case::lenient(false, "payer,points\nA,100\nB,-10\n")]
    fn test_sync_strategy_negative_balance_policy(#[case] strict: bool, #[case] expected: &str) {
        let config = RunConfig {
            service: ServiceConfig {
                strict_payer_balance: strict,
            },
            ..RunConfig::default()
        };

        let output = run(
            config,
            "type,payer,points,timestamp\n\
             add,A,100,2020-11-01T10:00:00Z\n\
             add,B,-10,2020-11-01T11:00:00Z\n",
        );

        assert_eq!(output, expected);
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
