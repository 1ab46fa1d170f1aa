//! Asynchronous batch processing strategy
//!
//! Reading and parsing run concurrently with ledger updates, while every
//! command is still applied by one writer in file order.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_pending_batches)
//!     ├── reader: AsyncReader ──► mpsc::channel(max_pending_batches)
//!     │                                   │
//!     └── writer task ◄───────────────────┘
//!             └── SharedLedgerService (applies batches in order)
//! ```
//!
//! The channel is bounded, so the reader stalls once `max_pending_batches`
//! parsed batches are waiting. The ledger lock is only taken for the duration
//! of one command and never across an await point.

use crate::core::SharedLedgerService;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{apply_command, write_report, ProcessingStrategy, RunConfig};
use crate::types::{LedgerCommand, LedgerError};
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, info, warn};

/// Runtime threads: one for the reader, one for the ledger writer
const WORKER_THREADS: usize = 2;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Maximum number of parsed batches waiting for the ledger writer
    pub max_pending_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_pending_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults.
    pub fn new(batch_size: usize, max_pending_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_pending_batches = if max_pending_batches == 0 {
            warn!(
                max_pending_batches,
                default = default.max_pending_batches,
                "invalid max_pending_batches, using default"
            );
            default.max_pending_batches
        } else {
            max_pending_batches
        };

        Self {
            batch_size,
            max_pending_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone, Default)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    run_config: RunConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, run_config: RunConfig) -> Self {
        Self { config, run_config }
    }

    async fn run(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| LedgerError::open_failed(input_path, e))?;
        let mut reader = AsyncReader::new(file.compat());

        let ledger = SharedLedgerService::new(self.run_config.service.clone());
        let (sender, mut receiver) =
            mpsc::channel::<Vec<LedgerCommand>>(self.config.max_pending_batches);

        let mut writer_ledger = ledger.clone();
        let writer = tokio::spawn(async move {
            let mut spends = Vec::new();
            while let Some(batch) = receiver.recv().await {
                debug!(commands = batch.len(), "applying batch");
                for command in batch {
                    apply_command(&mut writer_ledger, command, &mut spends);
                }
            }
            spends
        });

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }
            if sender.send(batch).await.is_err() {
                // Receiver dropped: the writer is gone and its join result says why
                break;
            }
        }
        drop(sender);

        let spends = writer.await.map_err(|e| LedgerError::WorkerFailed {
            message: e.to_string(),
        })?;

        info!(
            records = ledger.list_transactions().len(),
            spends = spends.len(),
            "input processed"
        );
        write_report(self.run_config.report, &ledger, &spends, output)
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process commands from input file and write the report to output
    ///
    /// Builds a multi-threaded tokio runtime and blocks on the pipeline.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(self.run(input_path, output))
    }
}
