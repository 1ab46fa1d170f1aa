//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over ledger commands from a CSV source.
//! Supports batch reading for the async processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerCommand, LedgerError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Rows are pulled from the underlying reader on demand, one batch at a time.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read a batch of commands
    ///
    /// Reads up to `batch_size` rows, converting them to LedgerCommands.
    /// Invalid rows are logged as warnings and skipped, so a batch may hold
    /// fewer commands than rows consumed.
    ///
    /// # Returns
    ///
    /// The converted commands in file order. An empty vector means the end
    /// of the input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize_with_pos::<CsvRecord>();

        while batch.len() < batch_size {
            let (row, pos) = match rows.next().await {
                Some(item) => item,
                None => break,
            };

            // Line the row starts on, which differs from the row count once a
            // quoted field spans lines
            let line = Some(pos.line());
            let converted = row
                .map_err(|e| LedgerError::parse_error(line, e.to_string()))
                .and_then(|csv_record| {
                    convert_csv_record(csv_record)
                        .map_err(|e| LedgerError::parse_error(line, e.to_string()))
                });

            match converted {
                Ok(command) => batch.push(command),
                Err(e) => warn!(error = %e, "skipping malformed row"),
            }
        }

        batch
    }
}
