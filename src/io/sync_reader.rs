//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger commands from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<LedgerCommand, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use rust_points_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Applying command: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `ParseError` items carrying the line number
//!
//! Rows are read one at a time; memory use does not grow with the file size.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerCommand, LedgerError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// # Examples
///
/// ```no_run
/// use rust_points_engine::io::sync_reader::SyncReader;
/// use std::path::Path;
///
/// let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
/// let commands: Vec<_> = reader.filter_map(Result::ok).collect();
/// println!("Successfully parsed {} commands", commands.len());
/// ```
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (spend rows may omit trailing columns)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the path does not exist, `IoError` for any other
    /// failure to open it, `ParseError` if the header row cannot be read.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::open_failed(path, e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<LedgerCommand, LedgerError>;

    /// Get the next command from the CSV file
    ///
    /// Returns `None` at end of file. Conversion errors are reported as
    /// `ParseError` with the physical line the row starts on (the header is
    /// line 1), so quoted fields spanning several lines are accounted for.
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map(|pos| pos.line());
                Some(
                    self.record
                        .deserialize::<CsvRecord>(Some(&self.headers))
                        .map_err(LedgerError::from)
                        .and_then(|csv_record| {
                            convert_csv_record(csv_record)
                                .map_err(|e| LedgerError::parse_error(line, e.to_string()))
                        }),
                )
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
