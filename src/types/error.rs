//! Error types for the points engine
//!
//! This module defines all error types that can occur while reading commands
//! and applying them to the ledger.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed rows, unknown command types, bad numbers or timestamps
//! - **Validation Errors**: Empty payer, negative spend, payer balance would go negative
//! - **Balance Errors**: Spending more points than the ledger holds
//! - **Arithmetic Errors**: Overflow of point totals

use super::transaction::{Payer, Points};
use thiserror::Error;

/// Main error type for the points engine
///
/// Every variant except the file and runtime failures is recoverable: the
/// offending command is rejected and processing continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// The malformed row is skipped and processing continues with the next one.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown command type in an input row
    #[error("Invalid command type '{command_type}'")]
    InvalidCommandType {
        /// The invalid command type string
        command_type: String,
    },

    /// A field required by the command is missing
    #[error("{command} command requires a {field}")]
    MissingField {
        /// Command that requires the field
        command: String,
        /// Name of the missing field
        field: String,
    },

    /// Points value is not an integer
    #[error("Invalid points '{value}'")]
    InvalidPoints {
        /// The invalid points string
        value: String,
    },

    /// Timestamp is not a valid RFC 3339 date-time
    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// The invalid timestamp string
        value: String,
    },

    /// Payer is empty or blank
    #[error("Payer must not be empty")]
    EmptyPayer,

    /// Spend request with a negative number of points
    #[error("Cannot spend a negative number of points ({points})")]
    NegativeSpend {
        /// The requested points
        points: Points,
    },

    /// Negative transaction larger than the payer's current balance
    #[error("Transaction of {points} points would leave payer {payer} with a negative balance (balance {balance})")]
    NegativePayerBalance {
        /// Payer of the rejected transaction
        payer: Payer,
        /// Points of the rejected transaction
        points: Points,
        /// Payer balance at the time of the request
        balance: Points,
    },

    /// Spend request larger than the total balance, rejected at the service boundary
    #[error("Not enough available points: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Total balance of the ledger
        available: Points,
        /// Requested points
        requested: Points,
    },

    /// Spend that the ledger itself cannot fulfil after replaying historic adjustments
    ///
    /// No credit is touched when this is returned.
    #[error("Spend of {requested} points cannot be fulfilled: only {available} points are spendable")]
    Shortfall {
        /// Requested points
        requested: Points,
        /// Spendable points after historic replay
        available: Points,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for payer {payer}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Payer of the operation
        payer: Payer,
    },

    /// The async ledger writer task failed
    #[error("Ledger worker failed: {message}")]
    WorkerFailed {
        /// Description of the failure
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Map a failure to open `path` onto FileNotFound or IoError
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            LedgerError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            }
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an InvalidCommandType error
    pub fn invalid_command_type(command_type: &str) -> Self {
        LedgerError::InvalidCommandType {
            command_type: command_type.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(command: &str, field: &str) -> Self {
        LedgerError::MissingField {
            command: command.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an InvalidPoints error
    pub fn invalid_points(value: &str) -> Self {
        LedgerError::InvalidPoints {
            value: value.to_string(),
        }
    }

    /// Create an InvalidTimestamp error
    pub fn invalid_timestamp(value: &str) -> Self {
        LedgerError::InvalidTimestamp {
            value: value.to_string(),
        }
    }

    /// Create a NegativePayerBalance error
    pub fn negative_payer_balance(payer: &str, points: Points, balance: Points) -> Self {
        LedgerError::NegativePayerBalance {
            payer: payer.to_string(),
            points,
            balance,
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(available: Points, requested: Points) -> Self {
        LedgerError::InsufficientBalance {
            available,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, payer: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            payer: payer.to_string(),
        }
    }

    /// Whether processing can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            LedgerError::FileNotFound { .. }
                | LedgerError::IoError { .. }
                | LedgerError::WorkerFailed { .. }
        )
    }
}
