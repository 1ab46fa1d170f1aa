//! CSV format handling for ledger commands and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Report serialization (balances, transactions, spends)
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Input format
//!
//! ```text
//! type,payer,points,timestamp
//! add,DANNON,1000,2020-11-02T14:00:00Z
//! spend,,5000,
//! ```

use crate::types::{
    LedgerCommand, LedgerError, PayerBalance, PayerBalances, PayerDeltas, Transaction,
    TransactionRecord,
};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::Writer;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, payer, points, timestamp.
/// Every column but `type` is optional because spend rows carry only points.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command_type: String,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default)]
    pub points: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// - `add` needs a payer, integer points and an RFC 3339 timestamp
/// - `spend` needs integer points; payer and timestamp are ignored
///
/// Command types are matched case-insensitively.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, LedgerError> {
    let command = csv_record.command_type.trim().to_lowercase();
    if command != "add" && command != "spend" {
        return Err(LedgerError::invalid_command_type(&csv_record.command_type));
    }

    let points = non_empty(csv_record.points)
        .ok_or_else(|| LedgerError::missing_field(&command, "points"))?;
    let points = points
        .parse()
        .map_err(|_| LedgerError::invalid_points(&points))?;

    if command == "spend" {
        return Ok(LedgerCommand::Spend(points));
    }

    let payer =
        non_empty(csv_record.payer).ok_or_else(|| LedgerError::missing_field(&command, "payer"))?;
    let timestamp = non_empty(csv_record.timestamp)
        .ok_or_else(|| LedgerError::missing_field(&command, "timestamp"))?;

    Ok(LedgerCommand::Record(TransactionRecord {
        payer,
        points,
        timestamp: parse_timestamp(&timestamp)?,
    }))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse an RFC 3339 timestamp, normalizing it to UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, LedgerError> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| LedgerError::invalid_timestamp(value))
}

/// Format a timestamp as RFC 3339 with whole seconds and a `Z` suffix
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn write_error(context: &str, error: csv::Error) -> LedgerError {
    LedgerError::IoError {
        message: format!("{}: {}", context, error),
    }
}

/// Write payer balances to CSV format
///
/// Columns: payer, points. Rows are ordered by payer.
pub fn write_balances_csv(
    balances: &PayerBalances,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["payer", "points"])
        .map_err(|e| write_error("Failed to write CSV header", e))?;

    for balance in PayerBalance::from_balances(balances) {
        writer
            .write_record([balance.payer, balance.points.to_string()])
            .map_err(|e| write_error("Failed to write balance record", e))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write ledger records to CSV format
///
/// Columns: payer, points, timestamp, remaining_points. Rows keep ledger order.
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["payer", "points", "timestamp", "remaining_points"])
        .map_err(|e| write_error("Failed to write CSV header", e))?;

    for tx in transactions {
        writer
            .write_record([
                tx.payer.clone(),
                tx.points.to_string(),
                format_timestamp(&tx.timestamp),
                tx.remaining_points.to_string(),
            ])
            .map_err(|e| write_error("Failed to write transaction record", e))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the deltas of accepted spends to CSV format
///
/// Columns: spend, payer, points. `spend` numbers the spends from 1.
pub fn write_spends_csv(spends: &[PayerDeltas], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["spend", "payer", "points"])
        .map_err(|e| write_error("Failed to write CSV header", e))?;

    for (number, deltas) in spends.iter().enumerate() {
        for (payer, points) in deltas {
            writer
                .write_record([(number + 1).to_string(), payer.clone(), points.to_string()])
                .map_err(|e| write_error("Failed to write spend record", e))?;
        }
    }

    writer.flush()?;
    Ok(())
}
