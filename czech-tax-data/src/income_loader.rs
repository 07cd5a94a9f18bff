//! CSV loader for OSVČ income records.
//!
//! Column order does not matter (headers are matched by name).
//!
//! | Column | Required | Type | Notes |
//! |--------------|----------|---------|---------------------------------------------|
//! | `payout_date`| yes | date | `YYYY-MM-DD` |
//! | `source` | yes | string | `appstore_paid`, `appstore_sub`, `appstore_iap`, `affiliate`, `freelance`, `other` |
//! | `currency` | yes | string | ISO 4217 code of the payout |
//! | `amount` | yes | decimal | In `currency` |
//! | `amount_czk` | yes | decimal | Already converted; the only amount the engines read |
//! | `reference` | no | string | Leave cell empty for `None` |
//!
//! ```csv
//! payout_date,source,currency,amount,amount_czk,reference
//! 2025-02-03,appstore_paid,USD,1520.40,35588.00,APPLE-2025-01
//! 2025-03-31,freelance,CZK,48000,48000,
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use czech_tax_core::{IncomeRecord, IncomeSource};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    payout_date: NaiveDate,
    source: String,
    currency: String,
    amount: Decimal,
    amount_czk: Decimal,
    #[serde(default)]
    reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading income records.
#[derive(Debug, thiserror::Error)]
pub enum IncomeLoaderError {
    /// Bad structure, missing required column, type mismatch, etc.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised income source '{value}' on row {row}")]
    InvalidSource { value: String, row: usize },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeRecord, IncomeLoaderError> {
    let source =
        IncomeSource::parse(&row.source).ok_or_else(|| IncomeLoaderError::InvalidSource {
            value: row.source.clone(),
            row: row_number,
        })?;

    Ok(IncomeRecord {
        payout_date: row.payout_date,
        source,
        currency: row.currency.to_ascii_uppercase(),
        amount: row.amount,
        amount_czk: row.amount_czk,
        reference: row.reference.filter(|r| !r.is_empty()),
    })
}

/// Loader for income records kept in CSV files.
pub struct IncomeLoader;

impl IncomeLoader {
    /// Parse income records from a CSV reader, in file order.
    ///
    /// # Errors
    ///
    /// * [`IncomeLoaderError::Parse`] if the CSV is structurally invalid or a
    ///   required field cannot be deserialised.
    /// * [`IncomeLoaderError::InvalidSource`] if a row names an unknown
    ///   income source.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<IncomeRecord>, IncomeLoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1))
            .collect()
    }

    /// Read an income file from disk and delegate to [`parse`](Self::parse).
    pub async fn load_file(path: &Path) -> Result<Vec<IncomeRecord>, IncomeLoaderError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| IncomeLoaderError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
        let records = Self::parse(contents.as_bytes())?;
        info!(
            path = %path.display(),
            count = records.len(),
            total_czk = %IncomeRecord::total_czk(&records),
            "loaded income records"
        );
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
