//! Ruleset loading from CSV.
//!
//! One row per `(year, version)`. Headers are matched by name, so column
//! order does not matter. Leave `health_min_base` or `social_min_base` empty
//! when no minimum assessment base applies.
//!
//! ```csv
//! year,version,effective_from,description,corporate_tax_rate,dividend_withholding_rate,personal_tax_rate,personal_tax_rate_high,solidarity_threshold,basic_tax_credit,employee_social_rate,employer_social_rate,employee_health_rate,employer_health_rate,social_max_base,expense_rate_30,expense_cap_30,expense_rate_40,expense_cap_40,expense_rate_60,expense_cap_60,expense_rate_80,expense_cap_80,health_base_rate,health_contrib_rate,health_min_base,social_base_rate,social_contrib_rate,social_secondary_threshold,social_min_base
//! 2025,1.0,2025-01-01,Statutory rates,0.21,0.15,0.15,0.23,1935552,30840,0.065,0.248,0.045,0.09,2110416,0.30,600000,0.40,800000,0.60,2000000,0.80,1600000,0.50,0.135,,0.55,0.292,105520,
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use czech_tax_core::rules::RuleSetSource;
use czech_tax_core::{ExpenseTable, ExpenseTier, RuleSet, TaxError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading ruleset data.
#[derive(Debug, Error)]
pub enum RuleSetLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("ruleset on row {row} is invalid: {source}")]
    InvalidRuleSet { row: usize, source: TaxError },
}

impl From<csv::Error> for RuleSetLoaderError {
    fn from(err: csv::Error) -> Self {
        RuleSetLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the rulesets CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleSetRecord {
    pub year: i32,
    pub version: String,
    pub effective_from: NaiveDate,
    pub description: Option<String>,
    pub corporate_tax_rate: Decimal,
    pub dividend_withholding_rate: Decimal,
    pub personal_tax_rate: Decimal,
    pub personal_tax_rate_high: Decimal,
    pub solidarity_threshold: Decimal,
    pub basic_tax_credit: Decimal,
    pub employee_social_rate: Decimal,
    pub employer_social_rate: Decimal,
    pub employee_health_rate: Decimal,
    pub employer_health_rate: Decimal,
    pub social_max_base: Decimal,
    pub expense_rate_30: Decimal,
    pub expense_cap_30: Decimal,
    pub expense_rate_40: Decimal,
    pub expense_cap_40: Decimal,
    pub expense_rate_60: Decimal,
    pub expense_cap_60: Decimal,
    pub expense_rate_80: Decimal,
    pub expense_cap_80: Decimal,
    pub health_base_rate: Decimal,
    pub health_contrib_rate: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub health_min_base: Option<Decimal>,
    pub social_base_rate: Decimal,
    pub social_contrib_rate: Decimal,
    pub social_secondary_threshold: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub social_min_base: Option<Decimal>,
}

impl From<RuleSetRecord> for RuleSet {
    fn from(row: RuleSetRecord) -> Self {
        RuleSet {
            year: row.year,
            version: row.version,
            effective_from: row.effective_from,
            description: row.description.filter(|d| !d.is_empty()),
            corporate_tax_rate: row.corporate_tax_rate,
            dividend_withholding_rate: row.dividend_withholding_rate,
            personal_tax_rate: row.personal_tax_rate,
            personal_tax_rate_high: row.personal_tax_rate_high,
            solidarity_threshold: row.solidarity_threshold,
            basic_tax_credit: row.basic_tax_credit,
            employee_social_rate: row.employee_social_rate,
            employer_social_rate: row.employer_social_rate,
            employee_health_rate: row.employee_health_rate,
            employer_health_rate: row.employer_health_rate,
            social_max_base: row.social_max_base,
            expenses: ExpenseTable {
                flat30: ExpenseTier {
                    rate: row.expense_rate_30,
                    cap: row.expense_cap_30,
                },
                flat40: ExpenseTier {
                    rate: row.expense_rate_40,
                    cap: row.expense_cap_40,
                },
                flat60: ExpenseTier {
                    rate: row.expense_rate_60,
                    cap: row.expense_cap_60,
                },
                flat80: ExpenseTier {
                    rate: row.expense_rate_80,
                    cap: row.expense_cap_80,
                },
            },
            health_base_rate: row.health_base_rate,
            health_contrib_rate: row.health_contrib_rate,
            health_min_base: row.health_min_base,
            social_base_rate: row.social_base_rate,
            social_contrib_rate: row.social_contrib_rate,
            social_secondary_threshold: row.social_secondary_threshold,
            social_min_base: row.social_min_base,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for rulesets kept in CSV files.
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse and validate rulesets from a CSV reader, in file order.
    ///
    /// # Errors
    ///
    /// * [`RuleSetLoaderError::CsvParse`] if the CSV is malformed or a
    ///   required column is missing.
    /// * [`RuleSetLoaderError::InvalidRuleSet`] if a row fails
    ///   [`RuleSet::validate`]. `row` is 1-based, not counting the header.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RuleSet>, RuleSetLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rulesets = Vec::new();

        for (idx, result) in csv_reader.deserialize::<RuleSetRecord>().enumerate() {
            let rules = RuleSet::from(result?);
            rules
                .validate()
                .map_err(|source| RuleSetLoaderError::InvalidRuleSet {
                    row: idx + 1,
                    source,
                })?;
            debug!(year = rules.year, version = %rules.version, "parsed ruleset");
            rulesets.push(rules);
        }

        Ok(rulesets)
    }

    /// Read a rulesets file from disk and delegate to [`parse`](Self::parse).
    pub async fn load_file(path: &Path) -> Result<Vec<RuleSet>, RuleSetLoaderError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| RuleSetLoaderError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
        let rulesets = Self::parse(contents.as_bytes())?;
        info!(path = %path.display(), count = rulesets.len(), "loaded rulesets from CSV");
        Ok(rulesets)
    }
}

/// A [`RuleSetSource`] backed by a rulesets CSV file.
#[derive(Debug, Clone)]
pub struct CsvRuleSetSource {
    path: PathBuf,
    name: String,
}

impl CsvRuleSetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleSetSource for CsvRuleSetSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Vec<RuleSet>, TaxError> {
        RuleSetLoader::load_file(&self.path)
            .await
            .map_err(|err| TaxError::InvalidConfiguration(format!("{}: {err}", self.name)))
    }
}
