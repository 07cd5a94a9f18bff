use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    AppstorePaid,
    #[serde(rename = "appstore_sub")]
    AppstoreSubscription,
    #[serde(rename = "appstore_iap")]
    AppstoreInApp,
    Affiliate,
    Freelance,
    Other,
}

impl IncomeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppstorePaid => "appstore_paid",
            Self::AppstoreSubscription => "appstore_sub",
            Self::AppstoreInApp => "appstore_iap",
            Self::Affiliate => "affiliate",
            Self::Freelance => "freelance",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appstore_paid" => Some(Self::AppstorePaid),
            "appstore_sub" => Some(Self::AppstoreSubscription),
            "appstore_iap" => Some(Self::AppstoreInApp),
            "affiliate" => Some(Self::Affiliate),
            "freelance" => Some(Self::Freelance),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A single payout received by a self-employed person.
///
/// `amount_czk` is already converted by the caller; the engines never look
/// at `currency` or `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub payout_date: NaiveDate,
    pub source: IncomeSource,
    /// ISO 4217 code of the original payout.
    pub currency: String,
    pub amount: Decimal,
    pub amount_czk: Decimal,
    pub reference: Option<String>,
}

impl IncomeRecord {
    /// Sums the CZK amounts of all records.
    pub fn total_czk(records: &[IncomeRecord]) -> Decimal {
        records.iter().map(|r| r.amount_czk).sum()
    }
}
