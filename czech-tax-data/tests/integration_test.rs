//! Integration tests running the engines over the CSV fixtures.

use std::path::PathBuf;

use czech_tax_core::calculations::{OsvcInput, PayoutComparator, SelfEmploymentEngine};
use czech_tax_core::rules::RuleSetRegistry;
use czech_tax_core::rules::defaults::{rules_2025, rules_2026};
use czech_tax_core::{ExpenseMode, IncomeRecord, IncomeSource, TaxError};
use czech_tax_data::{CsvRuleSetSource, IncomeLoader, RuleSetLoader};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const RULESETS_CSV: &str = include_str!("../test-data/rulesets.csv");
const INCOME_CSV_2025: &str = include_str!("../test-data/income_2025.csv");

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

async fn setup_registry() -> RuleSetRegistry {
    let mut registry = RuleSetRegistry::new();
    registry
        .load_from(&CsvRuleSetSource::new(fixture("rulesets.csv")))
        .await
        .expect("Failed to load rulesets fixture");
    registry
}

// =============================================================================
// ruleset loading
// =============================================================================

#[test]
fn test_parse_rulesets_fixture() {
    let rulesets = RuleSetLoader::parse(RULESETS_CSV.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(rulesets.len(), 3);
    assert_eq!(rulesets[0], rules_2025());
    assert_eq!(rulesets[2], rules_2026());
}

#[tokio::test]
async fn test_load_rulesets_into_registry() {
    let registry = setup_registry().await;

    assert_eq!(registry.available_years(), vec![2025, 2026]);
    assert_eq!(registry.versions(2025), vec!["1.0", "1.1"]);
    assert_eq!(registry.resolve(2025).unwrap().version, "1.1");
    assert_eq!(
        registry.resolve_version(2025, "1.0").unwrap(),
        &rules_2025()
    );
}

#[tokio::test]
async fn test_reloading_same_file_is_idempotent() {
    let mut registry = setup_registry().await;

    let count = registry
        .load_from(&CsvRuleSetSource::new(fixture("rulesets.csv")))
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(registry.versions(2025), vec!["1.0", "1.1"]);
}

#[tokio::test]
async fn test_file_rulesets_conflict_with_changed_builtin() {
    let mut registry = RuleSetRegistry::new();
    registry
        .register(czech_tax_core::RuleSet {
            basic_tax_credit: dec!(24840),
            ..rules_2025()
        })
        .unwrap();

    let err = registry
        .load_from(&CsvRuleSetSource::new(fixture("rulesets.csv")))
        .await
        .unwrap_err();

    assert!(matches!(err, TaxError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn test_missing_year_is_an_error_without_fallback() {
    let mut registry = setup_registry().await;

    assert!(registry.resolve(2024).is_err());
    assert!(registry.resolve_or_default(2024).is_err());

    registry.set_default_year(2026).unwrap();
    assert_eq!(registry.resolve_or_default(2024).unwrap().year, 2026);
}

// =============================================================================
// income loading and OSVČ computation
// =============================================================================

#[test]
fn test_parse_income_fixture() {
    let records = IncomeLoader::parse(INCOME_CSV_2025.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(records.len(), 6);
    assert_eq!(records[2].source, IncomeSource::AppstoreInApp);
    assert_eq!(records[3].reference, None);
    assert_eq!(IncomeRecord::total_czk(&records), dec!(500000));
}

#[tokio::test]
async fn test_osvc_from_fixtures() {
    let registry = setup_registry().await;
    let rules = registry.resolve_version(2025, "1.0").unwrap();
    let records = IncomeLoader::load_file(&fixture("income_2025.csv"))
        .await
        .expect("Failed to load income");

    let result = SelfEmploymentEngine::new(rules).calculate(&OsvcInput::default(), &records);

    assert_eq!(result.total_income, dec!(500000));
    assert_eq!(result.total_expenses, dec!(300000));
    assert_eq!(result.profit, dec!(200000));
    assert_eq!(result.dpfo.tax_due, dec!(0));
    assert_eq!(result.vzp.contribution, dec!(13500));
    assert_eq!(result.vzp.monthly_advance, dec!(1125));
    assert_eq!(result.cssz.contribution, dec!(32120));
    assert_eq!(result.cssz.monthly_advance, dec!(2677));
    assert_eq!(result.total_due, dec!(45620));
    assert_eq!(result.included_entries, 6);
    assert_eq!(result.ruleset_version, "1.0");
}

#[tokio::test]
async fn test_osvc_with_minimum_bases() {
    let registry = setup_registry().await;
    let rules = registry.resolve(2025).unwrap();
    let records = IncomeLoader::parse(INCOME_CSV_2025.as_bytes()).unwrap();

    let result = SelfEmploymentEngine::new(rules).calculate(&OsvcInput::default(), &records);

    assert_eq!(result.vzp.assessment_base, dec!(258000));
    assert_eq!(result.vzp.contribution, dec!(34830));
    assert_eq!(result.cssz.assessment_base, dec!(140000));
    assert_eq!(result.cssz.contribution, dec!(40880));
    assert_eq!(result.total_due, dec!(75710));
    assert_eq!(result.summary().ruleset_version, "1.1");
}

#[tokio::test]
async fn test_osvc_actual_expenses_from_fixture() {
    let registry = setup_registry().await;
    let rules = registry.resolve(2026).unwrap();
    let records = IncomeLoader::parse(INCOME_CSV_2025.as_bytes()).unwrap();
    let input = OsvcInput {
        expense_mode: ExpenseMode::Actual,
        actual_expenses: Some(dec!(120000)),
        is_secondary: false,
        apply_basic_credit: true,
    };

    let result = SelfEmploymentEngine::new(rules).calculate(&input, &records);

    // profit 380000: 57000 - 30840 tax; 190000 × 0.135; 209000 × 0.292
    assert_eq!(result.dpfo.tax_due, dec!(26160));
    assert_eq!(result.vzp.contribution, dec!(25650));
    assert_eq!(result.cssz.contribution, dec!(61028));
}

// =============================================================================
// payout comparison
// =============================================================================

#[tokio::test]
async fn test_payout_uses_file_ruleset_thresholds() {
    let registry = setup_registry().await;

    let with_2025 = PayoutComparator::new(registry.resolve(2025).unwrap())
        .compare(dec!(1990000), dec!(0));
    let with_2026 = PayoutComparator::new(registry.resolve(2026).unwrap())
        .compare(dec!(1990000), dec!(0));

    // 54448 above the 2025 threshold × 0.08; none above 2026's
    assert_eq!(
        with_2025.salary.total_tax - with_2026.salary.total_tax,
        dec!(4356)
    );
    assert_eq!(with_2025.dividend, with_2026.dividend);
}
