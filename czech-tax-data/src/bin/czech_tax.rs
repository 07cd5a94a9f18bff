use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use czech_tax_core::calculations::{
    CorporateTaxEngine, DepreciationEngine, OsvcInput, PayoutComparator, PersonalIncomeEngine,
    SelfEmploymentEngine,
};
use czech_tax_core::rules::{DEFAULT_YEAR, RuleSetRegistry};
use czech_tax_core::{
    DepreciableAsset, DepreciationGroup, DepreciationMethod, ExpenseMode, IncomeRecord,
    IncomeSource, ProfitTrend, RuleSet,
};
use czech_tax_data::logging::init_logging;
use czech_tax_data::{CsvRuleSetSource, IncomeLoader};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// Compute Czech corporate, personal and self-employed taxes and depreciation
/// schedules. Results are printed to stdout as JSON.
#[derive(Parser, Debug)]
#[command(name = "czech-tax")]
#[command(version, about, long_about = None)]
struct Args {
    /// Rulesets CSV file; the built-in rulesets are used when omitted
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Tax year whose ruleset is applied
    #[arg(short, long, global = true, default_value_t = DEFAULT_YEAR)]
    year: i32,

    /// Fall back to the default ruleset when the year is not configured
    #[arg(long, global = true, default_value_t = false)]
    allow_fallback: bool,

    /// Log level or filter directive; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Corporate income tax on a company profit
    Corporate {
        #[arg(long, allow_hyphen_values = true)]
        profit: Decimal,
    },

    /// Withholding tax on a gross dividend
    Dividend {
        #[arg(long, allow_hyphen_values = true)]
        gross: Decimal,
    },

    /// Employee deductions, net pay and employer cost of a salary
    Salary {
        #[arg(long, allow_hyphen_values = true)]
        gross: Decimal,

        /// Other taxable income, counted towards the solidarity threshold
        #[arg(long, default_value = "0")]
        other_income: Decimal,
    },

    /// Self-employed income tax, health and social insurance
    Osvc {
        /// Income records CSV file
        #[arg(long, conflicts_with = "income", required_unless_present = "income")]
        income_file: Option<PathBuf>,

        /// Total income in CZK, instead of an income file
        #[arg(long)]
        income: Option<Decimal>,

        /// Expense mode: flat30, flat40, flat60, flat80 or actual
        #[arg(long, default_value = "flat60")]
        mode: ExpenseMode,

        /// Documented expenses, used with --mode actual
        #[arg(long)]
        actual_expenses: Option<Decimal>,

        /// Self-employment is the primary activity
        #[arg(long, default_value_t = false)]
        primary: bool,

        /// Do not subtract the basic personal tax credit
        #[arg(long, default_value_t = false)]
        no_basic_credit: bool,
    },

    /// Full depreciation schedule for an asset
    Depreciation {
        /// Acquisition value in CZK
        #[arg(long)]
        value: Decimal,

        #[arg(long, default_value = "0")]
        residual: Decimal,

        /// Depreciation group, 1 to 6
        #[arg(long)]
        group: u8,

        /// linear or accelerated
        #[arg(long)]
        method: DepreciationMethod,

        #[arg(long)]
        start_year: i32,
    },

    /// Linear and accelerated schedules side by side, with a recommendation
    CompareMethods {
        #[arg(long)]
        value: Decimal,

        #[arg(long, default_value = "0")]
        residual: Decimal,

        #[arg(long)]
        group: u8,

        #[arg(long)]
        start_year: i32,

        /// Expected profit trend: increasing, decreasing or stable
        #[arg(long, default_value = "stable")]
        trend: ProfitTrend,
    },

    /// Compare paying a profit out as a dividend or as salary
    Payout {
        #[arg(long, allow_hyphen_values = true)]
        profit: Decimal,

        #[arg(long, default_value = "0")]
        other_income: Decimal,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}

async fn build_registry(rules_file: Option<&Path>) -> Result<RuleSetRegistry> {
    let Some(path) = rules_file else {
        return Ok(RuleSetRegistry::with_builtin());
    };

    let mut registry = RuleSetRegistry::new();
    let count = registry
        .load_from(&CsvRuleSetSource::new(path))
        .await
        .with_context(|| format!("Failed to load rulesets from: {}", path.display()))?;

    if let Some(latest) = registry.available_years().last().copied() {
        registry.set_default_year(latest)?;
    }
    info!(count, years = ?registry.available_years(), "using rulesets from file");

    Ok(registry)
}

fn resolve_rules(
    registry: &RuleSetRegistry,
    year: i32,
    allow_fallback: bool,
) -> Result<RuleSet> {
    let rules = if allow_fallback {
        registry.resolve_or_default(year)
    } else {
        registry.resolve(year)
    };
    let rules = rules.with_context(|| format!("No ruleset for tax year {year}"))?;
    Ok(rules.clone())
}

fn depreciable_asset(
    value: Decimal,
    residual: Decimal,
    group: u8,
    method: DepreciationMethod,
    start_year: i32,
) -> Result<DepreciableAsset> {
    Ok(DepreciableAsset {
        acquisition_value: value,
        residual_value: residual,
        group: DepreciationGroup::try_from(group)?,
        method,
        start_year,
    })
}

async fn osvc_income(
    income_file: Option<&Path>,
    income: Option<Decimal>,
    year: i32,
) -> Result<Vec<IncomeRecord>> {
    if let Some(path) = income_file {
        return IncomeLoader::load_file(path)
            .await
            .with_context(|| format!("Failed to load income from: {}", path.display()));
    }

    let amount = income.context("Either --income-file or --income is required")?;
    let payout_date = NaiveDate::from_ymd_opt(year, 1, 1)
        .with_context(|| format!("Invalid tax year: {year}"))?;

    Ok(vec![IncomeRecord {
        payout_date,
        source: IncomeSource::Other,
        currency: "CZK".to_string(),
        amount,
        amount_czk: amount,
        reference: None,
    }])
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.log_file.as_deref())?;

    let registry = build_registry(args.rules.as_deref()).await?;
    let rules = || resolve_rules(&registry, args.year, args.allow_fallback);

    match args.command {
        Command::Corporate { profit } => {
            print_json(&CorporateTaxEngine::new(&rules()?).corporate_tax(profit))
        }
        Command::Dividend { gross } => {
            print_json(&CorporateTaxEngine::new(&rules()?).dividend_withholding(gross))
        }
        Command::Salary {
            gross,
            other_income,
        } => print_json(&PersonalIncomeEngine::new(&rules()?).salary_tax(gross, other_income)),
        Command::Osvc {
            income_file,
            income,
            mode,
            actual_expenses,
            primary,
            no_basic_credit,
        } => {
            let rules = rules()?;
            let records = osvc_income(income_file.as_deref(), income, args.year).await?;
            let input = OsvcInput {
                expense_mode: mode,
                actual_expenses,
                is_secondary: !primary,
                apply_basic_credit: !no_basic_credit,
            };
            print_json(&SelfEmploymentEngine::new(&rules).calculate(&input, &records))
        }
        Command::Depreciation {
            value,
            residual,
            group,
            method,
            start_year,
        } => {
            let asset = depreciable_asset(value, residual, group, method, start_year)?;
            let schedule = DepreciationEngine::new()
                .calculate_schedule(&asset)
                .context("Failed to generate depreciation schedule")?;
            print_json(&schedule)
        }
        Command::CompareMethods {
            value,
            residual,
            group,
            start_year,
            trend,
        } => {
            let asset = depreciable_asset(
                value,
                residual,
                group,
                DepreciationMethod::Linear,
                start_year,
            )?;
            let comparison = DepreciationEngine::new()
                .compare_methods(&asset, trend)
                .context("Failed to compare depreciation methods")?;
            print_json(&comparison)
        }
        Command::Payout {
            profit,
            other_income,
        } => print_json(&PayoutComparator::new(&rules()?).compare(profit, other_income)),
    }
}
