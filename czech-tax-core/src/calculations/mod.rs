//! Tax, insurance and depreciation engines.
//!
//! Each engine borrows a resolved [`RuleSet`](crate::models::RuleSet) (the
//! depreciation engine needs none) and returns a fresh result record per
//! call. Engines hold no state between calls.

pub mod common;
pub mod corporate;
pub mod depreciation;
pub mod payout;
pub mod salary;
pub mod self_employment;

pub use corporate::{CorporateTaxEngine, CorporateTaxResult, DividendTaxResult, FullCycleResult};
pub use depreciation::{
    DepreciationEngine, IMMEDIATE_EXPENSE_LIMIT, MethodComparison, MethodSummary,
};
pub use payout::{
    DividendScenario, PayoutComparator, PayoutComparison, PayoutOption, SalaryScenario, format_czk,
};
pub use salary::{PersonalIncomeEngine, SalaryTaxResult};
pub use self_employment::{
    CsszResult, DpfoResult, OsvcComputation, OsvcInput, OsvcSummary, SelfEmploymentEngine,
    VzpResult,
};
