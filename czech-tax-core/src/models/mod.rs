mod depreciation;
mod expense_mode;
mod income_record;
mod rule_set;

pub use depreciation::{
    DepreciableAsset, DepreciationGroup, DepreciationMethod, DepreciationSchedule, ProfitTrend,
    YearlyDepreciation,
};
pub use expense_mode::ExpenseMode;
pub use income_record::{IncomeRecord, IncomeSource};
pub use rule_set::{ExpenseTable, ExpenseTier, RuleSet};
