//! Collaborators around the computation core: ruleset and income loading
//! from CSV, and logging setup for the `czech-tax` binary.

pub mod income_loader;
pub mod logging;
pub mod rule_set_loader;

pub use income_loader::{IncomeLoader, IncomeLoaderError};
pub use rule_set_loader::{CsvRuleSetSource, RuleSetLoader, RuleSetLoaderError, RuleSetRecord};
