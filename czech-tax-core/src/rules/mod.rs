//! Ruleset configuration: the built-in sets, the registry that resolves a
//! ruleset for a tax year, and the source seam rulesets are loaded through.

pub mod defaults;
mod registry;
mod source;

pub use defaults::{BuiltinRuleSets, DEFAULT_YEAR};
pub use registry::RuleSetRegistry;
pub use source::RuleSetSource;
