use async_trait::async_trait;

use crate::TaxError;
use crate::models::RuleSet;

/// Anything that can supply rulesets: a config file, a database table, the
/// built-in set. One implementation per backend; callers hand a source to
/// [`RuleSetRegistry::load_from`].
///
/// [`RuleSetRegistry::load_from`]: crate::rules::RuleSetRegistry::load_from
#[async_trait]
pub trait RuleSetSource: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn source_name(&self) -> &str;

    /// Read every ruleset this source holds.
    ///
    /// Implementations should map their own failures to
    /// [`TaxError::InvalidConfiguration`].
    async fn load(&self) -> Result<Vec<RuleSet>, TaxError>;
}
