use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::TaxError;
use crate::models::RuleSet;
use crate::rules::RuleSetSource;
use crate::rules::defaults::{self, DEFAULT_YEAR};

/// Registry of [`RuleSet`]s, keyed by tax year.
///
/// Each year may hold several versions; the most recently registered one is
/// what [`resolve`](Self::resolve) returns. A `(year, version)` pair can be
/// registered once: re-registering identical values is a no-op, anything
/// else is rejected so results computed against it stay reproducible.
///
/// Typical lifetime:
/// 1. Create with [`RuleSetRegistry::new`] or [`RuleSetRegistry::with_builtin`].
/// 2. Call [`register`](Self::register) or [`load_from`](Self::load_from).
/// 3. Share it read-only and call `resolve` per computation.
#[derive(Debug, Clone, Default)]
pub struct RuleSetRegistry {
    rulesets: BTreeMap<i32, Vec<RuleSet>>,
    default_year: Option<i32>,
}

impl RuleSetRegistry {
    /// Create an empty registry with no default year.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in rulesets, with the most recent
    /// one designated as the fallback default.
    pub fn with_builtin() -> Self {
        let mut rulesets: BTreeMap<i32, Vec<RuleSet>> = BTreeMap::new();
        for rules in defaults::builtin() {
            rulesets.entry(rules.year).or_default().push(rules);
        }
        Self {
            rulesets,
            default_year: Some(DEFAULT_YEAR),
        }
    }

    /// Validate and register a ruleset.
    ///
    /// # Errors
    /// * [`TaxError::InvalidConfiguration`] if the ruleset fails
    ///   [`RuleSet::validate`], or if its `(year, version)` is already
    ///   registered with different values.
    pub fn register(
        &mut self,
        rules: RuleSet,
    ) -> Result<(), TaxError> {
        rules.validate()?;

        let versions = self.rulesets.entry(rules.year).or_default();
        match versions.iter().find(|r| r.version == rules.version) {
            Some(existing) if *existing == rules => {
                debug!(year = rules.year, version = %rules.version, "ruleset already registered");
                Ok(())
            }
            Some(_) => Err(TaxError::InvalidConfiguration(format!(
                "ruleset {}/{} is already registered with different values; register a new version instead",
                rules.year, rules.version
            ))),
            None => {
                debug!(year = rules.year, version = %rules.version, "registered ruleset");
                versions.push(rules);
                Ok(())
            }
        }
    }

    /// Register every ruleset a source yields and return how many it held.
    ///
    /// Stops at the first ruleset that fails to register; rulesets before it
    /// stay registered.
    pub async fn load_from(
        &mut self,
        source: &dyn RuleSetSource,
    ) -> Result<usize, TaxError> {
        let loaded = source.load().await?;
        let count = loaded.len();

        for rules in loaded {
            self.register(rules)?;
        }

        info!(source = source.source_name(), count, "loaded rulesets");
        Ok(count)
    }

    /// Designate the year [`resolve_or_default`](Self::resolve_or_default)
    /// falls back to.
    ///
    /// # Errors
    /// * [`TaxError::InvalidConfiguration`] if no ruleset is registered for
    ///   `year`.
    pub fn set_default_year(
        &mut self,
        year: i32,
    ) -> Result<(), TaxError> {
        if !self.rulesets.contains_key(&year) {
            return Err(self.missing_year(year));
        }
        self.default_year = Some(year);
        Ok(())
    }

    pub fn default_year(&self) -> Option<i32> {
        self.default_year
    }

    /// Every year with at least one ruleset, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        self.rulesets.keys().copied().collect()
    }

    /// Version tags registered for `year`, in registration order.
    pub fn versions(
        &self,
        year: i32,
    ) -> Vec<&str> {
        self.rulesets
            .get(&year)
            .map(|v| v.iter().map(|r| r.version.as_str()).collect())
            .unwrap_or_default()
    }

    /// Return the latest ruleset registered for `year`.
    ///
    /// # Errors
    /// * [`TaxError::InvalidConfiguration`] if the year has no ruleset.
    pub fn resolve(
        &self,
        year: i32,
    ) -> Result<&RuleSet, TaxError> {
        self.rulesets
            .get(&year)
            .and_then(|v| v.last())
            .ok_or_else(|| self.missing_year(year))
    }

    /// Return one exact `(year, version)` ruleset, e.g. to reproduce a
    /// stored result.
    pub fn resolve_version(
        &self,
        year: i32,
        version: &str,
    ) -> Result<&RuleSet, TaxError> {
        self.rulesets
            .get(&year)
            .and_then(|v| v.iter().find(|r| r.version == version))
            .ok_or_else(|| {
                TaxError::InvalidConfiguration(format!(
                    "no ruleset {year}/{version}; registered versions for {year}: {:?}",
                    self.versions(year)
                ))
            })
    }

    /// Like [`resolve`](Self::resolve), but an unconfigured year falls back to
    /// the designated default ruleset and logs a warning.
    ///
    /// # Errors
    /// * [`TaxError::InvalidConfiguration`] if the year is missing and no
    ///   default is designated.
    pub fn resolve_or_default(
        &self,
        year: i32,
    ) -> Result<&RuleSet, TaxError> {
        if let Ok(rules) = self.resolve(year) {
            return Ok(rules);
        }

        let default_year = self.default_year.ok_or_else(|| self.missing_year(year))?;
        let rules = self.resolve(default_year)?;
        warn!(
            requested_year = year,
            fallback_year = rules.year,
            fallback_version = %rules.version,
            "no ruleset configured for year; using default ruleset"
        );
        Ok(rules)
    }

    fn missing_year(
        &self,
        year: i32,
    ) -> TaxError {
        TaxError::InvalidConfiguration(format!(
            "no ruleset registered for year {year}; available: {:?}",
            self.available_years()
        ))
    }
}
