//! Simplifier configuration.
//!
//! Controls which rule families run and, optionally, a hard cap on the number
//! of passes the driver may make over one statement.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::RuleFamily;

/// Configuration for the [`Simplifier`](crate::Simplifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierConfig {
    /// Explicitly enabled families (override the defaults).
    pub enabled_rules: HashSet<RuleFamily>,
    /// Explicitly disabled families (override the defaults).
    pub disabled_rules: HashSet<RuleFamily>,
    /// Hard cap on the number of passes over a statement. When unset the
    /// driver derives the limit from the statement's size.
    pub max_passes: Option<usize>,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            enabled_rules: HashSet::new(),
            disabled_rules: HashSet::new(),
            max_passes: None,
        }
    }
}

impl SimplifierConfig {
    /// Creates a configuration with every family disabled.
    pub fn none() -> Self {
        let mut config = Self::default();
        config.disabled_rules.extend(RuleFamily::all().iter().copied());
        config
    }

    /// Creates a configuration with every family enabled, including opt-in ones.
    pub fn all_rules() -> Self {
        let mut config = Self::default();
        config.enabled_rules.extend(RuleFamily::all().iter().copied());
        config
    }

    /// Parses a comma-separated list of family names.
    ///
    /// Starts from the defaults. A bare name enables the family, a name
    /// prefixed with `-` disables it; empty entries are ignored.
    ///
    /// ```
    /// use hexray_rewrite::{RuleFamily, SimplifierConfig};
    ///
    /// let config = SimplifierConfig::from_rule_list("negation, -sign").unwrap();
    /// assert!(config.is_rule_enabled(RuleFamily::Negation));
    /// assert!(!config.is_rule_enabled(RuleFamily::Sign));
    /// ```
    pub fn from_rule_list(list: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, disable) = match entry.strip_prefix('-') {
                Some(name) => (name, true),
                None => (entry, false),
            };
            let family = RuleFamily::from_name(name)
                .ok_or_else(|| ConfigError::UnknownRule(name.trim().to_string()))?;
            config = if disable {
                config.disable_rule(family)
            } else {
                config.enable_rule(family)
            };
        }
        Ok(config)
    }

    /// Explicitly enables a family.
    pub fn enable_rule(mut self, family: RuleFamily) -> Self {
        self.enabled_rules.insert(family);
        self.disabled_rules.remove(&family);
        self
    }

    /// Explicitly disables a family.
    pub fn disable_rule(mut self, family: RuleFamily) -> Self {
        self.disabled_rules.insert(family);
        self.enabled_rules.remove(&family);
        self
    }

    /// Caps the number of passes. A statement that needs more is left
    /// partially simplified and reported through
    /// [`RewriteStats::hit_pass_limit`](crate::RewriteStats::hit_pass_limit).
    pub fn with_max_passes(mut self, max_passes: usize) -> Result<Self, ConfigError> {
        if max_passes == 0 {
            return Err(ConfigError::ZeroPassLimit);
        }
        self.max_passes = Some(max_passes);
        Ok(self)
    }

    /// Checks if a family is enabled.
    pub fn is_rule_enabled(&self, family: RuleFamily) -> bool {
        if self.enabled_rules.contains(&family) {
            return true;
        }
        if self.disabled_rules.contains(&family) {
            return false;
        }
        family.enabled_by_default()
    }

    /// Returns the enabled families in the order they are tried.
    pub fn enabled_rules(&self) -> Vec<RuleFamily> {
        RuleFamily::all()
            .iter()
            .copied()
            .filter(|&f| self.is_rule_enabled(f))
            .collect()
    }

    /// Lists all families with their enabled status.
    pub fn list_rules(&self) -> Vec<(RuleFamily, bool, &'static str)> {
        RuleFamily::all()
            .iter()
            .map(|&f| (f, self.is_rule_enabled(f), f.description()))
            .collect()
    }
}
