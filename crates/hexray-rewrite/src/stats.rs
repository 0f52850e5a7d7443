//! Statistics collected while simplifying.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::RuleFamily;

/// Counters reported by [`Simplifier::run_with_stats`](crate::Simplifier::run_with_stats).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStats {
    /// Number of statements processed.
    pub statements: usize,
    /// Number of passes made, including the final pass that changed nothing.
    pub passes: usize,
    /// Total number of rewrites applied.
    pub rewrites: usize,
    /// Rewrites per rule family.
    pub by_rule: BTreeMap<RuleFamily, usize>,
    /// Whether any statement stopped at the pass limit.
    pub hit_pass_limit: bool,
}

impl RewriteStats {
    /// Records one applied rewrite.
    pub fn record(&mut self, family: RuleFamily) {
        self.rewrites += 1;
        *self.by_rule.entry(family).or_insert(0) += 1;
    }

    /// Rewrites applied by one family.
    pub fn count(&self, family: RuleFamily) -> usize {
        self.by_rule.get(&family).copied().unwrap_or(0)
    }

    /// Adds the counters of `other` to these.
    pub fn merge(&mut self, other: &RewriteStats) {
        self.statements += other.statements;
        self.passes += other.passes;
        self.rewrites += other.rewrites;
        for (&family, &count) in &other.by_rule {
            *self.by_rule.entry(family).or_insert(0) += count;
        }
        self.hit_pass_limit |= other.hit_pass_limit;
    }

    /// True if no rewrite was applied.
    pub fn is_unchanged(&self) -> bool {
        self.rewrites == 0
    }
}
