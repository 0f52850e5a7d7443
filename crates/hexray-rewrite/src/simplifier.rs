//! Fixed-point rewrite driver.
//!
//! [`Simplifier::run`] makes repeated passes over a statement until a pass
//! applies no rewrite. One pass walks every root pre-order; at each node the
//! enabled families are tried in catalog order and the first match replaces
//! the node in place, after which the walk continues into the node's new
//! children. A node is visited at most once per pass, and nodes orphaned by
//! a rewrite are never visited again.
//!
//! Every rule either removes reachable nodes or, for sign correction, keeps
//! the node count and removes a negative literal. Only node-removing rewrites
//! can introduce a negative literal, so a statement of `n` reachable nodes
//! admits fewer than `3n` rewrites and reaches its fixed point within `3n`
//! passes. That is the default pass limit. An explicit
//! [`SimplifierConfig::max_passes`] replaces it; reaching either limit is
//! logged and the statement is left in its current (still equivalent) state.

use std::collections::HashSet;

use hexray_ir::{ExprArena, ExprId, Statement};
use tracing::{debug, trace, warn, Level};

use crate::config::SimplifierConfig;
use crate::rules::{Rewrite, Rule, RuleFamily};
use crate::stats::RewriteStats;

/// Applies the enabled rule families to statements until nothing changes.
#[derive(Debug, Clone)]
pub struct Simplifier {
    config: SimplifierConfig,
    rules: Vec<(RuleFamily, Rule)>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new(SimplifierConfig::default())
    }
}

impl Simplifier {
    /// Creates a simplifier running the families enabled in `config`.
    pub fn new(config: SimplifierConfig) -> Self {
        let rules = config
            .enabled_rules()
            .into_iter()
            .map(|family| (family, family.rule()))
            .collect();
        Self { config, rules }
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Families this simplifier tries, in order.
    pub fn families(&self) -> impl Iterator<Item = RuleFamily> + '_ {
        self.rules.iter().map(|(family, _)| *family)
    }

    /// Rewrites `statement` to a fixed point.
    pub fn run(&self, statement: &mut Statement) {
        self.run_with_stats(statement);
    }

    /// Rewrites `statement` to a fixed point and reports what was done.
    pub fn run_with_stats(&self, statement: &mut Statement) -> RewriteStats {
        let mut stats = RewriteStats {
            statements: 1,
            ..RewriteStats::default()
        };
        let max_passes = self.pass_limit(statement);
        let (arena, roots) = statement.parts_mut();

        loop {
            if stats.passes >= max_passes {
                warn!(
                    max_passes,
                    rewrites = stats.rewrites,
                    "simplification stopped at the pass limit"
                );
                stats.hit_pass_limit = true;
                break;
            }
            stats.passes += 1;
            let rewrites = self.pass(arena, roots, &mut stats);
            trace!(pass = stats.passes, rewrites, "simplification pass");
            if rewrites == 0 {
                break;
            }
        }

        stats
    }

    /// Simplifies each statement in order.
    pub fn run_all(&self, statements: &mut [Statement]) -> RewriteStats {
        let mut total = RewriteStats::default();
        for statement in statements.iter_mut() {
            total.merge(&self.run_with_stats(statement));
        }
        total
    }

    /// Passes allowed for `statement`: the configured cap, or the rewrite
    /// bound for its size.
    fn pass_limit(&self, statement: &Statement) -> usize {
        self.config
            .max_passes
            .unwrap_or_else(|| 3 * statement.node_count().max(1))
    }

    /// One pre-order pass over all roots. Returns the number of rewrites.
    fn pass(&self, arena: &mut ExprArena, roots: &[ExprId], stats: &mut RewriteStats) -> usize {
        let mut rewrites = 0;
        let mut visited = HashSet::new();
        let mut stack: Vec<ExprId> = roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }

            if let Some((family, rewrite)) = self.first_match(arena, id) {
                debug_assert_eq!(
                    rewrite.width(arena),
                    arena.get(id).width,
                    "{} rewrite changed the width of {}",
                    family.name(),
                    arena.display(id)
                );
                let before = tracing::enabled!(Level::DEBUG).then(|| arena.display(id).to_string());
                rewrite.install(arena, id);
                stats.record(family);
                rewrites += 1;
                if let Some(before) = before {
                    debug!(
                        rule = family.name(),
                        before = %before,
                        after = %arena.display(id),
                        "applied rewrite"
                    );
                }
            }

            // Children are pushed in reverse so the left operand is visited first.
            stack.extend(arena.get(id).operands().rev());
        }

        rewrites
    }

    fn first_match(&self, arena: &ExprArena, id: ExprId) -> Option<(RuleFamily, Rewrite)> {
        self.rules
            .iter()
            .find_map(|(family, rule)| rule(arena, id).map(|rewrite| (*family, rewrite)))
    }
}

/// Simplifies a statement with the default configuration.
pub fn simplify(statement: &mut Statement) {
    Simplifier::default().run(statement);
}
