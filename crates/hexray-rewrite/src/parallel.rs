//! Parallel simplification of independent statements.
//!
//! Every statement owns its arena, so statements can be rewritten on the
//! rayon pool without any synchronization beyond sharing the simplifier.

use rayon::prelude::*;

use hexray_ir::Statement;

use crate::config::SimplifierConfig;
use crate::simplifier::Simplifier;
use crate::stats::RewriteStats;

/// Simplifies statements in parallel and returns the merged statistics.
///
/// The result is the same as running [`Simplifier::run_all`] sequentially.
pub fn simplify_statements_parallel(
    statements: &mut [Statement],
    config: &SimplifierConfig,
) -> RewriteStats {
    let simplifier = Simplifier::new(config.clone());
    statements
        .par_iter_mut()
        .map(|statement| simplifier.run_with_stats(statement))
        .reduce(RewriteStats::default, |mut acc, stats| {
            acc.merge(&stats);
            acc
        })
}
