//! Error types for the rewrite engine.

use thiserror::Error;

/// Errors raised while building a simplifier configuration.
///
/// Running the simplifier itself never fails; a rule that does not apply
/// simply declines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown rule family: {0}")]
    UnknownRule(String),

    #[error("pass limit must be at least 1")]
    ZeroPassLimit,
}
