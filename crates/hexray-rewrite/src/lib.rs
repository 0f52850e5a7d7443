//! # hexray-rewrite
//!
//! Algebraic simplification of decompiled expressions.
//!
//! This crate provides:
//! - A catalog of conservative, width-preserving rewrite rules
//! - A fixed-point driver that applies them to [`Statement`]s in place
//! - Configuration of the enabled rule families
//! - Parallel simplification of independent statements
//!
//! # Example
//!
//! ```
//! use hexray_ir::{ExprArena, Statement, Width};
//! use hexray_rewrite::simplify;
//!
//! let mut arena = ExprArena::new();
//! let x = arena.var("x", Width::W32);
//! let one = arena.val(1, Width::W32);
//! let sum = arena.add(x, one);
//! let root = arena.assign(x, sum);
//! let mut statement = Statement::single(arena, root).unwrap();
//!
//! simplify(&mut statement);
//! assert_eq!(statement.to_string(), "x++");
//! ```

pub mod config;
pub mod error;
pub mod parallel;
pub mod rules;
pub mod simplifier;
pub mod stats;

pub use config::SimplifierConfig;
pub use error::ConfigError;
pub use parallel::simplify_statements_parallel;
pub use rules::{Rewrite, Rule, RuleFamily};
pub use simplifier::{simplify, Simplifier};
pub use stats::RewriteStats;

pub use hexray_ir::Statement;
