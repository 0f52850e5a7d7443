//! # hexray-ir
//!
//! Expression IR consumed by the hexray rewrite passes.
//!
//! This crate provides:
//! - Arena-backed expression trees with fixed-arity node kinds
//! - Fixed bit widths with two's-complement helpers
//! - Structural equality and side-effect queries
//! - Statements (ordered groups of top-level expressions)
//! - Pseudo-code rendering
//! - A concrete evaluator giving every node kind fixed-width semantics

pub mod arena;
mod display;
pub mod error;
pub mod eval;
pub mod expr;
pub mod statement;
pub mod width;

pub use arena::{structurally_equal, ExprArena};
pub use display::ExprDisplay;
pub use error::{IrError, Result};
pub use eval::Machine;
pub use expr::{BinaryOp, Expr, ExprId, ExprKind, UnaryOp};
pub use statement::Statement;
pub use width::Width;
