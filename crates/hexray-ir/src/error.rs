//! Error types for hexray-ir.

use thiserror::Error;

use crate::ExprId;

/// IR construction and evaluation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// A statement must contain at least one top-level expression.
    #[error("statement has no expressions")]
    EmptyStatement,

    /// An expression id that does not belong to the arena.
    #[error("invalid expression id: {0}")]
    InvalidExprId(ExprId),

    /// Widths are limited to 1..=64 bits.
    #[error("unsupported width: {0} bits")]
    UnsupportedWidth(u32),

    /// The expression cannot be assigned to or have its address taken.
    #[error("expression {0} is not an lvalue")]
    NotAnLvalue(ExprId),

    /// A variable was read before being bound in the machine.
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
}

/// Result alias for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;
