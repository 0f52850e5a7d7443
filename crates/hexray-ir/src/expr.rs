//! Expression nodes.
//!
//! Nodes live in an [`ExprArena`](crate::ExprArena) and refer to their
//! operands by [`ExprId`]. The kind set is closed and every kind has a fixed
//! arity: literals and variables have none, [`UnaryOp`] forms have one and
//! [`BinaryOp`] forms have two.

use std::fmt;

use crate::Width;

/// Index of an expression inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub(crate) u32);

impl ExprId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Unary operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Inc,       // x++
    Dec,       // x--
    AddressOf, // &x
    Deref,     // *x
    BoolNot,   // !x
}

impl UnaryOp {
    /// Returns true for operators that write to their operand.
    pub fn has_side_effects(&self) -> bool {
        matches!(self, Self::Inc | Self::Dec)
    }
}

/// Binary operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Assign,

    // Arithmetic
    Add,
    Sub,

    // Bitwise
    Xor,
    And,
    Shl,
    Shr,

    // Comparison
    CmpEq,
    CmpNe,
    CmpGt,
    CmpGe,
    CmpLt,
    CmpLe,

    // Logical
    BoolOr,
}

impl BinaryOp {
    /// Returns the operator string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Xor => "^",
            Self::And => "&",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::CmpEq => "==",
            Self::CmpNe => "!=",
            Self::CmpGt => ">",
            Self::CmpGe => ">=",
            Self::CmpLt => "<",
            Self::CmpLe => "<=",
            Self::BoolOr => "||",
        }
    }

    /// Returns precedence (higher = binds tighter).
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Assign => 0,
            Self::BoolOr => 1,
            Self::Xor => 4,
            Self::And => 5,
            Self::CmpEq | Self::CmpNe => 6,
            Self::CmpGt | Self::CmpGe | Self::CmpLt | Self::CmpLe => 7,
            Self::Shl | Self::Shr => 8,
            Self::Add | Self::Sub => 9,
        }
    }

    /// Returns true for the six comparison operators.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::CmpEq | Self::CmpNe | Self::CmpGt | Self::CmpGe | Self::CmpLt | Self::CmpLe
        )
    }

    /// Returns the logical complement of a comparison operator.
    pub fn negate(&self) -> Option<Self> {
        match self {
            Self::CmpEq => Some(Self::CmpNe),
            Self::CmpNe => Some(Self::CmpEq),
            Self::CmpGt => Some(Self::CmpLe),
            Self::CmpGe => Some(Self::CmpLt),
            Self::CmpLt => Some(Self::CmpGe),
            Self::CmpLe => Some(Self::CmpGt),
            _ => None,
        }
    }

    /// Returns true for operators that write to their left operand.
    pub fn has_side_effects(&self) -> bool {
        matches!(self, Self::Assign)
    }
}

/// The kind of an expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// An integer literal, as written by the IR builder (may be negative).
    Val(i128),

    /// A variable or register reference.
    Var(String),

    /// Unary operation: op operand.
    Unary { op: UnaryOp, operand: ExprId },

    /// Binary operation: left op right.
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
}

/// One expression node: a kind and the width of the value it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub width: Width,
}

impl Expr {
    pub fn new(kind: ExprKind, width: Width) -> Self {
        Self { kind, width }
    }

    /// Returns the literal value if this is a `val` node.
    pub fn as_val(&self) -> Option<i128> {
        match self.kind {
            ExprKind::Val(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the operator and operand of a unary node.
    pub fn as_unary(&self) -> Option<(UnaryOp, ExprId)> {
        match self.kind {
            ExprKind::Unary { op, operand } => Some((op, operand)),
            _ => None,
        }
    }

    /// Returns the operator and operands of a binary node.
    pub fn as_binary(&self) -> Option<(BinaryOp, ExprId, ExprId)> {
        match self.kind {
            ExprKind::Binary { op, left, right } => Some((op, left, right)),
            _ => None,
        }
    }

    /// Returns the operands of a binary node with the given operator.
    pub fn binary_of(&self, wanted: BinaryOp) -> Option<(ExprId, ExprId)> {
        match self.as_binary() {
            Some((op, left, right)) if op == wanted => Some((left, right)),
            _ => None,
        }
    }

    /// Returns the operand of a unary node with the given operator.
    pub fn unary_of(&self, wanted: UnaryOp) -> Option<ExprId> {
        match self.as_unary() {
            Some((op, operand)) if op == wanted => Some(operand),
            _ => None,
        }
    }

    /// Iterates over the operands in order.
    pub fn operands(&self) -> impl DoubleEndedIterator<Item = ExprId> {
        let (first, second) = match self.kind {
            ExprKind::Val(_) | ExprKind::Var(_) => (None, None),
            ExprKind::Unary { operand, .. } => (Some(operand), None),
            ExprKind::Binary { left, right, .. } => (Some(left), Some(right)),
        };
        first.into_iter().chain(second)
    }

    /// Number of operands (0, 1 or 2).
    pub fn arity(&self) -> usize {
        match self.kind {
            ExprKind::Val(_) | ExprKind::Var(_) => 0,
            ExprKind::Unary { .. } => 1,
            ExprKind::Binary { .. } => 2,
        }
    }
}
