//! The rewrite rule catalog.
//!
//! Every rule is a pure function from a node to an optional [`Rewrite`]. Rules
//! only inspect the arena; the driver installs the rewrite in place. A rule
//! declines with `None` whenever the node does not have exactly the shape it
//! expects, including when widths disagree.
//!
//! Families are tried in [`RuleFamily::all`] order and the first match wins.

mod arith;
mod bitwise;
mod convergence;
mod equality;
mod negation;
mod reference;
mod sign;

use hexray_ir::{BinaryOp, Expr, ExprArena, ExprId, ExprKind, UnaryOp, Width};
use serde::{Deserialize, Serialize};

pub use arith::correct_arith;
pub use bitwise::correct_bitwise;
pub use convergence::converge_conditions;
pub use equality::fold_equality;
pub use negation::negate_comparison;
pub use reference::correct_ref;
pub use sign::correct_sign;

/// A rule: inspects the node at an id and proposes a replacement.
pub type Rule = fn(&ExprArena, ExprId) -> Option<Rewrite>;

/// Replacement subtree proposed by a rule.
///
/// `Reuse` refers to an existing subtree of the node being replaced; every
/// other variant describes a node to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// An existing subtree, kept as is.
    Reuse(ExprId),
    /// A new integer literal.
    Literal { value: i128, width: Width },
    /// A new unary node.
    Unary {
        op: UnaryOp,
        operand: Box<Rewrite>,
        width: Width,
    },
    /// A new binary node.
    Binary {
        op: BinaryOp,
        left: Box<Rewrite>,
        right: Box<Rewrite>,
        width: Width,
    },
}

impl Rewrite {
    pub fn reuse(id: ExprId) -> Self {
        Self::Reuse(id)
    }

    pub fn literal(value: i128, width: Width) -> Self {
        Self::Literal { value, width }
    }

    pub fn unary(op: UnaryOp, operand: Rewrite, width: Width) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
            width,
        }
    }

    pub fn binary(op: BinaryOp, left: Rewrite, right: Rewrite, width: Width) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width,
        }
    }

    /// Width of the value the rewrite produces.
    pub fn width(&self, arena: &ExprArena) -> Width {
        match self {
            Self::Reuse(id) => arena.get(*id).width,
            Self::Literal { width, .. } | Self::Unary { width, .. } | Self::Binary { width, .. } => {
                *width
            }
        }
    }

    /// Makes the rewrite the content of `target`.
    ///
    /// New nodes are appended to the arena. Reused subtrees keep their ids, so
    /// they move under the new parent instead of being copied; the slots of
    /// discarded nodes become unreachable.
    pub fn install(self, arena: &mut ExprArena, target: ExprId) {
        let content = self.into_expr(arena);
        arena.replace(target, content);
    }

    fn into_expr(self, arena: &mut ExprArena) -> Expr {
        match self {
            Self::Reuse(id) => arena.get(id).clone(),
            Self::Literal { value, width } => Expr::new(ExprKind::Val(value), width),
            Self::Unary { op, operand, width } => {
                let operand = operand.build(arena);
                Expr::new(ExprKind::Unary { op, operand }, width)
            }
            Self::Binary {
                op,
                left,
                right,
                width,
            } => {
                let left = left.build(arena);
                let right = right.build(arena);
                Expr::new(ExprKind::Binary { op, left, right }, width)
            }
        }
    }

    fn build(self, arena: &mut ExprArena) -> ExprId {
        match self {
            Self::Reuse(id) => id,
            other => {
                let expr = other.into_expr(arena);
                arena.push(expr)
            }
        }
    }
}

/// Rule families, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFamily {
    /// `x = x + 1` → `x++`, `x = x - 1` → `x--`, `x ± 0` → `x`.
    Arith,
    /// `x + -c` → `x - c`, `x - -c` → `x + c`.
    Sign,
    /// `&*x` → `x`, `*&x` → `x`.
    Reference,
    /// `x ^ 0`, `x ^ x`, `x & 0`, `x & x`, `(x >> c) << c`.
    Bitwise,
    /// `x + c1 == c2` → `x == c2 - c1`, and the `-` counterpart.
    Equality,
    /// `x > y || x == y` → `x >= y` and friends.
    Convergence,
    /// `!(x op y)` → `x op' y`. Not part of the default catalog.
    Negation,
}

impl RuleFamily {
    /// Returns all families in catalog order.
    pub fn all() -> &'static [RuleFamily] {
        use RuleFamily::*;
        &[
            Arith,
            Sign,
            Reference,
            Bitwise,
            Equality,
            Convergence,
            Negation,
        ]
    }

    /// Returns the name of the family.
    pub fn name(&self) -> &'static str {
        use RuleFamily::*;
        match self {
            Arith => "arith",
            Sign => "sign",
            Reference => "reference",
            Bitwise => "bitwise",
            Equality => "equality",
            Convergence => "convergence",
            Negation => "negation",
        }
    }

    /// Returns a description of the family.
    pub fn description(&self) -> &'static str {
        use RuleFamily::*;
        match self {
            Arith => "Turn self increments into ++/-- and drop additions of zero",
            Sign => "Fold negative literal operands into the opposite operator",
            Reference => "Cancel address-of/dereference pairs",
            Bitwise => "Simplify xor/and identities and low-bit clearing shifts",
            Equality => "Move constant offsets across equality comparisons",
            Convergence => "Merge or-ed comparisons over the same operands",
            Negation => "Replace negated comparisons by their complement",
        }
    }

    /// Parses a family name.
    pub fn from_name(name: &str) -> Option<Self> {
        use RuleFamily::*;
        match name.trim().to_lowercase().as_str() {
            "arith" | "arithmetic" => Some(Arith),
            "sign" => Some(Sign),
            "reference" | "ref" => Some(Reference),
            "bitwise" => Some(Bitwise),
            "equality" => Some(Equality),
            "convergence" | "converged-cond" => Some(Convergence),
            "negation" => Some(Negation),
            _ => None,
        }
    }

    /// Returns true if the family runs without being explicitly enabled.
    pub fn enabled_by_default(&self) -> bool {
        !matches!(self, RuleFamily::Negation)
    }

    /// Returns the rule function implementing the family.
    pub fn rule(&self) -> Rule {
        use RuleFamily::*;
        match self {
            Arith => correct_arith,
            Sign => correct_sign,
            Reference => correct_ref,
            Bitwise => correct_bitwise,
            Equality => fold_equality,
            Convergence => converge_conditions,
            Negation => negate_comparison,
        }
    }

    /// Applies the family's rule to a node.
    pub fn apply(&self, arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
        (self.rule())(arena, id)
    }
}

/// Returns the value of a literal node.
pub(crate) fn literal(arena: &ExprArena, id: ExprId) -> Option<(i128, Width)> {
    let expr = arena.get(id);
    expr.as_val().map(|v| (v, expr.width))
}

/// Returns the operands of the binary node at `id` if it has operator `op`.
pub(crate) fn binary(arena: &ExprArena, id: ExprId, op: BinaryOp) -> Option<(ExprId, ExprId)> {
    arena.get(id).binary_of(op)
}

/// Returns the operand of the unary node at `id` if it has operator `op`.
pub(crate) fn unary(arena: &ExprArena, id: ExprId, op: UnaryOp) -> Option<ExprId> {
    arena.get(id).unary_of(op)
}

/// Width of the node at `id`.
pub(crate) fn width(arena: &ExprArena, id: ExprId) -> Width {
    arena.get(id).width
}

/// Applies `rule` at `id`, installs the result and renders the new subtree.
#[cfg(test)]
pub(crate) fn apply_and_render(arena: &mut ExprArena, id: ExprId, rule: Rule) -> Option<String> {
    let rewrite = rule(arena, id)?;
    assert_eq!(
        rewrite.width(arena),
        arena.get(id).width,
        "rewrite must keep the node width"
    );
    rewrite.install(arena, id);
    Some(arena.display(id).to_string())
}
