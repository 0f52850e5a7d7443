//! Comparison negation: `!(x op y)` → `x op' y` where `op'` is the logical
//! complement of `op`.
//!
//! Not in the default catalog; enable [`RuleFamily::Negation`] to use it.
//!
//! [`RuleFamily::Negation`]: super::RuleFamily::Negation

use hexray_ir::{ExprArena, ExprId, UnaryOp};

use super::{unary, width, Rewrite};

pub fn negate_comparison(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let operand = unary(arena, id, UnaryOp::BoolNot)?;
    let (op, left, right) = arena.get(operand).as_binary()?;
    let negated = op.negate()?;
    if width(arena, operand) != expr.width {
        return None;
    }

    Some(Rewrite::binary(
        negated,
        Rewrite::reuse(left),
        Rewrite::reuse(right),
        expr.width,
    ))
}
