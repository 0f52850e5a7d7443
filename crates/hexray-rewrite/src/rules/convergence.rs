//! Comparison convergence.
//!
//! - `(x > y) || (x == y)` → `x >= y`
//! - `(x < y) || (x == y)` → `x <= y`
//! - `(x < y) || (x > y)` → `x != y`
//!
//! The operand pairs must match in order; `(x > y) || (y == x)` is left alone.

use hexray_ir::{BinaryOp, ExprArena, ExprId};

use super::{binary, width, Rewrite};

pub fn converge_conditions(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let (lhs, rhs) = binary(arena, id, BinaryOp::BoolOr)?;
    let (lop, a, b) = arena.get(lhs).as_binary()?;
    let (rop, c, d) = arena.get(rhs).as_binary()?;

    let merged = match (lop, rop) {
        (BinaryOp::CmpGt, BinaryOp::CmpEq) => BinaryOp::CmpGe,
        (BinaryOp::CmpLt, BinaryOp::CmpEq) => BinaryOp::CmpLe,
        (BinaryOp::CmpLt, BinaryOp::CmpGt) => BinaryOp::CmpNe,
        _ => return None,
    };

    if !arena.equals(a, c) || !arena.equals(b, d) {
        return None;
    }
    // The right-hand comparison is dropped.
    if arena.has_side_effects(c) || arena.has_side_effects(d) {
        return None;
    }
    if width(arena, lhs) != expr.width || width(arena, rhs) != expr.width {
        return None;
    }

    Some(Rewrite::binary(
        merged,
        Rewrite::reuse(a),
        Rewrite::reuse(b),
        expr.width,
    ))
}
