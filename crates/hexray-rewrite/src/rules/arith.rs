//! Arithmetic identity correction.
//!
//! - `x = x + 1` → `x++`
//! - `x = x - 1` → `x--`
//! - `x + 0`, `x - 0` → `x`

use hexray_ir::{BinaryOp, ExprArena, ExprId, UnaryOp};

use super::{literal, width, Rewrite};

pub fn correct_arith(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let (op, left, right) = expr.as_binary()?;
    match op {
        BinaryOp::Assign => self_step(arena, id, left, right),
        BinaryOp::Add | BinaryOp::Sub => {
            let (value, lit_width) = literal(arena, right)?;
            if value == 0 && lit_width == expr.width && width(arena, left) == expr.width {
                Some(Rewrite::reuse(left))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Matches `lhs = lhs ± 1`.
fn self_step(arena: &ExprArena, id: ExprId, lhs: ExprId, rhs: ExprId) -> Option<Rewrite> {
    let target_width = width(arena, lhs);
    // The rewrite evaluates the target once instead of twice.
    if width(arena, id) != target_width || arena.has_side_effects(lhs) {
        return None;
    }

    let (op, operand, amount) = arena.get(rhs).as_binary()?;
    let step = match op {
        BinaryOp::Add => UnaryOp::Inc,
        BinaryOp::Sub => UnaryOp::Dec,
        _ => return None,
    };

    if width(arena, rhs) != target_width
        || !arena.equals(operand, lhs)
        || !arena.is_val(amount, 1, target_width)
    {
        return None;
    }

    Some(Rewrite::unary(step, Rewrite::reuse(lhs), target_width))
}
