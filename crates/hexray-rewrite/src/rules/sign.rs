//! Sign correction: `x + -c` → `x - c`, `x - -c` → `x + c`.

use hexray_ir::{BinaryOp, ExprArena, ExprId};

use super::{literal, Rewrite};

pub fn correct_sign(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let (op, left, right) = expr.as_binary()?;
    let flipped = match op {
        BinaryOp::Add => BinaryOp::Sub,
        BinaryOp::Sub => BinaryOp::Add,
        _ => return None,
    };

    let (value, lit_width) = literal(arena, right)?;
    if value >= 0 || lit_width != expr.width {
        return None;
    }
    let magnitude = value.checked_neg()?;

    Some(Rewrite::binary(
        flipped,
        Rewrite::reuse(left),
        Rewrite::literal(magnitude, lit_width),
        expr.width,
    ))
}
