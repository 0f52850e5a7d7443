//! Equality-comparison constant folding.
//!
//! - `(x + c1) == c2` → `x == c2 - c1`
//! - `(x - c1) == c2` → `x == c2 + c1`
//!
//! Both sides wrap at the same width, so moving the offset across the
//! comparison preserves the result for every `x`.

use hexray_ir::{BinaryOp, ExprArena, ExprId};

use super::{binary, literal, width, Rewrite};

pub fn fold_equality(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let (lhs, rhs) = binary(arena, id, BinaryOp::CmpEq)?;
    let (c2, c2_width) = literal(arena, rhs)?;

    let (op, x, offset) = arena.get(lhs).as_binary()?;
    let (c1, c1_width) = literal(arena, offset)?;
    let folded = match op {
        BinaryOp::Add => c2.checked_sub(c1)?,
        BinaryOp::Sub => c2.checked_add(c1)?,
        _ => return None,
    };

    let operand_width = width(arena, lhs);
    if width(arena, x) != operand_width || c1_width != operand_width || c2_width != operand_width
    {
        return None;
    }

    Some(Rewrite::binary(
        BinaryOp::CmpEq,
        Rewrite::reuse(x),
        Rewrite::literal(c2_width.normalize(folded), c2_width),
        expr.width,
    ))
}
