//! Reference/dereference cancellation: `&*x` → `x`, `*&x` → `x`.

use hexray_ir::{ExprArena, ExprId, UnaryOp};

use super::{unary, width, Rewrite};

pub fn correct_ref(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let (op, operand) = expr.as_unary()?;
    let inner = match op {
        UnaryOp::AddressOf => unary(arena, operand, UnaryOp::Deref)?,
        UnaryOp::Deref => unary(arena, operand, UnaryOp::AddressOf)?,
        _ => return None,
    };

    if width(arena, inner) != expr.width {
        return None;
    }
    // *&*p is only p's load if & did not narrow the pointer.
    if op == UnaryOp::Deref {
        if let Some(pointer) = unary(arena, inner, UnaryOp::Deref) {
            if width(arena, pointer) != width(arena, operand) {
                return None;
            }
        }
    }
    Some(Rewrite::reuse(inner))
}
