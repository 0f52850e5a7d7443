//! Bitwise identities.
//!
//! - `x ^ 0` → `x`, `x ^ x` → `0`
//! - `x & 0` → `0`, `x & x` → `x`
//! - `(x >> c) << c` → `x & ~((1 << c) - 1)`, i.e. clear the low `c` bits

use hexray_ir::{BinaryOp, ExprArena, ExprId, Width};

use super::{binary, literal, width, Rewrite};

pub fn correct_bitwise(arena: &ExprArena, id: ExprId) -> Option<Rewrite> {
    let expr = arena.get(id);
    let (op, left, right) = expr.as_binary()?;
    let lhs_width = width(arena, left);
    if lhs_width != expr.width {
        return None;
    }

    match op {
        BinaryOp::Xor => {
            // x ^ 0
            if arena.is_val(right, 0, lhs_width) {
                return Some(Rewrite::reuse(left));
            }
            // x ^ x
            if arena.equals(right, left) && !arena.has_side_effects(left) {
                return Some(Rewrite::literal(0, lhs_width));
            }
            None
        }
        BinaryOp::And => {
            // x & 0
            if arena.is_val(right, 0, lhs_width) && !arena.has_side_effects(left) {
                return Some(Rewrite::literal(0, lhs_width));
            }
            // x & x
            if arena.equals(right, left) && !arena.has_side_effects(right) {
                return Some(Rewrite::reuse(left));
            }
            None
        }
        BinaryOp::Shl => clear_low_bits(arena, expr.width, left, right),
        _ => None,
    }
}

/// Matches `(x >> c) << c` with the same literal `c` on both shifts.
fn clear_low_bits(
    arena: &ExprArena,
    node_width: Width,
    shifted: ExprId,
    amount: ExprId,
) -> Option<Rewrite> {
    let (x, inner_amount) = binary(arena, shifted, BinaryOp::Shr)?;
    let (shift, shift_width) = literal(arena, amount)?;
    if !arena.equals(inner_amount, amount) {
        return None;
    }
    if width(arena, x) != node_width || shift_width != node_width {
        return None;
    }
    if !(0..node_width.bits() as i128).contains(&shift) {
        return None;
    }

    let mask = !((1u64 << shift) - 1) & shift_width.mask();
    Some(Rewrite::binary(
        BinaryOp::And,
        Rewrite::reuse(x),
        Rewrite::literal(mask as i128, shift_width),
        node_width,
    ))
}
