//! Pseudo-code rendering of expression trees.

use std::fmt;

use crate::expr::{BinaryOp, ExprId, ExprKind, UnaryOp};
use crate::ExprArena;

/// Renders the subtree rooted at an id. Created by [`ExprArena::display`].
///
/// Rendering uses an explicit work stack, so arbitrarily deep trees print
/// without growing the call stack.
#[derive(Clone, Copy)]
pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    id: ExprId,
}

impl<'a> ExprDisplay<'a> {
    pub(crate) fn new(arena: &'a ExprArena, id: ExprId) -> Self {
        Self { arena, id }
    }

    /// Queues an operand, parenthesized if it binds looser than `parent`.
    fn push_operand(&self, work: &mut Vec<Piece>, id: ExprId, parent: BinaryOp, right_side: bool) {
        let needs_parens = match self.arena.get(id).kind {
            ExprKind::Binary { op, .. } => {
                op.precedence() < parent.precedence()
                    || (right_side && op.precedence() == parent.precedence())
            }
            _ => false,
        };
        if needs_parens {
            work.extend([Piece::Text(")"), Piece::Node(id), Piece::Text("(")]);
        } else {
            work.push(Piece::Node(id));
        }
    }
}

/// Pending output, popped last-in first-out.
enum Piece {
    Node(ExprId),
    Text(&'static str),
    Operator(BinaryOp),
}

fn pointer_prefix(bits: u32) -> &'static str {
    match bits {
        8 => "*(uint8_t*)",
        16 => "*(uint16_t*)",
        32 => "*(uint32_t*)",
        64 => "*(uint64_t*)",
        _ => "*",
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut work = vec![Piece::Node(self.id)];
        while let Some(piece) = work.pop() {
            let id = match piece {
                Piece::Node(id) => id,
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Operator(op) => {
                    write!(f, " {} ", op.as_str())?;
                    continue;
                }
            };

            let expr = self.arena.get(id);
            match &expr.kind {
                ExprKind::Val(n) => {
                    if *n >= 0 && *n < 10 {
                        write!(f, "{}", n)?;
                    } else if *n < 0 {
                        write!(f, "-{:#x}", n.unsigned_abs())?;
                    } else {
                        write!(f, "{:#x}", n)?;
                    }
                }
                ExprKind::Var(name) => f.write_str(name)?,
                ExprKind::Unary { op, operand } => {
                    let compound = self.arena.get(*operand).arity() > 0;
                    let (prefix, suffix) = match op {
                        UnaryOp::Inc => ("", "++"),
                        UnaryOp::Dec => ("", "--"),
                        UnaryOp::Deref => {
                            f.write_str(pointer_prefix(expr.width.bits()))?;
                            ("(", ")")
                        }
                        UnaryOp::AddressOf if compound => ("&(", ")"),
                        UnaryOp::AddressOf => ("&", ""),
                        UnaryOp::BoolNot if compound => ("!(", ")"),
                        UnaryOp::BoolNot => ("!", ""),
                    };
                    f.write_str(prefix)?;
                    work.extend([Piece::Text(suffix), Piece::Node(*operand)]);
                }
                ExprKind::Binary { op, left, right } => {
                    self.push_operand(&mut work, *right, *op, true);
                    work.push(Piece::Operator(*op));
                    self.push_operand(&mut work, *left, *op, false);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
