//! Arena storage for expression trees.
//!
//! Parents hold child [`ExprId`]s rather than references, so replacing a
//! subtree is a single slot overwrite that every holder of the id observes.

use std::collections::HashSet;

use crate::display::ExprDisplay;
use crate::error::{IrError, Result};
use crate::expr::{BinaryOp, Expr, ExprId, ExprKind, UnaryOp};
use crate::Width;

/// Owns the nodes of one statement's expression trees.
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots, including orphaned ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` names a slot of this arena.
    pub fn contains(&self, id: ExprId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Appends a node and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX + 1` nodes.
    pub fn push(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(next_id(self.nodes.len()));
        self.nodes.push(expr);
        id
    }

    /// Returns the node at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this arena.
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }

    /// Returns the node at `id`, or an error for a foreign id.
    pub fn try_get(&self, id: ExprId) -> Result<&Expr> {
        self.nodes.get(id.index()).ok_or(IrError::InvalidExprId(id))
    }

    /// Overwrites the slot at `id`, returning the previous content.
    pub fn replace(&mut self, id: ExprId, expr: Expr) -> Expr {
        std::mem::replace(&mut self.nodes[id.index()], expr)
    }

    // ==================== Constructors ====================

    /// Creates an integer literal.
    pub fn val(&mut self, value: i128, width: Width) -> ExprId {
        self.push(Expr::new(ExprKind::Val(value), width))
    }

    /// Creates a variable reference.
    pub fn var(&mut self, name: impl Into<String>, width: Width) -> ExprId {
        self.push(Expr::new(ExprKind::Var(name.into()), width))
    }

    /// Creates a unary node with an explicit width.
    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, width: Width) -> ExprId {
        self.push(Expr::new(ExprKind::Unary { op, operand }, width))
    }

    /// Creates a binary node with an explicit width.
    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, width: Width) -> ExprId {
        self.push(Expr::new(ExprKind::Binary { op, left, right }, width))
    }

    /// Creates an assignment; it takes the width of its target.
    pub fn assign(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        let width = self.get(lhs).width;
        self.binary(BinaryOp::Assign, lhs, rhs, width)
    }

    /// Creates an arithmetic or bitwise node sized after its left operand.
    fn arith(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let width = self.get(left).width;
        self.binary(op, left, right, width)
    }

    pub fn add(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.arith(BinaryOp::Add, left, right)
    }

    pub fn sub(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.arith(BinaryOp::Sub, left, right)
    }

    pub fn xor(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.arith(BinaryOp::Xor, left, right)
    }

    pub fn and(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.arith(BinaryOp::And, left, right)
    }

    pub fn shl(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.arith(BinaryOp::Shl, left, right)
    }

    pub fn shr(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.arith(BinaryOp::Shr, left, right)
    }

    /// Creates `target++`.
    pub fn inc(&mut self, target: ExprId) -> ExprId {
        let width = self.get(target).width;
        self.unary(UnaryOp::Inc, target, width)
    }

    /// Creates `target--`.
    pub fn dec(&mut self, target: ExprId) -> ExprId {
        let width = self.get(target).width;
        self.unary(UnaryOp::Dec, target, width)
    }

    /// Creates `&operand` producing a pointer of `pointer_width`.
    pub fn address_of(&mut self, operand: ExprId, pointer_width: Width) -> ExprId {
        self.unary(UnaryOp::AddressOf, operand, pointer_width)
    }

    /// Creates `*addr` loading `width` bits.
    pub fn deref(&mut self, addr: ExprId, width: Width) -> ExprId {
        self.unary(UnaryOp::Deref, addr, width)
    }

    /// Creates a comparison. Panics in debug builds for non-comparison operators.
    pub fn cmp(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        debug_assert!(op.is_comparison(), "{:?} is not a comparison", op);
        self.binary(op, left, right, Width::BOOL)
    }

    pub fn bool_or(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary(BinaryOp::BoolOr, left, right, Width::BOOL)
    }

    pub fn bool_not(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::BoolNot, operand, Width::BOOL)
    }

    // ==================== Queries ====================

    /// Structural equality of two subtrees of this arena.
    pub fn equals(&self, a: ExprId, b: ExprId) -> bool {
        structurally_equal(self, a, self, b)
    }

    /// Returns true if `id` is a literal with the given value and width.
    pub fn is_val(&self, id: ExprId, value: i128, width: Width) -> bool {
        let expr = self.get(id);
        expr.width == width && expr.as_val() == Some(value)
    }

    /// Returns true if evaluating the subtree can write to a variable or memory.
    pub fn has_side_effects(&self, id: ExprId) -> bool {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let expr = self.get(id);
            let writes = match expr.kind {
                ExprKind::Unary { op, .. } => op.has_side_effects(),
                ExprKind::Binary { op, .. } => op.has_side_effects(),
                ExprKind::Val(_) | ExprKind::Var(_) => false,
            };
            if writes {
                return true;
            }
            stack.extend(expr.operands());
        }
        false
    }

    /// Counts the distinct nodes reachable from `roots`.
    pub fn reachable_count(&self, roots: &[ExprId]) -> usize {
        let mut seen = HashSet::new();
        let mut stack: Vec<ExprId> = roots.to_vec();
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                stack.extend(self.get(id).operands());
            }
        }
        seen.len()
    }

    /// Returns a value that renders the subtree as pseudo-code.
    pub fn display(&self, id: ExprId) -> ExprDisplay<'_> {
        ExprDisplay::new(self, id)
    }
}

/// Id for the node stored at `index`.
fn next_id(index: usize) -> u32 {
    u32::try_from(index).expect("expression arena exceeds u32::MAX nodes")
}

/// Checks if two subtrees, possibly from different arenas, are structurally
/// equal: same kind, same width, same leaf payload and pairwise-equal
/// operands in the same order.
pub fn structurally_equal(
    left_arena: &ExprArena,
    left: ExprId,
    right_arena: &ExprArena,
    right: ExprId,
) -> bool {
    let mut stack = vec![(left, right)];
    while let Some((l, r)) = stack.pop() {
        let (le, re) = (left_arena.get(l), right_arena.get(r));
        if le.width != re.width {
            return false;
        }
        match (&le.kind, &re.kind) {
            (ExprKind::Val(a), ExprKind::Val(b)) => {
                if a != b {
                    return false;
                }
            }
            (ExprKind::Var(a), ExprKind::Var(b)) => {
                if a != b {
                    return false;
                }
            }
            (
                ExprKind::Unary { op: op1, operand: o1 },
                ExprKind::Unary { op: op2, operand: o2 },
            ) => {
                if op1 != op2 {
                    return false;
                }
                stack.push((*o1, *o2));
            }
            (
                ExprKind::Binary { op: op1, left: l1, right: r1 },
                ExprKind::Binary { op: op2, left: l2, right: r2 },
            ) => {
                if op1 != op2 {
                    return false;
                }
                stack.push((*l1, *l2));
                stack.push((*r1, *r2));
            }
            _ => return false,
        }
    }
    true
}
