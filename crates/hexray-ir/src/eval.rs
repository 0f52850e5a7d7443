//! Concrete evaluation of expression trees.
//!
//! The machine gives every kind a fixed-width meaning:
//! - values are zero-extended into a `u64` and every node's result is
//!   truncated to its width, so arithmetic wraps modulo 2^width
//! - shifts are logical; shifting by the width or more yields 0
//! - comparisons are unsigned and yield 0 or 1; `||` short-circuits
//! - `=`, `++` and `--` store into their target and yield the stored value
//! - variables live in memory at distinct addresses, so `*&x` reads `x`
//!
//! Memory that was never written holds a deterministic pseudo-random value
//! derived from its address and the machine seed.
//!
//! The evaluator is a reference model for checking rewrites and is not on
//! the simplifier's path.

use std::collections::HashMap;

use crate::error::{IrError, Result};
use crate::expr::{BinaryOp, ExprId, ExprKind, UnaryOp};
use crate::{ExprArena, Statement};

/// Base address of the first bound variable.
const VARIABLE_BASE: u64 = 0x1000;
/// Distance between consecutive variable slots.
const VARIABLE_STRIDE: u64 = 0x10;

/// A concrete machine state: variable placement plus sparse memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    seed: u64,
    addresses: HashMap<String, u64>,
    memory: HashMap<u64, u64>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Machine {
    /// Creates an empty machine whose unwritten memory is derived from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            addresses: HashMap::new(),
            memory: HashMap::new(),
        }
    }

    /// Binds a variable, allocating it a slot on first use, and stores `value`.
    pub fn bind(&mut self, name: impl Into<String>, value: u64) -> &mut Self {
        let name = name.into();
        let next = VARIABLE_BASE + VARIABLE_STRIDE * self.addresses.len() as u64;
        let addr = *self.addresses.entry(name).or_insert(next);
        self.memory.insert(addr, value);
        self
    }

    /// Address of a bound variable.
    pub fn address_of(&self, name: &str) -> Option<u64> {
        self.addresses.get(name).copied()
    }

    /// Current raw contents of a bound variable's slot.
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.address_of(name).map(|addr| self.load(addr))
    }

    /// Reads a memory word.
    pub fn load(&self, addr: u64) -> u64 {
        self.memory
            .get(&addr)
            .copied()
            .unwrap_or_else(|| splitmix64(addr ^ self.seed))
    }

    /// Writes a memory word.
    pub fn store(&mut self, addr: u64, value: u64) {
        self.memory.insert(addr, value);
    }

    /// Evaluates every top-level expression of a statement in order.
    pub fn eval_statement(&mut self, statement: &Statement) -> Result<Vec<u64>> {
        statement
            .roots()
            .iter()
            .map(|&root| self.eval(statement.arena(), root))
            .collect()
    }

    /// Evaluates one expression, applying its side effects to the machine.
    ///
    /// Evaluation recurses once per tree level. Trees several hundred levels
    /// deep fit the default thread stack; deeper ones need a larger stack.
    pub fn eval(&mut self, arena: &ExprArena, id: ExprId) -> Result<u64> {
        let expr = arena.try_get(id)?;
        let width = expr.width;
        let value = match &expr.kind {
            ExprKind::Val(v) => width.truncate(*v),
            ExprKind::Var(name) => {
                let addr = self
                    .address_of(name)
                    .ok_or_else(|| IrError::UnboundVariable(name.clone()))?;
                self.load(addr)
            }
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Inc | UnaryOp::Dec => {
                    let target_width = arena.get(*operand).width;
                    let addr = self.lvalue(arena, *operand)?;
                    let old = target_width.truncate(self.load(addr) as i128);
                    let new = if *op == UnaryOp::Inc {
                        old.wrapping_add(1)
                    } else {
                        old.wrapping_sub(1)
                    };
                    let new = target_width.truncate(new as i128);
                    self.store(addr, new);
                    new
                }
                UnaryOp::AddressOf => self.lvalue(arena, *operand)?,
                UnaryOp::Deref => {
                    let addr = self.eval(arena, *operand)?;
                    self.load(addr)
                }
                UnaryOp::BoolNot => (self.eval(arena, *operand)? == 0) as u64,
            },
            ExprKind::Binary { op, left, right } => match op {
                BinaryOp::Assign => {
                    let value = self.eval(arena, *right)?;
                    let target_width = arena.get(*left).width;
                    let addr = self.lvalue(arena, *left)?;
                    let stored = target_width.truncate(value as i128);
                    self.store(addr, stored);
                    stored
                }
                BinaryOp::BoolOr => {
                    if self.eval(arena, *left)? != 0 {
                        1
                    } else {
                        (self.eval(arena, *right)? != 0) as u64
                    }
                }
                _ => {
                    let l = self.eval(arena, *left)?;
                    let r = self.eval(arena, *right)?;
                    apply_binary(*op, l, r, width.bits())
                }
            },
        };
        Ok(width.truncate(value as i128))
    }

    /// Resolves the address designated by an lvalue expression.
    fn lvalue(&mut self, arena: &ExprArena, id: ExprId) -> Result<u64> {
        match &arena.try_get(id)?.kind {
            ExprKind::Var(name) => self
                .address_of(name)
                .ok_or_else(|| IrError::UnboundVariable(name.clone())),
            ExprKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } => self.eval(arena, *operand),
            _ => Err(IrError::NotAnLvalue(id)),
        }
    }
}

/// Applies a pure binary operator to operands already reduced to their widths.
/// The caller truncates the result to the node width.
fn apply_binary(op: BinaryOp, l: u64, r: u64, bits: u32) -> u64 {
    match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Xor => l ^ r,
        BinaryOp::And => l & r,
        BinaryOp::Shl => {
            if r >= bits as u64 {
                0
            } else {
                l << r
            }
        }
        BinaryOp::Shr => {
            if r >= bits as u64 {
                0
            } else {
                l >> r
            }
        }
        BinaryOp::CmpEq => (l == r) as u64,
        BinaryOp::CmpNe => (l != r) as u64,
        BinaryOp::CmpGt => (l > r) as u64,
        BinaryOp::CmpGe => (l >= r) as u64,
        BinaryOp::CmpLt => (l < r) as u64,
        BinaryOp::CmpLe => (l <= r) as u64,
        // Handled by the caller: they need lazy or lvalue evaluation.
        BinaryOp::Assign | BinaryOp::BoolOr => unreachable!("{:?} is not a pure operator", op),
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Width;

    #[test]
    fn test_arithmetic_wraps_at_width() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W8);
        let c = arena.val(1, Width::W8);
        let sum = arena.add(x, c);

        let mut machine = Machine::new(0);
        machine.bind("x", 0xff);
        assert_eq!(machine.eval(&arena, sum), Ok(0));
    }

    #[test]
    fn test_negative_literals_wrap() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W32);
        let minus_one = arena.val(-1, Width::W32);
        let sum = arena.add(x, minus_one);

        let mut machine = Machine::new(0);
        machine.bind("x", 10);
        assert_eq!(machine.eval(&arena, sum), Ok(9));
    }

    #[test]
    fn test_shifts() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W16);
        let four = arena.val(4, Width::W16);
        let sixteen = arena.val(16, Width::W16);
        let left = arena.shl(x, four);
        let right = arena.shr(x, four);
        let too_far = arena.shl(x, sixteen);

        let mut machine = Machine::new(0);
        machine.bind("x", 0xabcd);
        assert_eq!(machine.eval(&arena, left), Ok(0xbcd0));
        assert_eq!(machine.eval(&arena, right), Ok(0x0abc));
        assert_eq!(machine.eval(&arena, too_far), Ok(0));
    }

    #[test]
    fn test_assignment_and_increment_write_back() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W32);
        let y = arena.var("y", Width::W32);
        let store = arena.assign(x, y);
        let bump = arena.inc(x);
        let stmt = Statement::new(arena, vec![store, bump]).unwrap();

        let mut machine = Machine::new(0);
        machine.bind("x", 1).bind("y", 41);
        assert_eq!(machine.eval_statement(&stmt), Ok(vec![41, 42]));
        assert_eq!(machine.value_of("x"), Some(42));
    }

    #[test]
    fn test_decrement_wraps() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W16);
        let drop = arena.dec(x);

        let mut machine = Machine::new(0);
        machine.bind("x", 0);
        assert_eq!(machine.eval(&arena, drop), Ok(0xffff));
        assert_eq!(machine.value_of("x"), Some(0xffff));
    }

    #[test]
    fn test_address_of_and_deref() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W32);
        let addr = arena.address_of(x, Width::W64);
        let load = arena.deref(addr, Width::W32);

        let mut machine = Machine::new(0);
        machine.bind("x", 77);
        assert_eq!(machine.eval(&arena, addr).ok(), machine.address_of("x"));
        assert_eq!(machine.eval(&arena, load), Ok(77));
    }

    #[test]
    fn test_store_through_pointer() {
        let mut arena = ExprArena::new();
        let p = arena.var("p", Width::W64);
        let slot = arena.deref(p, Width::W8);
        let value = arena.val(0x1234, Width::W16);
        let store = arena.assign(slot, value);

        let mut machine = Machine::new(0);
        machine.bind("p", 0x8000);
        assert_eq!(machine.eval(&arena, store), Ok(0x34));
        assert_eq!(machine.load(0x8000), 0x34);
    }

    #[test]
    fn test_unwritten_memory_is_deterministic() {
        let a = Machine::new(7);
        let b = Machine::new(7);
        let c = Machine::new(8);
        assert_eq!(a.load(0x4000), b.load(0x4000));
        assert_ne!(a.load(0x4000), c.load(0x4000));
    }

    #[test]
    fn test_comparisons_and_boolean_operators() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W32);
        let y = arena.var("y", Width::W32);
        let gt = arena.cmp(BinaryOp::CmpGt, x, y);
        let eq = arena.cmp(BinaryOp::CmpEq, x, y);
        let or = arena.bool_or(gt, eq);
        let not = arena.bool_not(or);

        let mut machine = Machine::new(0);
        machine.bind("x", 3).bind("y", 3);
        assert_eq!(machine.eval(&arena, gt), Ok(0));
        assert_eq!(machine.eval(&arena, or), Ok(1));
        assert_eq!(machine.eval(&arena, not), Ok(0));
    }

    #[test]
    fn test_bool_or_short_circuits() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W32);
        let one = arena.val(1, Width::BOOL);
        let bump = arena.inc(x);
        let or = arena.bool_or(one, bump);

        let mut machine = Machine::new(0);
        machine.bind("x", 5);
        assert_eq!(machine.eval(&arena, or), Ok(1));
        assert_eq!(machine.value_of("x"), Some(5));
    }

    #[test]
    fn test_nested_sum() {
        let mut arena = ExprArena::new();
        let mut expr = arena.var("x", Width::W8);
        for _ in 0..500 {
            let one = arena.val(1, Width::W8);
            expr = arena.add(expr, one);
        }
        let mut machine = Machine::new(0);
        machine.bind("x", 10);
        // 10 + 500 wraps at 8 bits.
        assert_eq!(machine.eval(&arena, expr), Ok(254));
    }

    #[test]
    fn test_errors() {
        let mut arena = ExprArena::new();
        let x = arena.var("x", Width::W32);
        let c = arena.val(1, Width::W32);
        let bad_store = arena.assign(c, x);

        let mut machine = Machine::new(0);
        assert_eq!(
            machine.eval(&arena, x),
            Err(IrError::UnboundVariable("x".to_string()))
        );
        machine.bind("x", 1);
        assert_eq!(machine.eval(&arena, bad_store), Err(IrError::NotAnLvalue(c)));
    }
}
