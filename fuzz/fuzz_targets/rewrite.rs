#![no_main]

use libfuzzer_sys::fuzz_target;
use hexray_ir::{BinaryOp, ExprArena, ExprId, Machine, Statement, UnaryOp, Width};
use hexray_rewrite::{Simplifier, SimplifierConfig};

const BINARY_OPS: [BinaryOp; 14] = [
    BinaryOp::Assign,
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Xor,
    BinaryOp::And,
    BinaryOp::Shl,
    BinaryOp::Shr,
    BinaryOp::CmpEq,
    BinaryOp::CmpNe,
    BinaryOp::CmpGt,
    BinaryOp::CmpGe,
    BinaryOp::CmpLt,
    BinaryOp::CmpLe,
    BinaryOp::BoolOr,
];

const UNARY_OPS: [UnaryOp; 5] = [
    UnaryOp::Inc,
    UnaryOp::Dec,
    UnaryOp::AddressOf,
    UnaryOp::Deref,
    UnaryOp::BoolNot,
];

/// Reads a prefix-encoded tree from the input bytes.
struct Builder<'a> {
    data: &'a [u8],
    pos: usize,
    arena: ExprArena,
}

impl Builder<'_> {
    fn next(&mut self) -> u8 {
        let byte = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    fn tree(&mut self, width: Width, depth: u32) -> ExprId {
        let tag = self.next();
        let kind = if depth == 0 { tag % 2 } else { tag % 4 };
        match kind {
            0 => {
                let value = self.next() as i8;
                self.arena.val(value as i128, width)
            }
            1 => {
                let n = self.next() % 3;
                self.arena.var(format!("v{}", n), width)
            }
            2 => {
                let op = UNARY_OPS[(self.next() as usize) % UNARY_OPS.len()];
                let operand = self.tree(width, depth - 1);
                if op == UnaryOp::AddressOf {
                    self.arena.address_of(operand, Width::W64)
                } else {
                    self.arena.unary(op, operand, width)
                }
            }
            _ => {
                let op = BINARY_OPS[(self.next() as usize) % BINARY_OPS.len()];
                let start = self.pos;
                let left = self.tree(width, depth - 1);
                let right = if self.next() % 4 == 0 {
                    // Replay the left operand's bytes to produce `x op x`.
                    let end = self.pos;
                    self.pos = start;
                    let copy = self.tree(width, depth - 1);
                    self.pos = end;
                    copy
                } else {
                    self.tree(width, depth - 1)
                };
                self.arena.binary(op, left, right, width)
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let mut builder = Builder {
        data,
        pos: 0,
        arena: ExprArena::new(),
    };
    let roots: Vec<ExprId> = (0..1 + data[0] % 3)
        .map(|_| {
            let width = Width::common()[(builder.next() as usize) % 4];
            builder.tree(width, 6)
        })
        .collect();
    let Ok(original) = Statement::new(builder.arena, roots) else {
        return;
    };

    let simplifier = Simplifier::new(SimplifierConfig::all_rules());
    let mut simplified = original.clone();
    let stats = simplifier.run_with_stats(&mut simplified);
    assert!(!stats.hit_pass_limit, "no fixed point for {}", original);

    // Fixed point
    let mut again = simplified.clone();
    assert!(simplifier.run_with_stats(&mut again).is_unchanged());

    // Same values and effects
    let mut machine = Machine::new(u64::from_le_bytes([data[1], data[2], data[3], 0, 0, 0, 0, 0]));
    for i in 0..3 {
        machine.bind(format!("v{}", i), (data[1] as u64).wrapping_mul(0x9e37_79b9) ^ i);
    }
    let mut before = machine.clone();
    if let Ok(expected) = before.eval_statement(&original) {
        let mut after = machine;
        assert_eq!(after.eval_statement(&simplified), Ok(expected));
        assert_eq!(after, before, "{} => {}", original, simplified);
    }
});
