//! Property-based tests for the fixed-point driver.
//!
//! These tests verify that, on random statements:
//! - Simplification preserves values and memory effects
//! - A second run changes nothing
//! - The driver reaches a fixed point well before the pass limit, even on
//!   chains deeper than any fixed pass budget
//! - The reachable node count never grows
//! - Parallel and sequential simplification agree

use proptest::prelude::*;

use hexray_ir::{BinaryOp, ExprArena, ExprId, Machine, Statement, UnaryOp, Width};
use hexray_rewrite::{simplify, simplify_statements_parallel, Simplifier, SimplifierConfig};

// =============================================================================
// Statement Generators
// =============================================================================

#[derive(Debug, Clone)]
enum Shape {
    Val(i64),
    Var(u8),
    Unary(UnaryOp, Box<Shape>),
    Binary(BinaryOp, Box<Shape>, Box<Shape>),
}

fn arb_unary_op() -> impl Strategy<Value = UnaryOp> {
    prop::sample::select(vec![
        UnaryOp::Inc,
        UnaryOp::Dec,
        UnaryOp::AddressOf,
        UnaryOp::Deref,
        UnaryOp::BoolNot,
    ])
}

fn arb_binary_op() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(vec![
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
    ])
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    // Small literals and few variables so that duplicate operands, zeros and
    // ones (the shapes the rules look for) show up often.
    let leaf = prop_oneof![
        (-3i64..4).prop_map(Shape::Val),
        (-20i64..20).prop_map(Shape::Val),
        (0u8..3).prop_map(Shape::Var),
    ];

    leaf.prop_recursive(
        5,  // depth
        48, // max nodes
        2,  // items per collection
        |inner| {
            prop_oneof![
                (arb_unary_op(), inner.clone())
                    .prop_map(|(op, operand)| Shape::Unary(op, Box::new(operand))),
                (arb_binary_op(), inner.clone(), inner.clone())
                    .prop_map(|(op, l, r)| Shape::Binary(op, Box::new(l), Box::new(r))),
                // x op x
                (arb_binary_op(), inner)
                    .prop_map(|(op, x)| Shape::Binary(op, Box::new(x.clone()), Box::new(x))),
            ]
        },
    )
}

fn arb_width() -> impl Strategy<Value = Width> {
    prop::sample::select(Width::common().to_vec())
}

fn build(arena: &mut ExprArena, shape: &Shape, width: Width) -> ExprId {
    match shape {
        Shape::Val(v) => arena.val(*v as i128, width),
        Shape::Var(n) => arena.var(format!("v{}", n), width),
        Shape::Unary(UnaryOp::AddressOf, operand) => {
            // Variable addresses do not fit in narrow pointers.
            let operand = build(arena, operand, width);
            arena.address_of(operand, Width::W64)
        }
        Shape::Unary(op, operand) => {
            let operand = build(arena, operand, width);
            arena.unary(*op, operand, width)
        }
        Shape::Binary(op, l, r) => {
            let l = build(arena, l, width);
            let r = build(arena, r, width);
            arena.binary(*op, l, r, width)
        }
    }
}

fn arb_statement() -> impl Strategy<Value = Statement> {
    prop::collection::vec((arb_shape(), arb_width()), 1..4).prop_map(|parts| {
        let mut arena = ExprArena::new();
        let roots = parts
            .iter()
            .map(|(shape, width)| build(&mut arena, shape, *width))
            .collect();
        Statement::new(arena, roots).expect("generated statements have roots")
    })
}

fn arb_machine() -> impl Strategy<Value = Machine> {
    (any::<u64>(), prop::array::uniform3(any::<u64>())).prop_map(|(seed, values)| {
        let mut machine = Machine::new(seed);
        for (i, value) in values.iter().enumerate() {
            machine.bind(format!("v{}", i), *value);
        }
        machine
    })
}

fn all_rules() -> Simplifier {
    Simplifier::new(SimplifierConfig::all_rules())
}

// =============================================================================
// Driver Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Simplified statements compute the same values with the same effects.
    #[test]
    fn simplification_is_sound(statement in arb_statement(), machine in arb_machine()) {
        let mut simplified = statement.clone();
        all_rules().run(&mut simplified);

        let mut before = machine.clone();
        let expected = before.eval_statement(&statement);
        if expected.is_err() {
            // Statements that fault (e.g. `3 = v0`) have nothing to compare.
            return Ok(());
        }

        let mut after = machine;
        let actual = after.eval_statement(&simplified);
        prop_assert_eq!(actual, expected, "{} => {}", statement, simplified);
        prop_assert_eq!(after, before, "{} => {}", statement, simplified);
    }

    /// The driver stops at a fixed point: running it again does nothing.
    #[test]
    fn second_run_changes_nothing(statement in arb_statement()) {
        let simplifier = all_rules();
        let mut statement = statement;
        let first = simplifier.run_with_stats(&mut statement);
        prop_assert!(!first.hit_pass_limit);

        let once = statement.clone();
        let second = simplifier.run_with_stats(&mut statement);
        prop_assert!(second.is_unchanged());
        prop_assert_eq!(second.passes, 1);
        prop_assert_eq!(&statement, &once);
    }

    /// Rewrites never make a statement bigger, and the pass count is bounded
    /// by the number of rewrites.
    #[test]
    fn simplification_does_not_grow(statement in arb_statement()) {
        let mut simplified = statement.clone();
        let stats = Simplifier::default().run_with_stats(&mut simplified);

        prop_assert!(simplified.node_count() <= statement.node_count());
        prop_assert!(stats.passes <= stats.rewrites + 1);
        prop_assert_eq!(
            stats.rewrites,
            stats.by_rule.values().sum::<usize>()
        );
    }

    /// The default configuration agrees with the free function.
    #[test]
    fn simplify_uses_default_config(statement in arb_statement()) {
        let mut a = statement.clone();
        let mut b = statement;
        simplify(&mut a);
        Simplifier::new(SimplifierConfig::default()).run(&mut b);
        prop_assert_eq!(a, b);
    }
}

/// `((x ± c) ± c ...) == k` with one offset per level, deeper than any fixed
/// pass budget would allow for.
fn arb_offset_chain() -> impl Strategy<Value = Statement> {
    (
        prop::collection::vec((any::<bool>(), -40i64..40), 65..160),
        -1000i64..1000,
        arb_width(),
    )
        .prop_map(|(offsets, k, width)| {
            let mut arena = ExprArena::new();
            let mut lhs = arena.var("v0", width);
            for (subtract, c) in offsets {
                let c = arena.val(c as i128, width);
                let op = if subtract { BinaryOp::Sub } else { BinaryOp::Add };
                lhs = arena.binary(op, lhs, c, width);
            }
            let k = arena.val(k as i128, width);
            let root = arena.cmp(BinaryOp::CmpEq, lhs, k);
            Statement::single(arena, root).expect("chain has a root")
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Deep offset chains still reach a fixed point in one run.
    #[test]
    fn deep_chain_reaches_fixed_point(statement in arb_offset_chain(), machine in arb_machine()) {
        let simplifier = all_rules();
        let mut simplified = statement.clone();
        let first = simplifier.run_with_stats(&mut simplified);
        prop_assert!(!first.hit_pass_limit, "{} stopped early", statement);
        prop_assert_eq!(simplified.node_count(), 3);

        let second = simplifier.run_with_stats(&mut simplified);
        prop_assert!(second.is_unchanged());

        let mut before = machine.clone();
        let mut after = machine;
        prop_assert_eq!(
            after.eval_statement(&simplified),
            before.eval_statement(&statement)
        );
    }

    /// Parallel simplification is the sequential result, statement by statement.
    #[test]
    fn parallel_matches_sequential(
        statements in prop::collection::vec(arb_statement(), 0..16),
    ) {
        let config = SimplifierConfig::default();
        let mut parallel = statements.clone();
        let mut sequential = statements;

        let par_stats = simplify_statements_parallel(&mut parallel, &config);
        let seq_stats = Simplifier::new(config).run_all(&mut sequential);

        prop_assert_eq!(parallel, sequential);
        prop_assert_eq!(par_stats, seq_stats);
    }
}

// =============================================================================
// Near Misses
// =============================================================================

fn assert_unchanged(arena: ExprArena, root: ExprId) {
    let mut statement = Statement::single(arena, root).unwrap();
    let original = statement.clone();
    let stats = all_rules().run_with_stats(&mut statement);
    assert!(stats.is_unchanged(), "{} was rewritten", original);
    assert_eq!(statement, original);
}

#[test]
fn step_of_two_is_kept() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", Width::W32);
    let two = arena.val(2, Width::W32);
    let sum = arena.add(x, two);
    let root = arena.assign(x, sum);
    assert_unchanged(arena, root);
}

#[test]
fn zero_of_another_width_is_kept() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", Width::W32);
    let zero = arena.val(0, Width::W8);
    let root = arena.add(x, zero);
    assert_unchanged(arena, root);
}

#[test]
fn commuted_operands_are_kept() {
    // 0 + x and y ^ x are not in the catalog.
    let mut arena = ExprArena::new();
    let x = arena.var("x", Width::W32);
    let zero = arena.val(0, Width::W32);
    let root = arena.add(zero, x);
    assert_unchanged(arena, root);

    let mut arena = ExprArena::new();
    let x = arena.var("x", Width::W32);
    let y = arena.var("y", Width::W32);
    let gt = arena.cmp(BinaryOp::CmpGt, x, y);
    let eq = arena.cmp(BinaryOp::CmpEq, y, x);
    let root = arena.bool_or(gt, eq);
    assert_unchanged(arena, root);
}

#[test]
fn side_effecting_duplicates_are_kept() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", Width::W32);
    let a = arena.dec(x);
    let b = arena.dec(x);
    let root = arena.xor(a, b);
    assert_unchanged(arena, root);
}
