//! Cross-backend equivalence suite.
//!
//! The fundamental law: for every tree and every initial memory over which
//! evaluation terminates, the returned value and the final memory image are
//! bit-identical under the tree walker, the lowered closures, and the
//! bytecode machine. Concrete scenarios pin the known programs; property
//! tests sweep randomly generated trees with stores kept in statement
//! position and loops generated in a counter-guarded shape so they
//! terminate by construction.

use proptest::prelude::*;

use trivium_bench::programs;
use trivium_expr::build::*;
use trivium_expr::{evaluate, lower, BinaryOp, Expr, Memory};
use trivium_vm::{compile, execute, Op};

const CELLS: usize = 256;

/// A memory with a deterministic non-zero pattern in the addressable range.
fn seeded_memory() -> Memory {
    let mut memory = Memory::new(CELLS);
    for cell in 0..64 {
        memory.write(cell, cell as f64 * 1.5).unwrap();
    }
    memory
}

fn assert_cells_bit_equal(expected: &Memory, actual: &Memory, backend: &str) {
    assert_eq!(expected.cells().len(), actual.cells().len());
    for (i, (a, b)) in expected.cells().iter().zip(actual.cells()).enumerate() {
        assert_eq!(
            a.to_bits(),
            b.to_bits(),
            "memory cell {i} diverged on {backend} backend"
        );
    }
}

/// Run a tree on all three backends from clones of the same initial memory,
/// asserting bit-identical results and final memory images.
fn assert_backends_agree(tree: &Expr, initial: &Memory) -> f64 {
    let mut tree_memory = initial.clone();
    let mut closure_memory = initial.clone();
    let mut bytecode_memory = initial.clone();

    let direct = evaluate(tree, &mut tree_memory).unwrap();

    let thunk = lower(tree);
    let lowered = thunk(&mut closure_memory).unwrap();

    let program = compile(tree);
    program.validate().unwrap();
    let machine = execute(&program, &mut bytecode_memory).unwrap();

    assert_eq!(
        direct.to_bits(),
        lowered.to_bits(),
        "closure result diverged: {direct} vs {lowered}"
    );
    assert_eq!(
        direct.to_bits(),
        machine.to_bits(),
        "bytecode result diverged: {direct} vs {machine}"
    );
    assert_cells_bit_equal(&tree_memory, &closure_memory, "closure");
    assert_cells_bit_equal(&tree_memory, &bytecode_memory, "bytecode");

    direct
}

// === Concrete scenarios ===

#[test]
fn constant_only() {
    let tree = lit(42.0);
    assert_eq!(assert_backends_agree(&tree, &Memory::new(CELLS)), 42.0);
    assert_eq!(compile(&tree).ops(), &[Op::Push(42.0)]);
}

#[test]
fn memory_round_trip() {
    let tree = seq(vec![store(int(5), int(7)), load(int(5))]);
    let initial = Memory::new(CELLS);
    assert_eq!(assert_backends_agree(&tree, &initial), 7.0);

    let mut memory = initial.clone();
    evaluate(&tree, &mut memory).unwrap();
    assert_eq!(memory.read(5).unwrap(), 7.0);
}

#[test]
fn fibonacci_small() {
    let mut initial = Memory::default();
    programs::seed_fibonacci(&mut initial, 10.0).unwrap();
    assert_eq!(assert_backends_agree(&programs::fibonacci(), &initial), 55.0);
}

#[test]
fn fibonacci_thousand_iterations() {
    let mut initial = Memory::default();
    programs::seed_fibonacci(&mut initial, 1000.0).unwrap();
    let result = assert_backends_agree(&programs::fibonacci(), &initial);
    assert!(result.is_finite());
    assert!(result > 0.0);
}

#[test]
fn insertion_sort_and_alternating_sum() {
    let mut initial = Memory::default();
    programs::seed_sort_and_sum(&mut initial, 100).unwrap();
    let result = assert_backends_agree(&programs::sort_and_sum(), &initial);
    assert_eq!(result, 2450.0);

    let mut memory = initial.clone();
    evaluate(&programs::sort_and_sum(), &mut memory).unwrap();
    for i in 1..100i64 {
        assert!(
            memory.read(i).unwrap() <= memory.read(i + 1).unwrap(),
            "cells {i} and {} out of order",
            i + 1
        );
    }
}

#[test]
fn conditional_branching() {
    let equal = if_else(eq(int(1), int(1)), int(3), int(4));
    assert_eq!(assert_backends_agree(&equal, &Memory::new(CELLS)), 3.0);

    let unequal = if_else(eq(int(1), int(2)), int(3), int(4));
    assert_eq!(assert_backends_agree(&unequal, &Memory::new(CELLS)), 4.0);
}

#[test]
fn empty_sequence() {
    let tree = seq(vec![]);
    assert_eq!(assert_backends_agree(&tree, &Memory::new(CELLS)), 0.0);
    assert_eq!(compile(&tree).ops(), &[Op::Push(0.0)]);
}

#[test]
fn while_in_value_position_yields_zero() {
    // The loop is the final child of the root sequence, so it sits in value
    // position in every backend.
    let tree = seq(vec![store(int(0), int(3)), while_loop(
        gt(load(int(0)), int(0)),
        store(int(0), sub(load(int(0)), int(1))),
    )]);
    assert_eq!(assert_backends_agree(&tree, &Memory::new(CELLS)), 0.0);
}

#[test]
fn compilation_is_idempotent() {
    let tree = programs::sort_and_sum();
    let first = compile(&tree);
    let second = compile(&tree);
    assert_eq!(first, second);
    assert_eq!(first.len(), second.len());
}

// === Property tests ===

fn binop() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Add),
        Just(BinaryOp::Sub),
        Just(BinaryOp::Mul),
        Just(BinaryOp::Div),
        Just(BinaryOp::Mod),
        Just(BinaryOp::Eq),
        Just(BinaryOp::Ne),
        Just(BinaryOp::Lt),
        Just(BinaryOp::Le),
        Just(BinaryOp::Gt),
        Just(BinaryOp::Ge),
        Just(BinaryOp::And),
        Just(BinaryOp::Or),
    ]
}

/// Cell addresses stay inside 0..64 so every access is in range.
fn index_expr() -> BoxedStrategy<Expr> {
    prop_oneof![
        (0i32..64).prop_map(int),
        // The computed form forces the indirect opcodes.
        (0i32..32, 0i32..32).prop_map(|(a, b)| add(int(a), int(b))),
    ]
    .boxed()
}

/// Pure value expressions: no stores, no loops.
fn value_expr() -> BoxedStrategy<Expr> {
    let leaf = prop_oneof![
        (-100i32..100).prop_map(int),
        (-100.0f64..100.0).prop_map(lit),
        index_expr().prop_map(load),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (binop(), inner.clone(), inner.clone()).prop_map(|(op, l, r)| binary(op, l, r)),
            inner.clone().prop_map(not),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, f)| if_else(c, t, f)),
            prop::collection::vec(inner, 0..3).prop_map(seq),
        ]
    })
    .boxed()
}

/// Statements: stores in statement position, value expressions evaluated
/// for effect, and counter-guarded loops that terminate by construction.
/// Counter cells sit in 64..96, outside the range value expressions
/// address, so loop bodies cannot clobber their own counters.
fn statement() -> BoxedStrategy<Expr> {
    let simple = prop_oneof![
        (index_expr(), value_expr()).prop_map(|(index, value)| store(index, value)),
        value_expr(),
    ]
    .boxed();
    let counted_loop = (
        64i32..96,
        0i32..6,
        prop::collection::vec(simple.clone(), 0..3),
    )
        .prop_map(|(cell, count, body)| {
            let mut children = body;
            children.push(store(int(cell), sub(load(int(cell)), int(1))));
            seq(vec![
                store(int(cell), int(count)),
                while_loop(gt(load(int(cell)), int(0)), seq(children)),
            ])
        });
    prop_oneof![simple, counted_loop].boxed()
}

/// A whole program: statements followed by a pure result expression, so the
/// root value never comes from a store.
fn program_tree() -> impl Strategy<Value = Expr> {
    (prop::collection::vec(statement(), 0..6), value_expr()).prop_map(|(mut stmts, result)| {
        stmts.push(result);
        seq(stmts)
    })
}

proptest! {
    /// All three backends agree on the result and the final memory image.
    #[test]
    fn prop_backends_agree(tree in program_tree()) {
        assert_backends_agree(&tree, &seeded_memory());
    }

    /// Compiling the same tree twice yields identical instruction arrays.
    #[test]
    fn prop_compilation_is_idempotent(tree in program_tree()) {
        prop_assert_eq!(compile(&tree), compile(&tree));
    }

    /// Lowering the same tree twice yields thunks that behave identically.
    #[test]
    fn prop_lowering_is_deterministic(tree in program_tree()) {
        let first = lower(&tree);
        let second = lower(&tree);
        let mut memory_a = seeded_memory();
        let mut memory_b = seeded_memory();
        let a = first(&mut memory_a).unwrap();
        let b = second(&mut memory_b).unwrap();
        prop_assert_eq!(a.to_bits(), b.to_bits());
        assert_cells_bit_equal(&memory_a, &memory_b, "relowered");
    }

    /// Every compiled program passes static validation.
    #[test]
    fn prop_compiled_programs_validate(tree in program_tree()) {
        prop_assert!(compile(&tree).validate().is_ok());
    }
}
