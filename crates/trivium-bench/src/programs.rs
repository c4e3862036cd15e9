//! Sample programs used by the benchmark driver and the equivalence tests.
//!
//! Programs are built with the tree sugar and read their inputs from fixed
//! memory cells; callers seed inputs explicitly before each run, and a
//! memory instance may be reused across runs.

use trivium_expr::build::{
    add, and, ge, gt, int, le, load, lt, ne, seq, store, sub, while_loop,
};
use trivium_expr::{Expr, Memory, Result};

/// Cell holding the Fibonacci iteration count (consumed down to 0).
pub const FIB_COUNTER: i32 = 0;

/// Cell holding the element count for the sort program.
pub const SORT_COUNT: i32 = 0;
/// First data cell of the sort program; data occupies `1..=count`.
pub const SORT_BASE: i32 = 1;

// Scratch cells for the sort program, above the 100-element data region.
const OUTER: i32 = 101;
const INNER: i32 = 102;
const KEY: i32 = 103;
const SUM: i32 = 104;
const CURSOR: i32 = 105;

/// Iterative Fibonacci driven by the counter in cell 0.
///
/// m[1] = 0; m[2] = 1;
/// while m[0] != 0 { m[3] = m[1] + m[2]; m[1] = m[2]; m[2] = m[3]; m[0] = m[0] - 1 }
/// yields m[1], the counter'th Fibonacci number.
pub fn fibonacci() -> Expr {
    seq(vec![
        store(int(1), int(0)),
        store(int(2), int(1)),
        while_loop(
            ne(load(int(FIB_COUNTER)), int(0)),
            seq(vec![
                store(int(3), add(load(int(1)), load(int(2)))),
                store(int(1), load(int(2))),
                store(int(2), load(int(3))),
                store(int(FIB_COUNTER), sub(load(int(FIB_COUNTER)), int(1))),
            ]),
        ),
        load(int(1)),
    ])
}

/// Seed the Fibonacci iteration count.
pub fn seed_fibonacci(memory: &mut Memory, iterations: f64) -> Result<()> {
    memory.write(FIB_COUNTER as i64, iterations)
}

/// Insertion sort over m[1..=m[0]] followed by the alternating-index sum.
///
/// Sorts the data region ascending in place, then yields the sum of the
/// cells at odd indices 1, 3, 5, ... below the element count. The inner
/// loop guard relies on `and` evaluating both operands: when the scan
/// cursor reaches 0 the data read lands on the count cell, which is in
/// range and ignored because the first operand is already false.
pub fn sort_and_sum() -> Expr {
    seq(vec![
        // Insertion sort.
        store(int(OUTER), int(2)),
        while_loop(
            le(load(int(OUTER)), load(int(SORT_COUNT))),
            seq(vec![
                store(int(KEY), load(load(int(OUTER)))),
                store(int(INNER), sub(load(int(OUTER)), int(1))),
                while_loop(
                    and(
                        ge(load(int(INNER)), int(SORT_BASE)),
                        gt(load(load(int(INNER))), load(int(KEY))),
                    ),
                    seq(vec![
                        store(add(load(int(INNER)), int(1)), load(load(int(INNER)))),
                        store(int(INNER), sub(load(int(INNER)), int(1))),
                    ]),
                ),
                store(add(load(int(INNER)), int(1)), load(int(KEY))),
                store(int(OUTER), add(load(int(OUTER)), int(1))),
            ]),
        ),
        // Alternating sum of m[1], m[3], m[5], ...
        store(int(SUM), int(0)),
        store(int(CURSOR), int(1)),
        while_loop(
            lt(load(int(CURSOR)), load(int(SORT_COUNT))),
            seq(vec![
                store(int(SUM), add(load(int(SUM)), load(load(int(CURSOR))))),
                store(int(CURSOR), add(load(int(CURSOR)), int(2))),
            ]),
        ),
        load(int(SUM)),
    ])
}

/// Seed the sort program's inputs: count cells holding `count`, and
/// m[i] = count - i for i in 1..=count (reverse-ordered data).
pub fn seed_sort_and_sum(memory: &mut Memory, count: u32) -> Result<()> {
    memory.write(SORT_COUNT as i64, count as f64)?;
    for i in 1..=count {
        memory.write(i as i64, (count - i) as f64)?;
    }
    Ok(())
}
