//! Tree-walking evaluator.
//!
//! Recursive interpretation directly over the expression tree. This is the
//! reference backend: the closure and bytecode backends must match it
//! bit-for-bit for any terminating program that keeps stores in statement
//! position.

use crate::ast::Expr;
use crate::error::Result;
use crate::memory::Memory;

/// Evaluate a tree against the given memory.
///
/// Children evaluate strictly left-to-right; `and`/`or` evaluate both
/// operands. Division and modulo by zero follow IEEE-754 and flow through as
/// values. The only error is an out-of-range memory access, and memory keeps
/// any mutations made before the failure.
pub fn evaluate(expr: &Expr, memory: &mut Memory) -> Result<f64> {
    match expr {
        Expr::Constant(value) => Ok(*value),
        Expr::Sequence(children) => {
            let mut result = 0.0;
            for child in children {
                result = evaluate(child, memory)?;
            }
            Ok(result)
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            if evaluate(condition, memory)? != 0.0 {
                evaluate(then_branch, memory)
            } else {
                evaluate(else_branch, memory)
            }
        }
        Expr::While { condition, body } => {
            while evaluate(condition, memory)? != 0.0 {
                evaluate(body, memory)?;
            }
            Ok(0.0)
        }
        Expr::Load { index } => {
            let address = evaluate(index, memory)?;
            memory.load(address)
        }
        Expr::Store { index, value } => {
            let address = evaluate(index, memory)?;
            let value = evaluate(value, memory)?;
            memory.store(address, value)
        }
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, memory)?;
            let right = evaluate(right, memory)?;
            Ok(op.apply(left, right))
        }
        Expr::Unary { op, operand } => {
            let operand = evaluate(operand, memory)?;
            Ok(op.apply(operand))
        }
    }
}
