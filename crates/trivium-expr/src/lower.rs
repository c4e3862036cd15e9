//! Closure lowering.
//!
//! Transforms a tree into a composed, pre-resolved callable. Each node's
//! thunk captures its children's thunks once at lowering time, so invocation
//! performs no tree traversal and no variant dispatch, only nested calls.
//! This backend isolates the cost of dispatch from the cost of recursion
//! itself; the shared memory is passed explicitly on every call and is the
//! only mutable state.

use crate::ast::Expr;
use crate::error::Result;
use crate::memory::Memory;

/// A lowered program: invoke with a memory to run it.
pub type Thunk = Box<dyn Fn(&mut Memory) -> Result<f64>>;

/// Lower a tree into a thunk behaving exactly like
/// [`evaluate`](crate::evaluate) on the same tree.
pub fn lower(expr: &Expr) -> Thunk {
    match expr {
        Expr::Constant(value) => {
            let value = *value;
            Box::new(move |_| Ok(value))
        }
        Expr::Sequence(children) => {
            let children: Vec<Thunk> = children.iter().map(lower).collect();
            Box::new(move |memory| {
                let mut result = 0.0;
                for child in &children {
                    result = child(memory)?;
                }
                Ok(result)
            })
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition = lower(condition);
            let then_branch = lower(then_branch);
            let else_branch = lower(else_branch);
            Box::new(move |memory| {
                if condition(memory)? != 0.0 {
                    then_branch(memory)
                } else {
                    else_branch(memory)
                }
            })
        }
        Expr::While { condition, body } => {
            let condition = lower(condition);
            let body = lower(body);
            Box::new(move |memory| {
                while condition(memory)? != 0.0 {
                    body(memory)?;
                }
                Ok(0.0)
            })
        }
        Expr::Load { index } => {
            let index = lower(index);
            Box::new(move |memory| {
                let address = index(memory)?;
                memory.load(address)
            })
        }
        Expr::Store { index, value } => {
            let index = lower(index);
            let value = lower(value);
            Box::new(move |memory| {
                let address = index(memory)?;
                let value = value(memory)?;
                memory.store(address, value)
            })
        }
        Expr::Binary { op, left, right } => {
            let op = *op;
            let left = lower(left);
            let right = lower(right);
            Box::new(move |memory| {
                let left = left(memory)?;
                let right = right(memory)?;
                Ok(op.apply(left, right))
            })
        }
        Expr::Unary { op, operand } => {
            let op = *op;
            let operand = lower(operand);
            Box::new(move |memory| {
                let operand = operand(memory)?;
                Ok(op.apply(operand))
            })
        }
    }
}
