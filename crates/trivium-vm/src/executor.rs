//! Bytecode executor.
//!
//! Stack-based dispatch loop over a compiled program and the shared memory.
//! The operand stack is preallocated once and never grows past its fixed
//! capacity, so the loop itself performs no heap allocation.

use trivium_expr::{BinaryOp, Memory, UnaryOp};

use crate::bytecode::{Op, Program};
use crate::error::{ExecError, Result};

/// Operand stack capacity. Ample for the expression depths the compiler
/// emits; a well-formed program never comes close.
pub const STACK_CAPACITY: usize = 1024;

/// Execute a program against the given memory.
///
/// Returns the top of stack at termination, or 0.0 when the stack is empty
/// (a program ending in statement position). Memory keeps all mutations made
/// before a failure point.
pub fn execute(program: &Program, memory: &mut Memory) -> Result<f64> {
    let ops = program.ops();
    let mut stack: Vec<f64> = Vec::with_capacity(STACK_CAPACITY);
    let mut ip = 0usize;

    while ip < ops.len() {
        match ops[ip] {
            Op::Noop => {}

            Op::Push(value) => push(&mut stack, value)?,

            Op::Pop => {
                pop(&mut stack)?;
            }

            Op::Get(cell) => {
                let value = memory.read(cell as i64)?;
                push(&mut stack, value)?;
            }

            Op::Set(cell) => {
                let value = pop(&mut stack)?;
                memory.write(cell as i64, value)?;
            }

            Op::GetIndirect => {
                let address = pop(&mut stack)?;
                let value = memory.load(address)?;
                push(&mut stack, value)?;
            }

            Op::SetIndirect => {
                let value = pop(&mut stack)?;
                let address = pop(&mut stack)?;
                memory.store(address, value)?;
            }

            Op::Jmp(target) => {
                ip = jump_target(target, ops.len())?;
                continue;
            }

            Op::PopJmpIfFalse(target) => {
                if pop(&mut stack)? == 0.0 {
                    ip = jump_target(target, ops.len())?;
                    continue;
                }
            }

            Op::PopJmpIfTrue(target) => {
                if pop(&mut stack)? != 0.0 {
                    ip = jump_target(target, ops.len())?;
                    continue;
                }
            }

            Op::Add => binary(&mut stack, BinaryOp::Add)?,
            Op::Sub => binary(&mut stack, BinaryOp::Sub)?,
            Op::Mul => binary(&mut stack, BinaryOp::Mul)?,
            Op::Div => binary(&mut stack, BinaryOp::Div)?,
            Op::Mod => binary(&mut stack, BinaryOp::Mod)?,
            Op::Eq => binary(&mut stack, BinaryOp::Eq)?,
            Op::Ne => binary(&mut stack, BinaryOp::Ne)?,
            Op::Lt => binary(&mut stack, BinaryOp::Lt)?,
            Op::Le => binary(&mut stack, BinaryOp::Le)?,
            Op::Gt => binary(&mut stack, BinaryOp::Gt)?,
            Op::Ge => binary(&mut stack, BinaryOp::Ge)?,
            Op::And => binary(&mut stack, BinaryOp::And)?,
            Op::Or => binary(&mut stack, BinaryOp::Or)?,

            Op::Not => {
                let value = pop(&mut stack)?;
                stack.push(UnaryOp::Not.apply(value));
            }
        }
        ip += 1;
    }

    Ok(stack.pop().unwrap_or(0.0))
}

#[inline]
fn push(stack: &mut Vec<f64>, value: f64) -> Result<()> {
    debug_assert!(stack.len() <= STACK_CAPACITY);
    if stack.len() == STACK_CAPACITY {
        return Err(ExecError::StackOverflow {
            capacity: STACK_CAPACITY,
        });
    }
    stack.push(value);
    Ok(())
}

#[inline]
fn pop(stack: &mut Vec<f64>) -> Result<f64> {
    stack.pop().ok_or(ExecError::StackUnderflow)
}

/// Pop two operands and push the operator result.
///
/// Semantics come from the shared [`BinaryOp::apply`], the same definition
/// the tree backends use.
#[inline]
fn binary(stack: &mut Vec<f64>, op: BinaryOp) -> Result<()> {
    let right = pop(stack)?;
    let left = pop(stack)?;
    stack.push(op.apply(left, right));
    Ok(())
}

#[inline]
fn jump_target(target: i32, len: usize) -> Result<usize> {
    // Jumping to exactly `len` terminates the loop and is legal.
    if target < 0 || target as usize > len {
        return Err(ExecError::InvalidProgram {
            target: target as i64,
            len,
        });
    }
    Ok(target as usize)
}
