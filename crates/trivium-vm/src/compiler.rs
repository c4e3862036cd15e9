//! Bytecode compiler.
//!
//! Linearizes an expression tree into a [`Program`] by depth-first walk.
//! Each sub-expression compiles under a `use_value` flag saying whether the
//! surrounding code needs its result on the operand stack; code compiled
//! with `use_value = false` leaves the stack exactly as it found it.
//! Forward jumps are emitted with a placeholder target and patched once the
//! destination address is known.
//!
//! Two value-position details are fixed here and relied on by the tests:
//!
//! - A while loop in value position pushes an explicit 0, so "while yields
//!   0" holds in this backend too.
//! - A store never leaves the stored value on the stack, even in value
//!   position. The instruction set has no duplication opcode, so the
//!   indirect form cannot re-materialize the value; keeping the direct form
//!   consistent with it means a store differs from the tree backends only
//!   outside statement position, where no supported program puts one.

use tracing::debug;

use trivium_expr::{BinaryOp, Expr, UnaryOp};

use crate::bytecode::{Op, Program};

/// Compile a tree into a program whose execution yields the tree's value.
///
/// Compilation is infallible: every tree is a valid program, and every
/// emitted jump target is patched before the program is returned.
pub fn compile(expr: &Expr) -> Program {
    let mut compiler = Compiler {
        program: Program::new(),
    };
    compiler.compile_expr(expr, true);
    let program = compiler.program;
    debug!(instructions = program.len(), "compiled program");
    program
}

/// Compiler state: the program being assembled.
struct Compiler {
    program: Program,
}

impl Compiler {
    fn compile_expr(&mut self, expr: &Expr, use_value: bool) {
        match expr {
            Expr::Constant(value) => {
                if use_value {
                    self.program.emit(Op::Push(*value));
                }
            }

            Expr::Sequence(children) => match children.split_last() {
                None => {
                    // An empty sequence still yields 0 in value position.
                    if use_value {
                        self.program.emit(Op::Push(0.0));
                    }
                }
                Some((last, init)) => {
                    for child in init {
                        self.compile_expr(child, false);
                    }
                    self.compile_expr(last, use_value);
                }
            },

            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.compile_expr(condition, true);

                let jump_to_else = self.program.emit(Op::PopJmpIfFalse(0)); // placeholder

                self.compile_expr(then_branch, use_value);
                let jump_over_else = self.program.emit(Op::Jmp(0)); // placeholder

                let else_start = self.program.offset();
                self.program.patch_jump(jump_to_else, else_start);

                self.compile_expr(else_branch, use_value);
                let end = self.program.offset();
                self.program.patch_jump(jump_over_else, end);
            }

            Expr::While { condition, body } => {
                let loop_head = self.program.offset();
                self.compile_expr(condition, true);

                let jump_out = self.program.emit(Op::PopJmpIfFalse(0)); // placeholder

                self.compile_expr(body, false);
                self.program.emit(Op::Jmp(loop_head as i32));

                let end = self.program.offset();
                self.program.patch_jump(jump_out, end);

                if use_value {
                    // A while loop always yields 0.
                    self.program.emit(Op::Push(0.0));
                }
            }

            Expr::Load { index } => {
                // A discarded load is pure; emit nothing.
                if !use_value {
                    return;
                }
                match index.as_constant() {
                    Some(cell) => {
                        self.program.emit(Op::Get(cell as i32));
                    }
                    None => {
                        self.compile_expr(index, true);
                        self.program.emit(Op::GetIndirect);
                    }
                }
            }

            // A store always has its side effect, whatever the context.
            Expr::Store { index, value } => match index.as_constant() {
                Some(cell) => {
                    self.compile_expr(value, true);
                    self.program.emit(Op::Set(cell as i32));
                }
                None => {
                    self.compile_expr(index, true);
                    self.compile_expr(value, true);
                    self.program.emit(Op::SetIndirect);
                }
            },

            Expr::Binary { op, left, right } => {
                if !use_value {
                    // Result unused: keep operand side effects, skip the op.
                    self.compile_expr(left, false);
                    self.compile_expr(right, false);
                    return;
                }
                self.compile_expr(left, true);
                self.compile_expr(right, true);
                let op_inst = match op {
                    BinaryOp::Add => Op::Add,
                    BinaryOp::Sub => Op::Sub,
                    BinaryOp::Mul => Op::Mul,
                    BinaryOp::Div => Op::Div,
                    BinaryOp::Mod => Op::Mod,
                    BinaryOp::Eq => Op::Eq,
                    BinaryOp::Ne => Op::Ne,
                    BinaryOp::Lt => Op::Lt,
                    BinaryOp::Le => Op::Le,
                    BinaryOp::Gt => Op::Gt,
                    BinaryOp::Ge => Op::Ge,
                    BinaryOp::And => Op::And,
                    BinaryOp::Or => Op::Or,
                };
                self.program.emit(op_inst);
            }

            Expr::Unary { op, operand } => {
                if !use_value {
                    self.compile_expr(operand, false);
                    return;
                }
                self.compile_expr(operand, true);
                let op_inst = match op {
                    UnaryOp::Not => Op::Not,
                };
                self.program.emit(op_inst);
            }
        }
    }
}
