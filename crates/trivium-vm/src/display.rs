//! Human-readable disassembly.
//!
//! One indexed instruction per line, for debugging compiler output. The
//! layout is for humans; no parseable format is promised.

use std::fmt;

use crate::bytecode::{Op, Program};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, op) in self.ops().iter().enumerate() {
            writeln!(f, "{i:>6} {op}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::Noop => write!(f, "NOOP"),
            Op::Push(value) => write!(f, "PUSH              {value}"),
            Op::Pop => write!(f, "POP"),
            Op::Get(cell) => write!(f, "GET               {cell}"),
            Op::Set(cell) => write!(f, "SET               {cell}"),
            Op::GetIndirect => write!(f, "GET_INDIRECT"),
            Op::SetIndirect => write!(f, "SET_INDIRECT"),
            Op::Jmp(target) => write!(f, "JMP               {target}"),
            Op::PopJmpIfFalse(target) => write!(f, "POP_JMP_IF_FALSE  {target}"),
            Op::PopJmpIfTrue(target) => write!(f, "POP_JMP_IF_TRUE   {target}"),
            Op::Add => write!(f, "ADD"),
            Op::Sub => write!(f, "SUB"),
            Op::Mul => write!(f, "MUL"),
            Op::Div => write!(f, "DIV"),
            Op::Mod => write!(f, "MOD"),
            Op::Eq => write!(f, "EQ"),
            Op::Ne => write!(f, "NEQ"),
            Op::Lt => write!(f, "LT"),
            Op::Gt => write!(f, "GT"),
            Op::Le => write!(f, "LTE"),
            Op::Ge => write!(f, "GTE"),
            Op::And => write!(f, "AND"),
            Op::Or => write!(f, "OR"),
            Op::Not => write!(f, "NOT"),
        }
    }
}
