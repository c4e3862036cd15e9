//! Static program validation.
//!
//! The executor checks every jump target as it runs; validation performs the
//! same checks up front so a malformed program can be rejected before any
//! memory mutation happens. Programs produced by the compiler always pass.

use crate::bytecode::{Op, Program};
use crate::error::{ExecError, Result};

impl Program {
    /// Check that every jump target lands inside the program.
    ///
    /// A target equal to the program length is a legal jump to the end.
    /// Only the first violation is reported.
    pub fn validate(&self) -> Result<()> {
        let len = self.len();
        for op in self.ops() {
            if let Op::Jmp(target) | Op::PopJmpIfFalse(target) | Op::PopJmpIfTrue(target) = *op {
                if target < 0 || target as usize > len {
                    return Err(ExecError::InvalidProgram {
                        target: target as i64,
                        len,
                    });
                }
            }
        }
        Ok(())
    }
}
