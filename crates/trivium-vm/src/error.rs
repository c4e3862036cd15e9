//! Execution errors for the bytecode backend.

use thiserror::Error;

/// Result type alias for bytecode validation and execution.
pub type Result<T> = std::result::Result<T, ExecError>;

/// Errors raised while validating or executing a program.
///
/// A program produced by the compiler triggers none of these; they exist for
/// hand-assembled programs and as a backstop against compiler bugs. Unknown
/// opcodes are unrepresentable in the instruction encoding, so the invalid
/// program case reduces to out-of-range jump targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecError {
    /// A jump instruction targets an index outside the program.
    #[error("invalid program: jump target {target} outside program of length {len}")]
    InvalidProgram {
        /// The requested jump target.
        target: i64,
        /// The program length; targets in `0..=len` are valid.
        len: usize,
    },

    /// Pop from an empty operand stack.
    #[error("stack corruption: pop from empty operand stack")]
    StackUnderflow,

    /// Push beyond the operand stack capacity.
    #[error("stack corruption: operand stack capacity {capacity} exceeded")]
    StackOverflow {
        /// The fixed stack capacity that was exceeded.
        capacity: usize,
    },

    /// Memory access outside the cell array.
    #[error(transparent)]
    Memory(#[from] trivium_expr::Error),
}
