//! Error types for program execution.
//!
//! All three backends access cells through [`Memory`](crate::Memory) and
//! surface the same error on an out-of-range address, which keeps their
//! observable behavior aligned. Numeric edge cases (division by zero, modulo
//! by zero, overflow) are never errors; they produce IEEE-754 infinities or
//! NaN and flow through the program as values.

use thiserror::Error;

/// Result type alias for expression evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while executing a program against a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A load or store addressed a cell outside the memory.
    ///
    /// The index is the truncated integer address that was requested.
    /// Mutations made before the failing access remain visible.
    #[error("memory index {index} out of range (cells 0..{len})")]
    MemoryOutOfRange {
        /// The requested cell index after truncation toward zero.
        index: i64,
        /// The number of cells in the memory.
        len: usize,
    },
}
