//! Linear numeric memory shared by the execution backends.

use crate::error::{Error, Result};

/// Value-addressable linear memory of double-precision cells.
///
/// One `Memory` instance backs every backend executing the same program and
/// may be reused across many runs. Nothing resets cells between runs; the
/// caller seeds inputs explicitly. Computed addresses are doubles truncated
/// toward zero; an address outside `0..len` is an error in every backend,
/// uniformly, so the backends stay observationally equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    cells: Vec<f64>,
}

impl Memory {
    /// Default cell count, comfortably above any index the sample programs
    /// use.
    pub const DEFAULT_CELLS: usize = 65_536;

    /// Create a memory of `cells` zero-initialized cells.
    pub fn new(cells: usize) -> Self {
        Self {
            cells: vec![0.0; cells],
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the memory has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read the cell at a computed double address (truncated toward zero).
    pub fn load(&self, index: f64) -> Result<f64> {
        self.read(truncate(index))
    }

    /// Write the cell at a computed double address (truncated toward zero).
    ///
    /// Returns the stored value, matching the result of a store expression.
    pub fn store(&mut self, index: f64, value: f64) -> Result<f64> {
        self.write(truncate(index), value)?;
        Ok(value)
    }

    /// Read a cell by integer address.
    pub fn read(&self, cell: i64) -> Result<f64> {
        usize::try_from(cell)
            .ok()
            .and_then(|cell| self.cells.get(cell).copied())
            .ok_or(Error::MemoryOutOfRange {
                index: cell,
                len: self.cells.len(),
            })
    }

    /// Write a cell by integer address.
    pub fn write(&mut self, cell: i64, value: f64) -> Result<()> {
        let len = self.cells.len();
        let slot = usize::try_from(cell)
            .ok()
            .and_then(|cell| self.cells.get_mut(cell))
            .ok_or(Error::MemoryOutOfRange { index: cell, len })?;
        *slot = value;
        Ok(())
    }

    /// All cells, for seeding and final-state comparison.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELLS)
    }
}

/// Truncate a computed address toward zero.
///
/// NaN truncates to 0 and out-of-range magnitudes saturate, both of which
/// land on the bounds check rather than undefined behavior.
fn truncate(index: f64) -> i64 {
    index as i64
}
