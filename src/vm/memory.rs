//! Sparse Intcode memory.
//!
//! Memory is a mapping from address to signed 64-bit value with no
//! capacity bound. Addresses that were never written read as zero, and
//! the first access to an unseen address (read or write) materializes
//! an explicit zero entry before the operation is applied.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse, auto-extending Intcode memory.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    cells: HashMap<i64, i64>,
}

impl Memory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    /// Create a memory image from a program, one code per address
    /// starting at 0.
    pub fn load(codes: &[i64]) -> Self {
        Self {
            cells: codes
                .iter()
                .enumerate()
                .map(|(addr, &code)| (addr as i64, code))
                .collect(),
        }
    }

    /// Materialize an address with a zero value if it has never been
    /// seen before.
    fn touch(&mut self, addr: i64) {
        self.cells.entry(addr).or_insert(0);
    }

    /// Read the value at an address, materializing zero on first access.
    #[inline]
    pub fn read(&mut self, addr: i64) -> i64 {
        self.touch(addr);
        self.cells[&addr]
    }

    /// Write a value to an address, materializing it first if unseen.
    #[inline]
    pub fn write(&mut self, addr: i64, value: i64) {
        self.touch(addr);
        self.cells.insert(addr, value);
    }

    /// The number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether no cell has been materialized.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Snapshot all materialized cells in ascending address order.
    pub fn dump(&self) -> Vec<(i64, i64)> {
        let mut cells: Vec<(i64, i64)> = self.cells.iter().map(|(&a, &v)| (a, v)).collect();
        cells.sort_unstable_by_key(|&(a, _)| a);
        cells
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only summarize; the full map can be arbitrarily large
        let non_zero = self.cells.values().filter(|&&v| v != 0).count();
        f.debug_struct("Memory")
            .field("cells", &self.cells.len())
            .field("non_zero_cells", &non_zero)
            .finish()
    }
}
