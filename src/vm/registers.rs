//! Computer position registers.
//!
//! An Intcode computer carries two registers:
//! - `position`: the instruction pointer, resting on the cell of the
//!   current opcode (or the next parameter to consume mid-instruction)
//! - `rposition`: the relative base added to Relative-mode parameters
//!   before dereferencing

use serde::{Deserialize, Serialize};

/// The Intcode register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Instruction pointer.
    pub position: i64,
    /// Relative base.
    pub rposition: i64,
}

impl Registers {
    /// Create a zeroed register file.
    pub fn new() -> Self {
        Self {
            position: 0,
            rposition: 0,
        }
    }

    /// Reset both registers to zero.
    pub fn reset(&mut self) {
        self.position = 0;
        self.rposition = 0;
    }

    /// Advance the instruction pointer by one cell.
    #[inline]
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Set the instruction pointer to an absolute address.
    pub fn jump(&mut self, addr: i64) {
        self.position = addr;
    }

    /// Shift the relative base by a signed offset.
    pub fn adjust_relative(&mut self, offset: i64) {
        self.rposition += offset;
    }

    /// Resolve a Relative-mode parameter to an absolute address.
    #[inline]
    pub fn relative(&self, offset: i64) -> i64 {
        self.rposition + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut regs = Registers::new();
        regs.advance();
        regs.advance();
        assert_eq!(regs.position, 2);
    }

    #[test]
    fn test_jump() {
        let mut regs = Registers::new();
        regs.advance();
        regs.jump(40);
        assert_eq!(regs.position, 40);
    }

    #[test]
    fn test_relative_base() {
        let mut regs = Registers::new();
        regs.adjust_relative(2000);
        regs.adjust_relative(19);
        assert_eq!(regs.rposition, 2019);
        assert_eq!(regs.relative(-34), 1985);
    }

    #[test]
    fn test_negative_base_positive_offset() {
        let mut regs = Registers::new();
        regs.adjust_relative(-50);
        assert_eq!(regs.relative(60), 10);
    }

    #[test]
    fn test_reset() {
        let mut regs = Registers::new();
        regs.jump(12);
        regs.adjust_relative(7);
        regs.reset();
        assert_eq!(regs, Registers::new());
    }
}
