//! Instruction decoder.
//!
//! A raw instruction is a decimal-encoded integer: the two
//! least-significant digits are the operation code, the remaining
//! higher-order digits select the addressing mode of each parameter,
//! least-significant digit first. Missing digits are zero, so `1102`
//! decodes to ADD with modes `[Immediate, Immediate, Position]`.
//!
//! The halt sentinel `99` is special-cased: it decodes as-is with no
//! mode digits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Parameter is a pointer into memory.
    Position,
    /// Parameter is the literal value. Illegal as a write target.
    Immediate,
    /// Parameter is an offset from the relative base, then a pointer.
    Relative,
}

impl Mode {
    /// Create from a mode digit.
    pub fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(Mode::Position),
            1 => Some(Mode::Immediate),
            2 => Some(Mode::Relative),
            _ => None,
        }
    }

    /// The decimal digit encoding this mode.
    pub fn digit(self) -> i64 {
        match self {
            Mode::Position => 0,
            Mode::Immediate => 1,
            Mode::Relative => 2,
        }
    }
}

/// The Intcode operation set.
///
/// Fixed and closed; dispatch is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Add,
    Mul,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    AdjustRelativeBase,
    Halt,
}

impl Op {
    /// Every operation, in code order.
    pub const ALL: [Op; 10] = [
        Op::Add,
        Op::Mul,
        Op::Input,
        Op::Output,
        Op::JumpIfTrue,
        Op::JumpIfFalse,
        Op::LessThan,
        Op::Equals,
        Op::AdjustRelativeBase,
        Op::Halt,
    ];

    /// Look up an operation by its code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Op::Add),
            2 => Some(Op::Mul),
            3 => Some(Op::Input),
            4 => Some(Op::Output),
            5 => Some(Op::JumpIfTrue),
            6 => Some(Op::JumpIfFalse),
            7 => Some(Op::LessThan),
            8 => Some(Op::Equals),
            9 => Some(Op::AdjustRelativeBase),
            99 => Some(Op::Halt),
            _ => None,
        }
    }

    /// The operation code.
    pub fn code(self) -> i64 {
        match self {
            Op::Add => 1,
            Op::Mul => 2,
            Op::Input => 3,
            Op::Output => 4,
            Op::JumpIfTrue => 5,
            Op::JumpIfFalse => 6,
            Op::LessThan => 7,
            Op::Equals => 8,
            Op::AdjustRelativeBase => 9,
            Op::Halt => 99,
        }
    }

    /// The number of parameters the operation consumes.
    pub fn arity(self) -> usize {
        match self {
            Op::Add | Op::Mul | Op::LessThan | Op::Equals => 3,
            Op::JumpIfTrue | Op::JumpIfFalse => 2,
            Op::Input | Op::Output | Op::AdjustRelativeBase => 1,
            Op::Halt => 0,
        }
    }
}

/// A decoded instruction: operation plus one addressing mode per
/// parameter, in parameter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub op: Op,
    pub modes: Vec<Mode>,
}

/// Decode a raw fetched instruction value.
pub fn decode(raw: i64) -> Result<Opcode, DecodeError> {
    if raw == Op::Halt.code() {
        return Ok(Opcode {
            op: Op::Halt,
            modes: Vec::new(),
        });
    }

    let code = raw % 100;
    let op = match Op::from_code(code) {
        // Halt only decodes as the bare sentinel; 1199 is not a halt
        Some(op) if op != Op::Halt => op,
        _ => return Err(DecodeError::UnknownOpcode { raw, code }),
    };

    let mut digits = raw / 100;
    let mut modes = Vec::with_capacity(op.arity());
    for _ in 0..op.arity() {
        let digit = digits % 10;
        let mode =
            Mode::from_digit(digit).ok_or(DecodeError::InvalidMode { raw, digit })?;
        modes.push(mode);
        digits /= 10;
    }

    Ok(Opcode { op, modes })
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown operation code {code} in instruction {raw}")]
    UnknownOpcode { raw: i64, code: i64 },

    #[error("unrecognized mode digit {digit} in instruction {raw}")]
    InvalidMode { raw: i64, digit: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_halt_sentinel() {
        let opcode = decode(99).unwrap();
        assert_eq!(opcode.op, Op::Halt);
        assert!(opcode.modes.is_empty());
    }

    #[test]
    fn test_decode_1102() {
        let opcode = decode(1102).unwrap();
        assert_eq!(opcode.op, Op::Mul);
        assert_eq!(
            opcode.modes,
            vec![Mode::Immediate, Mode::Immediate, Mode::Position]
        );
    }

    #[test]
    fn test_decode_pads_missing_mode_digits() {
        let opcode = decode(1).unwrap();
        assert_eq!(opcode.op, Op::Add);
        assert_eq!(
            opcode.modes,
            vec![Mode::Position, Mode::Position, Mode::Position]
        );

        let opcode = decode(204).unwrap();
        assert_eq!(opcode.op, Op::Output);
        assert_eq!(opcode.modes, vec![Mode::Relative]);
    }

    #[test]
    fn test_decode_mode_order_is_parameter_order() {
        // Most significant digit belongs to the last parameter
        let opcode = decode(21101).unwrap();
        assert_eq!(opcode.op, Op::Add);
        assert_eq!(
            opcode.modes,
            vec![Mode::Immediate, Mode::Immediate, Mode::Relative]
        );
    }

    #[test]
    fn test_decode_respects_arity() {
        for op in Op::ALL {
            if op == Op::Halt {
                continue;
            }
            let opcode = decode(op.code()).unwrap();
            assert_eq!(opcode.op, op);
            assert_eq!(opcode.modes.len(), op.arity());
        }
    }

    #[test]
    fn test_decode_unknown_opcode() {
        assert_eq!(
            decode(42).unwrap_err(),
            DecodeError::UnknownOpcode { raw: 42, code: 42 }
        );
        assert_eq!(
            decode(-5).unwrap_err(),
            DecodeError::UnknownOpcode { raw: -5, code: -5 }
        );
    }

    #[test]
    fn test_decode_halt_with_mode_digits_is_unknown() {
        assert_eq!(
            decode(1199).unwrap_err(),
            DecodeError::UnknownOpcode { raw: 1199, code: 99 }
        );
    }

    #[test]
    fn test_decode_invalid_mode_digit() {
        assert_eq!(
            decode(302).unwrap_err(),
            DecodeError::InvalidMode { raw: 302, digit: 3 }
        );
    }

    #[test]
    fn test_mode_digit_roundtrip() {
        for mode in [Mode::Position, Mode::Immediate, Mode::Relative] {
            assert_eq!(Mode::from_digit(mode.digit()), Some(mode));
        }
    }

    #[test]
    fn test_code_roundtrip() {
        for op in Op::ALL {
            assert_eq!(Op::from_code(op.code()), Some(op));
        }
    }
}
