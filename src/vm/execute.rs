//! The Intcode computer.
//!
//! Implements the fetch-decode-execute cycle over sparse memory, the
//! three addressing modes, and the control surface (`step`, `run`,
//! `step_until`, `reset`, `load`) used to drive it.

use crate::vm::decode::{decode, DecodeError, Mode, Op};
use crate::vm::io::{Handoff, Io, IoError};
use crate::vm::memory::Memory;
use crate::vm::parser::{parse, ParseError};
use crate::vm::registers::Registers;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Computer execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmState {
    /// Executing normally.
    Running,
    /// Executed the halt instruction. Terminal until `reset`/`load`.
    Halted,
    /// Stopped on a fatal error; memory and registers may be
    /// mid-instruction and must not be stepped further.
    Error,
}

/// An Intcode virtual machine instance.
///
/// Owns one memory image, the position registers, and exactly one I/O
/// strategy fixed for the instance's lifetime. The as-loaded program is
/// kept as the source of truth for `reset`.
pub struct Computer {
    program: Vec<i64>,
    /// Working memory image.
    pub mem: Memory,
    /// Instruction pointer and relative base.
    pub regs: Registers,
    /// Current execution state.
    pub state: VmState,
    /// Instructions executed since the last reset.
    pub cycles: u64,
    io: Io,
}

impl Computer {
    /// Construct with the synchronous console strategy.
    pub fn new(program: &str) -> Result<Self, ParseError> {
        Self::with_io(program, Io::console())
    }

    /// Construct with the blocking-handoff strategy, returning the
    /// caller-side endpoints alongside the computer.
    pub fn buffered(program: &str) -> Result<(Self, Handoff), ParseError> {
        let (io, handoff) = Io::channel();
        Ok((Self::with_io(program, io)?, handoff))
    }

    /// Construct with the FIFO queue strategy.
    pub fn queued(program: &str) -> Result<Self, ParseError> {
        Self::with_io(program, Io::queue())
    }

    /// Construct with an explicit I/O strategy.
    pub fn with_io(program: &str, io: Io) -> Result<Self, ParseError> {
        let codes = parse(program)?;
        let mem = Memory::load(&codes);
        Ok(Self {
            program: codes,
            mem,
            regs: Registers::new(),
            state: VmState::Running,
            cycles: 0,
            io,
        })
    }

    /// Reinitialize registers and memory from the as-loaded program.
    ///
    /// The I/O strategy survives, including any buffered-but-unconsumed
    /// queue values.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem = Memory::load(&self.program);
        self.state = VmState::Running;
        self.cycles = 0;
    }

    /// Replace the program and reset.
    pub fn load(&mut self, program: &str) -> Result<(), VmError> {
        self.program = parse(program)?;
        self.reset();
        Ok(())
    }

    /// Execute exactly one instruction.
    ///
    /// Operand resolution advances the cursor before a later
    /// parameter's error can surface, so a failed step may leave the
    /// cursor mid-instruction; any such error (except a refillable
    /// empty input queue) poisons the instance, which then refuses
    /// further steps.
    pub fn step(&mut self) -> Result<Op, VmError> {
        if self.state != VmState::Running {
            return Err(VmError::NotRunning(self.state));
        }

        match self.execute() {
            Ok(op) => {
                self.cycles += 1;
                Ok(op)
            }
            Err(err) => {
                // An empty input queue fails before any register or
                // memory mutation; the caller may refill and retry.
                if !matches!(err, VmError::Io(IoError::EmptyInput)) {
                    self.state = VmState::Error;
                }
                Err(err)
            }
        }
    }

    /// Step until the next instruction's operation is in `breakpoints`,
    /// returning it without executing it.
    ///
    /// Supports deterministic co-routining between cooperating
    /// instances.
    pub fn step_until(&mut self, breakpoints: &[Op]) -> Result<Op, VmError> {
        loop {
            if self.state != VmState::Running {
                return Err(VmError::NotRunning(self.state));
            }
            let raw = self.mem.read(self.regs.position);
            let next = match decode(raw) {
                Ok(opcode) => opcode.op,
                Err(err) => {
                    self.state = VmState::Error;
                    return Err(err.into());
                }
            };
            if breakpoints.contains(&next) {
                return Ok(next);
            }
            self.step()?;
        }
    }

    /// Run until halted and return the final memory snapshot.
    pub fn run(&mut self) -> Result<&Memory, VmError> {
        while self.state == VmState::Running {
            self.step()?;
        }
        Ok(&self.mem)
    }

    /// Run until halted, then reset. Useful when an instance is reused
    /// across multiple I/O wiring passes.
    pub fn run_and_reset(&mut self) -> Result<(), VmError> {
        self.run()?;
        self.reset();
        Ok(())
    }

    /// Drive the bound strategy externally: append one input value.
    pub fn input(&mut self, value: i64) -> Result<(), VmError> {
        Ok(self.io.push_input(value)?)
    }

    /// Drive the bound strategy externally: take one output value.
    pub fn output(&mut self) -> Result<i64, VmError> {
        Ok(self.io.pop_output()?)
    }

    /// Check if the computer executed the halt instruction.
    pub fn is_halted(&self) -> bool {
        self.state == VmState::Halted
    }

    /// Check if the computer can execute further steps.
    pub fn is_running(&self) -> bool {
        self.state == VmState::Running
    }

    /// Fetch-decode-execute one instruction.
    fn execute(&mut self) -> Result<Op, VmError> {
        let raw = self.mem.read(self.regs.position);
        let opcode = decode(raw)?;
        let modes = opcode.modes;

        match opcode.op {
            Op::Add => {
                let a = self.operand(modes[0]);
                let b = self.operand(modes[1]);
                self.store(modes[2], a + b)?;
                self.regs.advance();
            }

            Op::Mul => {
                let a = self.operand(modes[0]);
                let b = self.operand(modes[1]);
                self.store(modes[2], a * b)?;
                self.regs.advance();
            }

            Op::Input => {
                let value = self.io.provide()?;
                self.store(modes[0], value)?;
                self.regs.advance();
            }

            Op::Output => {
                let value = self.operand(modes[0]);
                self.io.consume(value)?;
                self.regs.advance();
            }

            Op::JumpIfTrue => {
                let check = self.operand(modes[0]);
                let target = self.operand(modes[1]);
                if check != 0 {
                    self.regs.jump(target);
                } else {
                    self.regs.advance();
                }
            }

            Op::JumpIfFalse => {
                let check = self.operand(modes[0]);
                let target = self.operand(modes[1]);
                if check == 0 {
                    self.regs.jump(target);
                } else {
                    self.regs.advance();
                }
            }

            Op::LessThan => {
                let a = self.operand(modes[0]);
                let b = self.operand(modes[1]);
                self.store(modes[2], i64::from(a < b))?;
                self.regs.advance();
            }

            Op::Equals => {
                let a = self.operand(modes[0]);
                let b = self.operand(modes[1]);
                self.store(modes[2], i64::from(a == b))?;
                self.regs.advance();
            }

            Op::AdjustRelativeBase => {
                let offset = self.operand(modes[0]);
                self.regs.adjust_relative(offset);
                self.regs.advance();
            }

            Op::Halt => {
                self.state = VmState::Halted;
            }
        }

        Ok(opcode.op)
    }

    /// Advance the cursor and read the cell it lands on.
    fn fetch(&mut self) -> i64 {
        self.regs.advance();
        self.mem.read(self.regs.position)
    }

    /// Resolve the next parameter to its effective value.
    fn operand(&mut self, mode: Mode) -> i64 {
        match mode {
            Mode::Position => {
                let addr = self.fetch();
                self.mem.read(addr)
            }
            Mode::Immediate => self.fetch(),
            Mode::Relative => {
                let offset = self.fetch();
                self.mem.read(self.regs.relative(offset))
            }
        }
    }

    /// Resolve the next parameter to a write address and store `value`.
    fn store(&mut self, mode: Mode, value: i64) -> Result<(), VmError> {
        match mode {
            Mode::Position => {
                let addr = self.fetch();
                self.mem.write(addr, value);
                Ok(())
            }
            Mode::Immediate => Err(VmError::ImmediateWrite {
                position: self.regs.position,
            }),
            Mode::Relative => {
                let offset = self.fetch();
                self.mem.write(self.regs.relative(offset), value);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for Computer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computer")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .field("mem", &self.mem)
            .field("io", &self.io)
            .finish()
    }
}

/// Errors that can occur while driving a computer.
#[derive(Debug, Clone, Error)]
pub enum VmError {
    #[error("computer is not running: {0:?}")]
    NotRunning(VmState),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("i/o error: {0}")]
    Io(#[from] IoError),

    #[error("immediate mode is illegal as a write target (instruction at {position})")]
    ImmediateWrite { position: i64 },
}
