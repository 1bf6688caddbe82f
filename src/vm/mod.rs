//! The Intcode virtual machine.
//!
//! This module implements the complete engine:
//! - sparse, auto-extending integer memory
//! - the ten-operation instruction set with three addressing modes
//! - three mutually exclusive I/O strategies (console, blocking
//!   handoff, FIFO queue)

pub mod parser;
pub mod memory;
pub mod registers;
pub mod decode;
pub mod io;
pub mod execute;

pub use parser::{parse, ParseError};
pub use memory::Memory;
pub use registers::Registers;
pub use decode::{decode, DecodeError, Mode, Op, Opcode};
pub use io::{Handoff, Io, IoError};
pub use execute::{Computer, VmError, VmState};
