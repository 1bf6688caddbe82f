//! # Intcode VM
//!
//! A virtual machine for the integer-encoded Intcode instruction set:
//! a fetch-decode-execute loop over sparse, auto-extending memory with
//! three addressing modes (position, immediate, relative) and a
//! pluggable input/output boundary.
//!
//! ```
//! use intcode::Computer;
//!
//! let mut computer = Computer::queued("1,9,10,3,2,3,11,0,99,30,40,50").unwrap();
//! computer.run().unwrap();
//! assert_eq!(computer.mem.read(0), 3500);
//! ```

pub mod vm;

// Re-export commonly used types
pub use vm::{
    decode, parse, Computer, DecodeError, Handoff, Io, IoError, Memory, Mode, Op, Opcode,
    ParseError, Registers, VmError, VmState,
};
