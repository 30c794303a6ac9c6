//! UM-VM - register machine over an arena of platter arrays
//!
//! - Fixed 32-bit instruction word, 14 operators
//! - Eight general-purpose registers plus a program counter
//! - Arena of independently sized arrays; handle 0 holds the running program
//! - Byte-oriented I/O through pluggable providers

pub mod arena;
pub mod config;
pub mod decode;
pub mod error;
pub mod exec;
pub mod image;
pub mod opcode;
pub mod providers;
pub mod registers;

pub use arena::Arena;
pub use config::{MachineConfig, OutputPolicy};
pub use decode::{decode, Instr, Reg};
pub use error::{ExecError, Fault, ImageError, Result};
pub use exec::{Machine, MachineState, RunOutcome};
pub use image::ProgramImage;
pub use opcode::Opcode;
pub use providers::{ByteSink, ByteSource, MemSink, MemSource, StreamSink, StreamSource};
pub use registers::Registers;

/// One 32-bit word: instruction, register value and array element alike.
pub type Platter = u32;
