//! Intcode machine: a small resumable interpreter for programs encoded as comma-separated integers.
//!
//! Load a program, queue inputs, [`Machine::run`] until the machine halts or blocks on input,
//! then inspect memory and output. Machines share nothing, so callers can wire several
//! together by moving one machine's output into another's input between runs.
//! With the `napi` feature the same surface is exported to Node as `IntcodeMachine`.

pub mod config;
pub mod disassembler;
pub mod error;
pub mod instructions;
pub mod machine;
pub mod memory;
pub mod parser;
pub mod types;

#[cfg(feature = "napi")]
mod bindings;

pub use config::MachineConfig;
pub use disassembler::disassemble;
pub use error::{MachineError, ParseError};
pub use machine::Machine;
pub use parser::parse_program;
pub use types::{Status, Word};
