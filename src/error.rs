//! Machine and program-parse errors.
//!
//! Every [`MachineError`] is fatal to the machine that raised it: the machine moves to
//! [`Status::Terminated`] and keeps the error for inspection before returning it to the
//! caller. [`ParseError`] is raised before any machine exists and never touches one.

use std::num::ParseIntError;

use thiserror::Error;

use crate::types::{Status, Word};

/// Machine result type.
pub type Result<T> = std::result::Result<T, MachineError>;

/// Abnormal termination causes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// An operation was invoked in a status that forbids it.
    #[error("cannot {operation} while {status}")]
    InvalidState {
        /// The rejected operation (`step`, `input`, `poke`).
        operation: &'static str,
        /// Status at the time of the call.
        status: Status,
    },

    /// A computed read, write or jump address was negative or beyond addressable memory.
    #[error("invalid address {address}")]
    InvalidAddress { address: Word },

    /// The instruction cell does not decode to a known opcode.
    #[error("unknown opcode {opcode} at {pointer}")]
    UnknownOpcode { opcode: Word, pointer: usize },

    /// A parameter mode digit is not position, immediate or relative,
    /// or immediate mode was used for a write target under strict write modes.
    #[error("unknown mode {mode} for parameter {parameter} at {pointer}")]
    UnknownMode {
        mode: Word,
        parameter: usize,
        pointer: usize,
    },

    /// Execution jumped back onto the instruction it just executed.
    #[error("infinite loop at {pointer}")]
    InfiniteLoop { pointer: usize },

    /// Arithmetic or address computation left the word range.
    #[error("arithmetic overflow at {pointer}")]
    ArithmeticOverflow { pointer: usize },
}

/// Malformed program text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid program token {index} ({token:?}): {source}")]
pub struct ParseError {
    /// Zero-based position of the token in the comma-separated list.
    pub index: usize,
    pub token: String,
    #[source]
    pub source: ParseIntError,
}
