//! Machine configuration: opcode table, parameter modes, decode constants and runtime options.

use crate::types::Word;

// ============================================================================
// Opcodes
// ============================================================================
pub const OPCODE_ADD: u8 = 1;
pub const OPCODE_MULTIPLY: u8 = 2;
pub const OPCODE_INPUT: u8 = 3;
pub const OPCODE_OUTPUT: u8 = 4;
pub const OPCODE_JUMP_IF_TRUE: u8 = 5;
pub const OPCODE_JUMP_IF_FALSE: u8 = 6;
pub const OPCODE_LESS_THAN: u8 = 7;
pub const OPCODE_EQUALS: u8 = 8;
pub const OPCODE_ADJUST_RELATIVE_BASE: u8 = 9;
pub const OPCODE_HALT: u8 = 99;

// ============================================================================
// Parameter modes
// ============================================================================
pub const MODE_POSITION: u8 = 0;
pub const MODE_IMMEDIATE: u8 = 1;
pub const MODE_RELATIVE: u8 = 2;

// ============================================================================
// Decode
// ============================================================================
/// Opcode = cell mod 100; the quotient carries the mode digits.
pub const OPCODE_DIVISOR: Word = 100;
/// One decimal digit per parameter mode, least significant first.
pub const MODE_DIVISOR: Word = 10;
/// Widest instruction (add, multiply, less-than, equals).
pub const MAX_PARAMETERS: usize = 3;
/// Dispatch table covers every value of `cell mod 100`.
pub const DISPATCH_TABLE_SIZE: usize = 100;

// ============================================================================
// Memory
// ============================================================================
/// Upper bound on memory growth (2^24 cells, 128 MiB of words). Addresses at or past it fault.
pub const MAX_MEMORY_CELLS: usize = 1 << 24;

// ============================================================================
// Runtime options
// ============================================================================

/// Per-machine options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Reject immediate mode on write-target parameters with `UnknownMode`.
    /// When false the operand itself is used as the address, like position mode.
    pub strict_write_modes: bool,
}

impl MachineConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict_write_modes: false,
        }
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict_write_modes: true,
        }
    }

    #[must_use]
    pub const fn with_strict_write_modes(mut self, strict: bool) -> Self {
        self.strict_write_modes = strict;
        self
    }
}

/// Mnemonic for an opcode number, `None` when the opcode is not part of the instruction set.
#[must_use]
pub const fn opcode_name(opcode: u8) -> Option<&'static str> {
    match opcode {
        OPCODE_ADD => Some("ADD"),
        OPCODE_MULTIPLY => Some("MUL"),
        OPCODE_INPUT => Some("IN"),
        OPCODE_OUTPUT => Some("OUT"),
        OPCODE_JUMP_IF_TRUE => Some("JNZ"),
        OPCODE_JUMP_IF_FALSE => Some("JZ"),
        OPCODE_LESS_THAN => Some("LT"),
        OPCODE_EQUALS => Some("EQ"),
        OPCODE_ADJUST_RELATIVE_BASE => Some("ARB"),
        OPCODE_HALT => Some("HALT"),
        _ => None,
    }
}
