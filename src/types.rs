//! Machine type definitions: word, status, parameter modes, instruction context.

use std::collections::VecDeque;
use std::fmt;

use crate::config::{MachineConfig, MAX_PARAMETERS, MODE_IMMEDIATE, MODE_POSITION, MODE_RELATIVE};
use crate::error::MachineError;
use crate::memory::Memory;

/// Machine integer. Memory cells, operands, inputs and outputs are all words.
pub type Word = i64;

// ============================================================================
// Execution status
// ============================================================================

/// Execution status. `Terminated` is absorbing; `Blocked` returns to `Ready` only through input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Ready,
    Blocked,
    Terminated,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Ready => "ready",
            Status::Blocked => "blocked",
            Status::Terminated => "terminated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parameter modes
// ============================================================================

/// Addressing mode of one parameter, taken from the instruction's decimal mode digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterMode {
    /// Operand is an address.
    Position,
    /// Operand is the value.
    Immediate,
    /// Operand plus relative base is an address.
    Relative,
}

impl ParameterMode {
    #[must_use]
    pub const fn from_digit(digit: Word) -> Option<Self> {
        if digit == MODE_POSITION as Word {
            Some(ParameterMode::Position)
        } else if digit == MODE_IMMEDIATE as Word {
            Some(ParameterMode::Immediate)
        } else if digit == MODE_RELATIVE as Word {
            Some(ParameterMode::Relative)
        } else {
            None
        }
    }
}

// ============================================================================
// Instruction execution result
// ============================================================================

/// What the machine does with the instruction pointer after a handler returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionResult {
    /// Advance past the instruction and its parameters.
    Continue,
    /// Pointer was set explicitly; leave it there.
    Jump(usize),
    /// Input queue empty; stay on this instruction.
    Block,
    /// Terminate normally.
    Halt,
}

// ============================================================================
// Instruction context
// ============================================================================

/// Interpreter state lent to a handler for the duration of one instruction.
pub struct InstructionContext<'a> {
    pub memory: &'a mut Memory,
    pub pointer: usize,
    pub relative_base: &'a mut Word,
    pub modes: [Word; MAX_PARAMETERS],
    pub input: &'a mut VecDeque<Word>,
    pub output: &'a mut VecDeque<Word>,
    pub config: MachineConfig,
}

impl InstructionContext<'_> {
    /// Raw operand cell of parameter `index` (0-based).
    pub fn operand(&mut self, index: usize) -> Result<Word, MachineError> {
        self.memory.read_at(self.pointer + index + 1)
    }

    fn mode(&self, index: usize) -> Result<ParameterMode, MachineError> {
        let digit = self.modes[index];
        ParameterMode::from_digit(digit).ok_or(MachineError::UnknownMode {
            mode: digit,
            parameter: index,
            pointer: self.pointer,
        })
    }

    fn relative(&self, operand: Word) -> Result<Word, MachineError> {
        operand
            .checked_add(*self.relative_base)
            .ok_or(MachineError::ArithmeticOverflow {
                pointer: self.pointer,
            })
    }

    /// Resolve parameter `index` to the value it denotes.
    pub fn read(&mut self, index: usize) -> Result<Word, MachineError> {
        let mode = self.mode(index)?;
        let operand = self.operand(index)?;
        match mode {
            ParameterMode::Position => self.memory.read(operand),
            ParameterMode::Immediate => Ok(operand),
            ParameterMode::Relative => {
                let address = self.relative(operand)?;
                self.memory.read(address)
            }
        }
    }

    /// Resolve write-target parameter `index` to the address it names.
    pub fn target(&mut self, index: usize) -> Result<Word, MachineError> {
        let mode = self.mode(index)?;
        let operand = self.operand(index)?;
        match mode {
            ParameterMode::Position => Ok(operand),
            ParameterMode::Relative => self.relative(operand),
            ParameterMode::Immediate if self.config.strict_write_modes => {
                Err(MachineError::UnknownMode {
                    mode: self.modes[index],
                    parameter: index,
                    pointer: self.pointer,
                })
            }
            ParameterMode::Immediate => {
                tracing::warn!(
                    pointer = self.pointer,
                    parameter = index,
                    operand,
                    "immediate-mode write target treated as position"
                );
                Ok(operand)
            }
        }
    }

    /// Store `value` at the address named by write-target parameter `index`.
    pub fn write(&mut self, index: usize, value: Word) -> Result<(), MachineError> {
        let address = self.target(index)?;
        self.memory.write(address, value)
    }

    /// Validate a jump destination.
    pub fn jump(&self, target: Word) -> Result<InstructionResult, MachineError> {
        let address = usize::try_from(target)
            .map_err(|_| MachineError::InvalidAddress { address: target })?;
        Ok(InstructionResult::Jump(address))
    }
}
