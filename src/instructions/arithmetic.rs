//! Arithmetic instructions: ADD (1), MUL (2).

use crate::config::{OPCODE_ADD, OPCODE_MULTIPLY};
use crate::error::MachineError;
use crate::instructions::base::InstructionHandler;
use crate::types::{InstructionContext, InstructionResult};

/// ADD (opcode 1): mem[dst] = a + b.
pub struct AddInstruction;

impl AddInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for AddInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_ADD
    }

    fn name(&self) -> &'static str {
        "ADD"
    }

    fn parameter_count(&self) -> usize {
        3
    }

    fn write_target(&self) -> Option<usize> {
        Some(2)
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        let a = context.read(0)?;
        let b = context.read(1)?;
        let sum = a.checked_add(b).ok_or(MachineError::ArithmeticOverflow {
            pointer: context.pointer,
        })?;
        context.write(2, sum)?;
        Ok(InstructionResult::Continue)
    }
}

impl Default for AddInstruction {
    fn default() -> Self {
        Self::new()
    }
}

/// MUL (opcode 2): mem[dst] = a * b.
pub struct MultiplyInstruction;

impl MultiplyInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for MultiplyInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_MULTIPLY
    }

    fn name(&self) -> &'static str {
        "MUL"
    }

    fn parameter_count(&self) -> usize {
        3
    }

    fn write_target(&self) -> Option<usize> {
        Some(2)
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        let a = context.read(0)?;
        let b = context.read(1)?;
        let product = a.checked_mul(b).ok_or(MachineError::ArithmeticOverflow {
            pointer: context.pointer,
        })?;
        context.write(2, product)?;
        Ok(InstructionResult::Continue)
    }
}

impl Default for MultiplyInstruction {
    fn default() -> Self {
        Self::new()
    }
}
