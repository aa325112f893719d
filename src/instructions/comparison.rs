//! Comparison instructions: LT (7), EQ (8). Both store 1 or 0.

use crate::config::{OPCODE_EQUALS, OPCODE_LESS_THAN};
use crate::error::MachineError;
use crate::instructions::base::InstructionHandler;
use crate::types::{InstructionContext, InstructionResult, Word};

fn flag(condition: bool) -> Word {
    Word::from(condition)
}

// --- LT (7) ---
pub struct LessThanInstruction;

impl LessThanInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for LessThanInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_LESS_THAN
    }

    fn name(&self) -> &'static str {
        "LT"
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
        context.write(2, flag(a < b))?;
        Ok(InstructionResult::Continue)
    }
}

impl Default for LessThanInstruction {
    fn default() -> Self {
        Self::new()
    }
}

// --- EQ (8) ---
pub struct EqualsInstruction;

impl EqualsInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for EqualsInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_EQUALS
    }

    fn name(&self) -> &'static str {
        "EQ"
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
        context.write(2, flag(a == b))?;
        Ok(InstructionResult::Continue)
    }
}

impl Default for EqualsInstruction {
    fn default() -> Self {
        Self::new()
    }
}
