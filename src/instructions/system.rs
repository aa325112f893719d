//! System instructions: ARB (9), HALT (99).

use crate::config::{OPCODE_ADJUST_RELATIVE_BASE, OPCODE_HALT};
use crate::error::MachineError;
use crate::instructions::base::InstructionHandler;
use crate::types::{InstructionContext, InstructionResult};

/// ARB (opcode 9): relative base += a.
pub struct AdjustRelativeBaseInstruction;

impl AdjustRelativeBaseInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for AdjustRelativeBaseInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_ADJUST_RELATIVE_BASE
    }

    fn name(&self) -> &'static str {
        "ARB"
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        let delta = context.read(0)?;
        let base = context
            .relative_base
            .checked_add(delta)
            .ok_or(MachineError::ArithmeticOverflow {
                pointer: context.pointer,
            })?;
        *context.relative_base = base;
        Ok(InstructionResult::Continue)
    }
}

impl Default for AdjustRelativeBaseInstruction {
    fn default() -> Self {
        Self::new()
    }
}

/// HALT (opcode 99): terminate normally.
pub struct HaltInstruction;

impl HaltInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for HaltInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_HALT
    }

    fn name(&self) -> &'static str {
        "HALT"
    }

    fn parameter_count(&self) -> usize {
        0
    }

    fn execute(&self, _context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        Ok(InstructionResult::Halt)
    }
}

impl Default for HaltInstruction {
    fn default() -> Self {
        Self::new()
    }
}
