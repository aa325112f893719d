//! Conditional jumps: JNZ (5), JZ (6).
//!
//! The target parameter is only resolved when the jump is taken.

use crate::config::{OPCODE_JUMP_IF_FALSE, OPCODE_JUMP_IF_TRUE};
use crate::error::MachineError;
use crate::instructions::base::InstructionHandler;
use crate::types::{InstructionContext, InstructionResult};

/// JNZ (opcode 5): if a != 0, pointer = b.
pub struct JumpIfTrueInstruction;

impl JumpIfTrueInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for JumpIfTrueInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_JUMP_IF_TRUE
    }

    fn name(&self) -> &'static str {
        "JNZ"
    }

    fn parameter_count(&self) -> usize {
        2
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        if context.read(0)? == 0 {
            return Ok(InstructionResult::Continue);
        }
        let target = context.read(1)?;
        context.jump(target)
    }
}

impl Default for JumpIfTrueInstruction {
    fn default() -> Self {
        Self::new()
    }
}

/// JZ (opcode 6): if a == 0, pointer = b.
pub struct JumpIfFalseInstruction;

impl JumpIfFalseInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for JumpIfFalseInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_JUMP_IF_FALSE
    }

    fn name(&self) -> &'static str {
        "JZ"
    }

    fn parameter_count(&self) -> usize {
        2
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        if context.read(0)? != 0 {
            return Ok(InstructionResult::Continue);
        }
        let target = context.read(1)?;
        context.jump(target)
    }
}

impl Default for JumpIfFalseInstruction {
    fn default() -> Self {
        Self::new()
    }
}
