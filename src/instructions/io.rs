//! Queue instructions: IN (3), OUT (4).

use crate::config::{OPCODE_INPUT, OPCODE_OUTPUT};
use crate::error::MachineError;
use crate::instructions::base::InstructionHandler;
use crate::types::{InstructionContext, InstructionResult};

/// IN (opcode 3): mem[dst] = next queued input. Blocks without consuming anything when the queue is empty.
pub struct InputInstruction;

impl InputInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for InputInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_INPUT
    }

    fn name(&self) -> &'static str {
        "IN"
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn write_target(&self) -> Option<usize> {
        Some(0)
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        let Some(&value) = context.input.front() else {
            return Ok(InstructionResult::Block);
        };
        context.write(0, value)?;
        context.input.pop_front();
        Ok(InstructionResult::Continue)
    }
}

impl Default for InputInstruction {
    fn default() -> Self {
        Self::new()
    }
}

/// OUT (opcode 4): append a to the output queue.
pub struct OutputInstruction;

impl OutputInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for OutputInstruction {
    fn opcode(&self) -> u8 {
        OPCODE_OUTPUT
    }

    fn name(&self) -> &'static str {
        "OUT"
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult, MachineError> {
        let value = context.read(0)?;
        context.output.push_back(value);
        Ok(InstructionResult::Continue)
    }
}

impl Default for OutputInstruction {
    fn default() -> Self {
        Self::new()
    }
}
