//! Instruction registry: fixed dispatch table indexed by opcode.

use crate::config::DISPATCH_TABLE_SIZE;
use crate::instructions::base::InstructionHandler;
use crate::types::Word;

/// Central registry mapping opcodes to instruction handlers.
pub struct InstructionRegistry {
    handlers: [Option<Box<dyn InstructionHandler>>; DISPATCH_TABLE_SIZE],
}

impl InstructionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: std::array::from_fn(|_| None),
        }
    }

    /// Install a handler in its opcode slot, replacing any previous one.
    pub fn register(&mut self, handler: Box<dyn InstructionHandler>) {
        let slot = usize::from(handler.opcode());
        if let Some(entry) = self.handlers.get_mut(slot) {
            *entry = Some(handler);
        }
    }

    /// Handler for a decoded opcode; `None` for negative, out-of-table or unassigned opcodes.
    #[must_use]
    pub fn get_handler(&self, opcode: Word) -> Option<&dyn InstructionHandler> {
        let slot = usize::try_from(opcode).ok()?;
        self.handlers.get(slot)?.as_deref()
    }

    #[must_use]
    pub fn has_handler(&self, opcode: Word) -> bool {
        self.get_handler(opcode).is_some()
    }

    #[must_use]
    pub fn registered_opcodes(&self) -> Vec<u8> {
        self.handlers
            .iter()
            .flatten()
            .map(|handler| handler.opcode())
            .collect()
    }
}

impl Default for InstructionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
