//! Register all instruction handlers into the registry.

use super::arithmetic::{AddInstruction, MultiplyInstruction};
use super::comparison::{EqualsInstruction, LessThanInstruction};
use super::control_flow::{JumpIfFalseInstruction, JumpIfTrueInstruction};
use super::io::{InputInstruction, OutputInstruction};
use super::registry::InstructionRegistry;
use super::system::{AdjustRelativeBaseInstruction, HaltInstruction};

pub fn register_all_instructions(registry: &mut InstructionRegistry) {
    registry.register(Box::new(AddInstruction::new()));
    registry.register(Box::new(MultiplyInstruction::new()));
    registry.register(Box::new(InputInstruction::new()));
    registry.register(Box::new(OutputInstruction::new()));
    registry.register(Box::new(JumpIfTrueInstruction::new()));
    registry.register(Box::new(JumpIfFalseInstruction::new()));
    registry.register(Box::new(LessThanInstruction::new()));
    registry.register(Box::new(EqualsInstruction::new()));
    registry.register(Box::new(AdjustRelativeBaseInstruction::new()));
    registry.register(Box::new(HaltInstruction::new()));
}

/// Process-wide registry with the full instruction set, built on first use.
pub fn get_registry() -> &'static InstructionRegistry {
    use std::sync::OnceLock;
    static REGISTRY: OnceLock<InstructionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut r = InstructionRegistry::new();
        register_all_instructions(&mut r);
        r
    })
}
