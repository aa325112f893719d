//! Instruction set: handler trait, dispatch registry and one handler per opcode.

pub mod base;
pub mod registry;
pub mod registry_instructions;
pub mod arithmetic;
pub mod io;
pub mod comparison;
pub mod control_flow;
pub mod system;
