//! Linear disassembly of a memory image.

use crate::instructions::base::{decode_modes, decode_opcode};
use crate::instructions::registry_instructions::get_registry;
use crate::types::Word;

/// Walk `program` from address 0, one instruction at a time. Cells that do not start a known
/// instruction (or whose parameters run past the end) are listed as `DATA n` and skipped singly.
#[must_use]
pub fn disassemble(program: &[Word]) -> Vec<(usize, String)> {
    let registry = get_registry();
    let mut lines = Vec::new();
    let mut address = 0;
    while let Some(&cell) = program.get(address) {
        let decoded = registry
            .get_handler(decode_opcode(cell))
            .and_then(|handler| {
                let end = address + 1 + handler.parameter_count();
                let operands = program.get(address + 1..end)?;
                Some((handler.disassemble(&decode_modes(cell), operands), end))
            });
        match decoded {
            Some((text, end)) => {
                lines.push((address, text));
                address = end;
            }
            None => {
                lines.push((address, format!("DATA {cell}")));
                address += 1;
            }
        }
    }
    lines
}
