//! Instruction handler trait and decode helpers.

use crate::config::{MAX_PARAMETERS, MODE_DIVISOR, OPCODE_DIVISOR};
use crate::error::MachineError;
use crate::types::{InstructionContext, InstructionResult, ParameterMode, Word};

/// Opcode of an instruction cell: its low two decimal digits. Negative cells give negative opcodes.
#[must_use]
pub const fn decode_opcode(cell: Word) -> Word {
    cell % OPCODE_DIVISOR
}

/// Mode digits of an instruction cell, first parameter first. Digits past the third are ignored.
#[must_use]
pub fn decode_modes(cell: Word) -> [Word; MAX_PARAMETERS] {
    let mut rest = cell / OPCODE_DIVISOR;
    let mut modes = [0; MAX_PARAMETERS];
    for mode in &mut modes {
        *mode = rest % MODE_DIVISOR;
        rest /= MODE_DIVISOR;
    }
    modes
}

/// Render one operand for disassembly: `[n]` position, `n` immediate, `[rb+n]` relative.
#[must_use]
pub fn format_operand(mode: Word, operand: Word) -> String {
    match ParameterMode::from_digit(mode) {
        Some(ParameterMode::Position) => format!("[{operand}]"),
        Some(ParameterMode::Immediate) => operand.to_string(),
        Some(ParameterMode::Relative) if operand < 0 => format!("[rb{operand}]"),
        Some(ParameterMode::Relative) => format!("[rb+{operand}]"),
        None => format!("?{mode}:{operand}"),
    }
}

/// One opcode of the instruction set.
pub trait InstructionHandler: Send + Sync {
    fn opcode(&self) -> u8;
    fn name(&self) -> &'static str;

    /// Number of parameter cells following the instruction cell.
    fn parameter_count(&self) -> usize;

    /// Index of the parameter that names a destination address, if any.
    fn write_target(&self) -> Option<usize> {
        None
    }

    /// Execute against the lent interpreter state. Errors terminate the machine.
    fn execute(&self, context: &mut InstructionContext<'_>)
        -> Result<InstructionResult, MachineError>;

    /// `NAME a, b -> dst`. `operands` holds exactly `parameter_count()` cells.
    fn disassemble(&self, modes: &[Word; MAX_PARAMETERS], operands: &[Word]) -> String {
        let target = self.write_target();
        let sources: Vec<String> = operands
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != target)
            .map(|(i, &operand)| format_operand(modes[i], operand))
            .collect();
        let mut text = self.name().to_string();
        if !sources.is_empty() {
            text.push(' ');
            text.push_str(&sources.join(", "));
        }
        if let Some(i) = target {
            if let Some(&operand) = operands.get(i) {
                text.push_str(" -> ");
                text.push_str(&format_operand(modes[i], operand));
            }
        }
        text
    }
}
