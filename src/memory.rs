//! Flat word memory. Grows on demand, zero-filled, never shrinks.

use crate::config::MAX_MEMORY_CELLS;
use crate::error::MachineError;
use crate::types::Word;

/// Growable memory addressed from 0. Reads and writes past the end extend it with zeros.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_words(cells: Vec<Word>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Word] {
        &self.cells
    }

    /// Value at `index` without growing; zero past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Word {
        self.cells.get(index).copied().unwrap_or(0)
    }

    /// Convert a word address, rejecting negatives and addresses past the growth limit.
    pub fn index(address: Word) -> Result<usize, MachineError> {
        match usize::try_from(address) {
            Ok(index) if index < MAX_MEMORY_CELLS => Ok(index),
            _ => Err(MachineError::InvalidAddress { address }),
        }
    }

    fn ensure_size(&mut self, index: usize) -> Result<(), MachineError> {
        if index < self.cells.len() {
            return Ok(());
        }
        if index >= MAX_MEMORY_CELLS {
            return Err(MachineError::InvalidAddress {
                address: Word::try_from(index).unwrap_or(Word::MAX),
            });
        }
        self.cells.resize(index + 1, 0);
        Ok(())
    }

    pub fn read(&mut self, address: Word) -> Result<Word, MachineError> {
        self.read_at(Self::index(address)?)
    }

    pub fn read_at(&mut self, index: usize) -> Result<Word, MachineError> {
        self.ensure_size(index)?;
        Ok(self.cells[index])
    }

    pub fn write(&mut self, address: Word, value: Word) -> Result<(), MachineError> {
        self.write_at(Self::index(address)?, value)
    }

    pub fn write_at(&mut self, index: usize, value: Word) -> Result<(), MachineError> {
        self.ensure_size(index)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Replace the whole image (program load).
    pub fn load(&mut self, cells: &[Word]) {
        self.cells.clear();
        self.cells.extend_from_slice(cells);
    }
}
