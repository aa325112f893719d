//! Program parser: comma-separated base-10 integers to a memory image.

use crate::error::ParseError;
use crate::types::Word;

/// Parses program text such as `"1,9,10,3,2,3,11,0,99,30,40,50"`.
pub struct ProgramParser;

impl ProgramParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse the whole program. Surrounding whitespace (including a trailing newline) is ignored;
    /// blank text is an empty program.
    pub fn parse_program(&self, source: &str) -> Result<Vec<Word>, ParseError> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(Vec::new());
        }
        source
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token.parse::<Word>().map_err(|source| ParseError {
                    index,
                    token: token.to_string(),
                    source,
                })
            })
            .collect()
    }
}

impl Default for ProgramParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `ProgramParser::new().parse_program(source)`.
pub fn parse_program(source: &str) -> Result<Vec<Word>, ParseError> {
    ProgramParser::new().parse_program(source)
}
