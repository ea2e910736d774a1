use thiserror::Error;

/// Errors raised when parsing or validating secondary structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("Invalid dot-bracket character '{0}' at position {1}")]
    InvalidToken(char, usize),

    #[error("Unmatched ')' at position {0}")]
    UnmatchedClose(usize),

    #[error("Unmatched '(' at position {0}")]
    UnmatchedOpen(usize),

    #[error("Structure of length {0} exceeds the supported index range")]
    TooLong(usize),
}
