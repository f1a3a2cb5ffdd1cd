//! Error types for yaml-surgeon

use rowan::TextRange;
use thiserror::Error;

/// Why a line's indentation could not be placed on the indent stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentationErrorCategory {
    /// The line is indented to the left of the document's first line.
    Underflow,
    /// The dedent does not land on any enclosing indentation level.
    Misaligned,
}

/// An indentation error with the position of the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("line {line}: {message}")]
pub struct IndentationError {
    /// Human-readable error message
    pub message: String,
    /// 1-based number of the offending line
    pub line: usize,
    /// The text range of the offending line
    pub range: TextRange,
    /// What kind of indentation problem this is
    pub category: IndentationErrorCategory,
}

/// Errors that can occur while scanning or operating on a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurgeonError {
    /// The document's indentation cannot be interpreted as nesting.
    #[error("Indentation error: {0}")]
    Indentation(#[from] IndentationError),

    /// A second mutation was requested for a stage that already has one.
    #[error("Ambiguous mutation: cannot {requested} after {existing} in the same stage")]
    AmbiguousMutation {
        /// The mutation already configured for the stage
        existing: &'static str,
        /// The mutation that was rejected
        requested: &'static str,
    },
}

/// Result type for yaml-surgeon operations
pub type SurgeonResult<T> = Result<T, SurgeonError>;
