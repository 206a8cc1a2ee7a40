//! Error types for buffer, history and replacement operations.

use thiserror::Error;

use super::position::Position;

/// Errors returned by the editing core.
///
/// Variants compare by value, so callers can dispatch on
/// `err == EditError::NothingToUndo` without matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Line out of range, or column past the end of the line / inside a
    /// multi-byte character
    #[error("Invalid position: line {line}, column {column}")]
    InvalidPosition { line: usize, column: usize },

    /// Range start ordered after its end
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: Position, end: Position },

    /// Undo requested with an empty undo stack
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo requested with an empty redo stack
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Malformed `$` escape in a regex replacement string
    #[error("Invalid replacement at byte {index}: {message}")]
    InvalidReplacement { index: usize, message: String },
}

impl EditError {
    pub fn invalid_position(pos: Position) -> Self {
        Self::InvalidPosition {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// Result alias for editing operations
pub type EditResult<T> = Result<T, EditError>;
