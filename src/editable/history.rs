//! Edit history (undo/redo) as replayable operations.

use std::collections::VecDeque;

use super::buffer::Buffer;
use super::error::{EditError, EditResult};
use super::position::{end_after_insert, Position};

/// Undo depth used when the caller asks for 0
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// A single reversible edit.
///
/// Every variant owns copies of the text it touched, so later buffer
/// mutations cannot invalidate an operation waiting on a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `text` was inserted at `position`
    Insert { position: Position, text: String },
    /// `text` was removed from `start..end`
    Delete {
        start: Position,
        end: Position,
        text: String,
    },
    /// The whole document was replaced
    SetLines {
        old_lines: Vec<String>,
        new_lines: Vec<String>,
    },
    /// Operations replayed as one unit (forward for redo, reverse for undo)
    Composite {
        operations: Vec<Operation>,
        description: String,
    },
}

impl Operation {
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self::Insert {
            position,
            text: text.into(),
        }
    }

    pub fn delete(start: Position, end: Position, text: impl Into<String>) -> Self {
        Self::Delete {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn set_lines(old_lines: Vec<String>, new_lines: Vec<String>) -> Self {
        Self::SetLines {
            old_lines,
            new_lines,
        }
    }

    pub fn composite(operations: Vec<Operation>, description: impl Into<String>) -> Self {
        Self::Composite {
            operations,
            description: description.into(),
        }
    }

    /// Revert this operation's effect on `buffer`
    pub fn undo(&self, buffer: &mut Buffer) -> EditResult<()> {
        match self {
            Self::Insert { position, text } => {
                buffer.delete(*position, end_after_insert(*position, text))
            }
            Self::Delete { start, text, .. } => buffer.insert(*start, text),
            Self::SetLines { old_lines, .. } => {
                buffer.set_lines(old_lines.clone());
                Ok(())
            }
            Self::Composite { operations, .. } => operations
                .iter()
                .rev()
                .try_for_each(|op| op.undo(buffer)),
        }
    }

    /// Re-apply this operation to `buffer`
    pub fn redo(&self, buffer: &mut Buffer) -> EditResult<()> {
        match self {
            Self::Insert { position, text } => buffer.insert(*position, text),
            Self::Delete { start, end, .. } => buffer.delete(*start, *end),
            Self::SetLines { new_lines, .. } => {
                buffer.set_lines(new_lines.clone());
                Ok(())
            }
            Self::Composite { operations, .. } => {
                operations.iter().try_for_each(|op| op.redo(buffer))
            }
        }
    }

    /// Short human-readable label, e.g. for an "Undo ..." menu entry
    pub fn description(&self) -> String {
        match self {
            Self::Insert { text, .. } => format!("Insert {} bytes", text.len()),
            Self::Delete { text, .. } => format!("Delete {} bytes", text.len()),
            Self::SetLines { new_lines, .. } => format!("Set {} lines", new_lines.len()),
            Self::Composite { description, .. } => description.clone(),
        }
    }
}

/// Bounded undo/redo stacks.
///
/// Both stacks hold at most `max_depth` operations; pushing past the limit
/// evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Operation>,
    redo_stack: VecDeque<Operation>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl History {
    /// Create a history holding at most `max_depth` operations per stack
    /// (0 means [`DEFAULT_MAX_DEPTH`])
    pub fn new(max_depth: usize) -> Self {
        let max_depth = if max_depth == 0 {
            DEFAULT_MAX_DEPTH
        } else {
            max_depth
        };
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Record a new edit. Any redo history is discarded.
    pub fn push(&mut self, op: Operation) {
        self.redo_stack.clear();
        push_bounded(&mut self.undo_stack, op, self.max_depth);
    }

    /// Undo the most recent operation.
    ///
    /// If replaying it fails the operation goes back on the undo stack and
    /// the error is returned.
    pub fn undo(&mut self, buffer: &mut Buffer) -> EditResult<()> {
        let op = self.undo_stack.pop_back().ok_or(EditError::NothingToUndo)?;
        if let Err(err) = op.undo(buffer) {
            tracing::debug!(op = %op.description(), %err, "undo failed, operation restored");
            self.undo_stack.push_back(op);
            return Err(err);
        }
        tracing::debug!(op = %op.description(), "undo");
        push_bounded(&mut self.redo_stack, op, self.max_depth);
        Ok(())
    }

    /// Redo the most recently undone operation.
    ///
    /// If replaying it fails the operation goes back on the redo stack and
    /// the error is returned.
    pub fn redo(&mut self, buffer: &mut Buffer) -> EditResult<()> {
        let op = self.redo_stack.pop_back().ok_or(EditError::NothingToRedo)?;
        if let Err(err) = op.redo(buffer) {
            tracing::debug!(op = %op.description(), %err, "redo failed, operation restored");
            self.redo_stack.push_back(op);
            return Err(err);
        }
        tracing::debug!(op = %op.description(), "redo");
        push_bounded(&mut self.undo_stack, op, self.max_depth);
        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history (new or reopened file)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drop redo history but keep undo (save checkpoint)
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Number of operations on the undo stack
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the operation the next undo would revert
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(Operation::description)
    }

    /// Label of the operation the next redo would re-apply
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(Operation::description)
    }
}

fn push_bounded(stack: &mut VecDeque<Operation>, op: Operation, max_depth: usize) {
    stack.push_back(op);
    while stack.len() > max_depth {
        stack.pop_front();
    }
}
