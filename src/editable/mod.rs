//! Text editing core: the line buffer and its undo/redo history.
//!
//! # Architecture
//!
//! - [`Buffer`]: the document as a vector of lines plus one [`Cursor`] and a
//!   modified flag
//! - [`Operation`]: a reversible edit (insert, delete, whole-buffer replace,
//!   or a composite of these)
//! - [`History`]: bounded undo/redo stacks that replay operations against a
//!   buffer
//!
//! Callers mutate the buffer first and, if that succeeds, push the matching
//! operation:
//!
//! ```
//! use tedit::editable::{Buffer, History, Operation, Position};
//!
//! let mut buffer = Buffer::from_text("hello world");
//! let mut history = History::default();
//!
//! let pos = Position::new(0, 5);
//! buffer.insert(pos, " there").unwrap();
//! history.push(Operation::insert(pos, " there"));
//!
//! history.undo(&mut buffer).unwrap();
//! assert_eq!(buffer.text(), "hello world");
//! ```

mod buffer;
mod error;
mod history;
mod position;

// Re-export main types
pub use buffer::{Buffer, DEFAULT_PAGE_SIZE};
pub use error::{EditError, EditResult};
pub use history::{History, Operation, DEFAULT_MAX_DEPTH};
pub use position::{end_after_insert, Cursor, Position};
