//! tedit - the editing core of a terminal text editor
//!
//! This crate provides a line buffer with a single cursor, an undo/redo
//! history of replayable operations, and literal/regex find and replace.
//! [`EditSession`] ties them to a file on disk; the `tedit` binary exposes
//! find, replace and stat over files.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod file_io;
pub mod search;
pub mod session;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editable::{Buffer, EditError, History, Operation, Position};
pub use search::{Finder, Match, Replacer, SearchOptions};
pub use session::{EditSession, SessionError};
