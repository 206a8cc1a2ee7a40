//! Find and replace over a [`Buffer`](crate::editable::Buffer).
//!
//! - [`Finder`]: pattern, [`SearchOptions`], cached matches, the current
//!   match and a bounded [`PatternHistory`]
//! - [`Replacer`]: applies a replacement to the current match or to every
//!   match, recording the edits in a [`History`](crate::editable::History)
//!
//! Literal search with whole-word matching:
//!
//! ```
//! use tedit::editable::Buffer;
//! use tedit::search::{Finder, SearchOptions};
//!
//! let buffer = Buffer::from_text("this is a test\ntesting is fun\nbest test here");
//! let mut finder = Finder::with_options(SearchOptions {
//!     whole_word: true,
//!     ..SearchOptions::default()
//! });
//! finder.set_pattern("test");
//! assert_eq!(finder.find_all(&buffer).len(), 2);
//! ```

mod finder;
mod options;
mod pattern_history;
mod replacer;

pub use finder::{Finder, Match};
pub use options::SearchOptions;
pub use pattern_history::{PatternHistory, MAX_PATTERNS};
pub use replacer::Replacer;
