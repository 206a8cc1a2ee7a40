//! Search options shared by the finder, the config file and the CLI.

use serde::{Deserialize, Serialize};

/// How a pattern is matched against the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    /// Require non-word characters (or line edges) around each match
    pub whole_word: bool,
    /// Treat the pattern as a regular expression instead of literal text
    pub use_regex: bool,
    /// Continue from the other end when no match is left in the search direction
    pub wrap_around: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            wrap_around: true,
        }
    }
}
