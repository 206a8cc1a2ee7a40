//! Pattern search over a buffer.
//!
//! Matches never span lines: every line is searched on its own. Literal
//! search reports overlapping occurrences (the scan restarts one character
//! after each match start); regex search reports the engine's
//! non-overlapping matches.

use regex::{Regex, RegexBuilder};

use super::options::SearchOptions;
use super::pattern_history::PatternHistory;
use crate::editable::{Buffer, Position};
use crate::util::text::{is_whole_word, next_char_boundary};

/// One occurrence of the pattern, always within a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: Position,
    pub end: Position,
    /// The text as it appears in the buffer
    pub text: String,
}

impl Match {
    fn new(line: usize, start: usize, end: usize, line_text: &str) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
            text: line_text[start..end].to_string(),
        }
    }
}

/// Search state: pattern, options, cached matches and the current match.
#[derive(Debug, Clone, Default)]
pub struct Finder {
    pattern: String,
    options: SearchOptions,
    matches: Vec<Match>,
    current: Option<usize>,
    history: PatternHistory,
}

impl Finder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Set the search pattern.
    ///
    /// An empty pattern clears the search. A new non-empty pattern is added
    /// to the pattern history. Cached matches are dropped whenever the
    /// pattern changes.
    pub fn set_pattern(&mut self, pattern: &str) {
        if pattern == self.pattern {
            return;
        }
        self.pattern = pattern.to_string();
        self.clear();
        self.history.add(pattern);
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Replace the options; cached matches depend on them and are dropped
    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
        self.clear();
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Search `buffer` without touching the cache
    pub fn search(&self, buffer: &Buffer) -> Vec<Match> {
        if self.pattern.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        if self.options.use_regex {
            let Some(regex) = self.compile() else {
                return matches;
            };
            for (idx, line) in buffer.lines().iter().enumerate() {
                for m in regex.find_iter(line) {
                    if !self.options.whole_word || is_whole_word(line, m.start(), m.end()) {
                        matches.push(Match::new(idx, m.start(), m.end(), line));
                    }
                }
            }
        } else {
            for (idx, line) in buffer.lines().iter().enumerate() {
                for (start, end) in find_literal(line, &self.pattern, self.options.case_sensitive)
                {
                    if !self.options.whole_word || is_whole_word(line, start, end) {
                        matches.push(Match::new(idx, start, end, line));
                    }
                }
            }
        }
        matches
    }

    /// Search `buffer`, cache the result and return it.
    ///
    /// The current match is reset because old indices no longer apply.
    pub fn find_all(&mut self, buffer: &Buffer) -> &[Match] {
        self.matches = self.search(buffer);
        self.current = None;
        tracing::trace!(pattern = %self.pattern, count = self.matches.len(), "find all");
        &self.matches
    }

    /// First match starting strictly after `from`, wrapping to the first
    /// match when allowed. Makes the result the current match.
    pub fn find_next(&mut self, buffer: &Buffer, from: Position) -> Option<Match> {
        if self.matches.is_empty() {
            self.find_all(buffer);
        }
        let idx = self
            .matches
            .iter()
            .position(|m| m.start > from)
            .or_else(|| self.wrap_index(0))?;
        self.current = Some(idx);
        Some(self.matches[idx].clone())
    }

    /// Last match starting strictly before `from`, wrapping to the last
    /// match when allowed. Makes the result the current match.
    pub fn find_previous(&mut self, buffer: &Buffer, from: Position) -> Option<Match> {
        if self.matches.is_empty() {
            self.find_all(buffer);
        }
        let idx = self
            .matches
            .iter()
            .rposition(|m| m.start < from)
            .or_else(|| self.wrap_index(self.matches.len().checked_sub(1)?))?;
        self.current = Some(idx);
        Some(self.matches[idx].clone())
    }

    fn wrap_index(&self, idx: usize) -> Option<usize> {
        (self.options.wrap_around && idx < self.matches.len()).then_some(idx)
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current.and_then(|idx| self.matches.get(idx))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Select a cached match by index. Returns false if out of range.
    pub fn set_current_match(&mut self, idx: usize) -> bool {
        if idx < self.matches.len() {
            self.current = Some(idx);
            true
        } else {
            false
        }
    }

    /// Cached matches from the last search
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Drop cached matches and the current match, keeping the pattern
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    /// Clear pattern and matches and restore default options
    pub fn reset(&mut self) {
        self.pattern.clear();
        self.options = SearchOptions::default();
        self.clear();
    }

    // =========================================================================
    // Pattern history
    // =========================================================================

    pub fn history(&self) -> &PatternHistory {
        &self.history
    }

    /// Replace the pattern history, e.g. with one loaded from disk
    pub fn set_history(&mut self, history: PatternHistory) {
        self.history = history;
    }

    /// Browse to the previous (older) pattern
    pub fn previous_pattern(&mut self) -> Option<String> {
        self.history.older().map(str::to_string)
    }

    /// Browse to the next (newer) pattern
    pub fn next_pattern(&mut self) -> Option<String> {
        self.history.newer().map(str::to_string)
    }

    // =========================================================================
    // Regex
    // =========================================================================

    pub(crate) fn build_regex(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(!self.options.case_sensitive)
            .build()
    }

    /// Compiled pattern, or `None` (logged) when it does not compile
    pub(crate) fn compile(&self) -> Option<Regex> {
        match self.build_regex() {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::debug!(pattern = %self.pattern, "invalid regex, no matches: {}", e);
                None
            }
        }
    }
}

/// Byte ranges of every occurrence of `needle` in `line`, overlapping
/// occurrences included.
fn find_literal(line: &str, needle: &str, case_sensitive: bool) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut from = 0;

    while from <= line.len() {
        let hit = if case_sensitive {
            line[from..]
                .find(needle)
                .map(|i| (from + i, from + i + needle.len()))
        } else {
            find_caseless(line, from, needle)
        };
        let Some((start, end)) = hit else {
            break;
        };
        found.push((start, end));
        match next_char_boundary(line, start) {
            Some(next) => from = next,
            None => break,
        }
    }
    found
}

/// First case-insensitive occurrence of `needle` at or after `from`.
///
/// Compares character by character so the returned range is in the
/// original line's bytes even when case folding changes byte lengths.
fn find_caseless(line: &str, from: usize, needle: &str) -> Option<(usize, usize)> {
    line[from..].char_indices().find_map(|(i, _)| {
        let start = from + i;
        caseless_prefix_len(&line[start..], needle).map(|len| (start, start + len))
    })
}

fn caseless_prefix_len(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    let mut consumed = 0;
    for n in needle.chars() {
        let (i, h) = hay.next()?;
        if h != n && !h.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
        consumed = i + h.len_utf8();
    }
    Some(consumed)
}
