//! An open document: buffer, undo history, find/replace state and the file
//! it came from.
//!
//! Every edit goes through the same two steps: mutate the [`Buffer`], and if
//! that succeeded push the matching [`Operation`]. Any edit drops the
//! finder's cached matches since their positions may have shifted.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::EditorConfig;
use crate::editable::{Buffer, EditError, EditResult, History, Operation, Position};
use crate::file_io::{self, FileError, LineEnding};
use crate::search::{Finder, Match, Replacer, SearchOptions};
use crate::util::text::{next_char_boundary, prev_char_boundary};

/// Errors from session-level operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error("document has no file path")]
    NoPath,
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone)]
pub struct EditSession {
    buffer: Buffer,
    history: History,
    replacer: Replacer,
    path: Option<PathBuf>,
    line_ending: LineEnding,
    page_size: usize,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl EditSession {
    /// Empty, unnamed document using the config's history depth, page size,
    /// search options and line ending
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            buffer: Buffer::new(),
            history: History::new(config.effective_history_depth()),
            replacer: Replacer::new(Finder::with_options(config.search)),
            path: None,
            line_ending: config.line_ending,
            page_size: config.effective_page_size(),
        }
    }

    /// Unnamed document holding `text`
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Buffer::from_text(text),
            ..Self::default()
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Direct buffer access for cursor movement. Edits made through this
    /// are not recorded in history.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn finder(&self) -> &Finder {
        self.replacer.finder()
    }

    pub fn finder_mut(&mut self) -> &mut Finder {
        self.replacer.finder_mut()
    }

    pub fn replacer(&self) -> &Replacer {
        &self.replacer
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    pub fn page_up(&mut self) {
        self.buffer.page_up(self.page_size);
    }

    pub fn page_down(&mut self) {
        self.buffer.page_down(self.page_size);
    }

    // =========================================================================
    // Character-level edits
    // =========================================================================

    /// Insert `text` at the cursor
    pub fn insert_text(&mut self, text: &str) -> EditResult<()> {
        let pos = self.buffer.cursor();
        self.buffer.insert(pos, text)?;
        if !text.is_empty() {
            self.record(Operation::insert(pos, text));
        }
        Ok(())
    }

    pub fn insert_newline(&mut self) -> EditResult<()> {
        self.insert_text("\n")
    }

    /// Delete the character before the cursor, joining with the previous
    /// line at column 0. Returns false at the start of the document.
    pub fn backspace(&mut self) -> EditResult<bool> {
        let end = self.buffer.cursor();
        let line = self.buffer.line(end.line).unwrap_or_default();
        let start = match prev_char_boundary(line, end.column) {
            Some(column) => Position::new(end.line, column),
            None if end.line > 0 => {
                Position::new(end.line - 1, self.buffer.line_len(end.line - 1))
            }
            None => return Ok(false),
        };
        self.delete_range(start, end)?;
        Ok(true)
    }

    /// Delete the character under the cursor, joining with the next line at
    /// the line end. Returns false at the end of the document.
    pub fn delete_forward(&mut self) -> EditResult<bool> {
        let start = self.buffer.cursor();
        let line = self.buffer.line(start.line).unwrap_or_default();
        let end = match next_char_boundary(line, start.column) {
            Some(column) => Position::new(start.line, column),
            None if start.line + 1 < self.buffer.line_count() => {
                Position::new(start.line + 1, 0)
            }
            None => return Ok(false),
        };
        self.delete_range(start, end)?;
        Ok(true)
    }

    /// Delete `start..end`, recording the removed text
    pub fn delete_range(&mut self, start: Position, end: Position) -> EditResult<()> {
        let text = self.buffer.get_text(start, end)?;
        self.buffer.delete(start, end)?;
        if !text.is_empty() {
            self.record(Operation::delete(start, end, text));
        }
        Ok(())
    }

    // =========================================================================
    // Whole-line edits
    // =========================================================================

    /// Remove the cursor line, returning its text
    pub fn delete_line(&mut self) -> String {
        let line = self.buffer.cursor().line;
        let text = self.buffer.line(line).unwrap_or_default().to_string();
        let last = self.buffer.line_count() - 1;
        let op = if last == 0 {
            Operation::delete(Position::new(0, 0), Position::new(0, text.len()), text.as_str())
        } else if line < last {
            Operation::delete(
                Position::new(line, 0),
                Position::new(line + 1, 0),
                format!("{text}\n"),
            )
        } else {
            // The last line takes the newline before it
            let above = Position::new(line - 1, self.buffer.line_len(line - 1));
            Operation::delete(above, Position::new(line, text.len()), format!("\n{text}"))
        };

        let removed = self.buffer.delete_line();
        if !(last == 0 && removed.is_empty()) {
            self.record(Operation::composite(vec![op], "Delete line"));
        }
        removed
    }

    pub fn duplicate_line(&mut self) {
        let line = self.buffer.cursor().line;
        let text = self.buffer.line(line).unwrap_or_default();
        let op = Operation::insert(line_end(&self.buffer, line), format!("\n{text}"));
        self.buffer.duplicate_line();
        self.record(Operation::composite(vec![op], "Duplicate line"));
    }

    pub fn insert_line_above(&mut self) {
        let line = self.buffer.cursor().line;
        let op = Operation::insert(Position::new(line, 0), "\n");
        self.buffer.insert_line_above();
        self.record(Operation::composite(vec![op], "Insert line above"));
    }

    pub fn insert_line_below(&mut self) {
        let line = self.buffer.cursor().line;
        let op = Operation::insert(line_end(&self.buffer, line), "\n");
        self.buffer.insert_line_below();
        self.record(Operation::composite(vec![op], "Insert line below"));
    }

    /// Swap the cursor line with the one above. Returns false at the top.
    pub fn move_line_up(&mut self) -> bool {
        let line = self.buffer.cursor().line;
        if line == 0 {
            return false;
        }
        let swap = self.line_swap(line - 1, "Move line up");
        if !self.buffer.move_line_up() {
            return false;
        }
        self.record(swap);
        true
    }

    /// Swap the cursor line with the one below. Returns false at the bottom.
    pub fn move_line_down(&mut self) -> bool {
        let line = self.buffer.cursor().line;
        if line + 1 >= self.buffer.line_count() {
            return false;
        }
        let swap = self.line_swap(line, "Move line down");
        if !self.buffer.move_line_down() {
            return false;
        }
        self.record(swap);
        true
    }

    /// Composite that swaps lines `upper` and `upper + 1`: clear the upper
    /// line, write the lower text there, then the same for the lower line.
    fn line_swap(&self, upper: usize, description: &str) -> Operation {
        let above = self.buffer.line(upper).unwrap_or_default().to_string();
        let below = self.buffer.line(upper + 1).unwrap_or_default().to_string();
        let top = Position::new(upper, 0);
        let bottom = Position::new(upper + 1, 0);
        Operation::composite(
            vec![
                Operation::delete(top, Position::new(upper, above.len()), above.as_str()),
                Operation::insert(top, below.as_str()),
                Operation::delete(bottom, Position::new(upper + 1, below.len()), below),
                Operation::insert(bottom, above),
            ],
            description,
        )
    }

    fn record(&mut self, op: Operation) {
        self.history.push(op);
        self.replacer.finder_mut().clear();
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    pub fn undo(&mut self) -> EditResult<()> {
        let result = self.history.undo(&mut self.buffer);
        self.replacer.finder_mut().clear();
        result
    }

    pub fn redo(&mut self) -> EditResult<()> {
        let result = self.history.redo(&mut self.buffer);
        self.replacer.finder_mut().clear();
        result
    }

    // =========================================================================
    // Find / replace
    // =========================================================================

    pub fn set_pattern(&mut self, pattern: &str) {
        self.replacer.finder_mut().set_pattern(pattern);
    }

    pub fn set_search_options(&mut self, options: SearchOptions) {
        self.replacer.finder_mut().set_options(options);
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacer.set_replacement(replacement);
    }

    /// All matches of the current pattern
    pub fn find_all(&mut self) -> &[Match] {
        self.replacer.finder_mut().find_all(&self.buffer)
    }

    /// Next match after the cursor; the cursor moves to its start
    pub fn find_next(&mut self) -> Option<Match> {
        let from = self.buffer.cursor();
        let found = self.replacer.finder_mut().find_next(&self.buffer, from)?;
        self.buffer.set_cursor(found.start);
        Some(found)
    }

    /// Previous match before the cursor; the cursor moves to its start
    pub fn find_previous(&mut self) -> Option<Match> {
        let from = self.buffer.cursor();
        let found = self
            .replacer
            .finder_mut()
            .find_previous(&self.buffer, from)?;
        self.buffer.set_cursor(found.start);
        Some(found)
    }

    pub fn count_matches(&self) -> usize {
        self.replacer.count_matches(&self.buffer)
    }

    /// Replace the current match. Returns false when there is none.
    pub fn replace_current(&mut self) -> EditResult<bool> {
        self.replacer
            .replace_current(&mut self.buffer, Some(&mut self.history))
    }

    /// Replace every match as one undoable step
    pub fn replace_all(&mut self) -> EditResult<usize> {
        self.replacer
            .replace_all(&mut self.buffer, Some(&mut self.history))
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Load `path`, replacing the document and discarding history
    pub fn open(&mut self, path: &Path) -> SessionResult<()> {
        let (lines, info) = file_io::read_file_with_info(path)?;
        self.buffer.set_lines(lines);
        self.history.clear();
        self.replacer.finder_mut().clear();
        if info.line_ending != LineEnding::Unknown {
            self.line_ending = info.line_ending;
        }
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write to the current path
    pub fn save(&mut self) -> SessionResult<()> {
        let path = self.path.clone().ok_or(SessionError::NoPath)?;
        self.write_to(&path)
    }

    /// Write to `path` and make it the current path
    pub fn save_as(&mut self, path: &Path) -> SessionResult<()> {
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> SessionResult<()> {
        file_io::write_file(path, self.buffer.lines(), self.line_ending)?;
        self.buffer.mark_saved();
        self.history.clear_redo();
        Ok(())
    }
}

fn line_end(buffer: &Buffer, line: usize) -> Position {
    Position::new(line, buffer.line_len(line))
}
