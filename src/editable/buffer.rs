//! Line buffer: the document text, its cursor, and the modified flag.
//!
//! The document is a flat `Vec<String>` of lines without terminators. It
//! always holds at least one line; an empty document is a single empty line.

use super::error::{EditError, EditResult};
use super::position::{end_after_insert, Cursor, Position};
use crate::util::text::{
    floor_char_boundary, next_char_boundary, prev_char_boundary, word_start_after,
    word_start_before,
};

/// Lines moved by page up/down when the caller passes 0
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Document text with a single cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    cursor: Cursor,
    modified: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Create an empty buffer (one empty line)
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            modified: false,
        }
    }

    /// Create a buffer from lines; an empty vector becomes one empty line
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut buffer = Self::new();
        buffer.set_lines(lines);
        buffer
    }

    /// Create a buffer by splitting `text` on `\n`
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split('\n').map(str::to_string).collect())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line content, `None` if out of range
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Line length in bytes (0 for out-of-range lines)
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, String::len)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Owned copy of every line
    pub fn all_lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// Whole document joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn cursor(&self) -> Position {
        self.cursor.to_position()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag after the document was written out
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Whether `pos` addresses a line and a character boundary within it
    pub fn is_valid_position(&self, pos: Position) -> bool {
        self.lines
            .get(pos.line)
            .is_some_and(|line| pos.column <= line.len() && line.is_char_boundary(pos.column))
    }

    fn check_position(&self, pos: Position) -> EditResult<()> {
        if self.is_valid_position(pos) {
            Ok(())
        } else {
            Err(EditError::invalid_position(pos))
        }
    }

    fn check_range(&self, start: Position, end: Position) -> EditResult<()> {
        self.check_position(start)?;
        self.check_position(end)?;
        if start > end {
            return Err(EditError::InvalidRange { start, end });
        }
        Ok(())
    }

    // =========================================================================
    // Content replacement
    // =========================================================================

    /// Replace the whole document, reset the cursor to (0, 0) and clear the
    /// modified flag. Used for file load and whole-buffer undo.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        self.cursor = Cursor::default();
        self.modified = false;
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert `text` at `pos`, splitting it into lines on `\n`.
    ///
    /// The cursor ends up right after the inserted text. Empty text is a
    /// no-op and leaves the modified flag alone.
    pub fn insert(&mut self, pos: Position, text: &str) -> EditResult<()> {
        self.check_position(pos)?;
        if text.is_empty() {
            return Ok(());
        }

        let line = &mut self.lines[pos.line];
        if !text.contains('\n') {
            line.insert_str(pos.column, text);
        } else {
            let suffix = line.split_off(pos.column);
            let mut segments = text.split('\n');
            if let Some(first) = segments.next() {
                line.push_str(first);
            }
            let mut new_lines: Vec<String> = segments.map(str::to_string).collect();
            if let Some(last) = new_lines.last_mut() {
                last.push_str(&suffix);
            }
            let at = pos.line + 1;
            self.lines.splice(at..at, new_lines);
        }

        let end = end_after_insert(pos, text);
        self.cursor = Cursor::at_position(end);
        self.modified = true;
        tracing::trace!(%pos, %end, bytes = text.len(), "insert");
        Ok(())
    }

    /// Delete the half-open range `start..end`.
    ///
    /// Lines between the two positions are removed and the remainder of the
    /// end line is joined onto the start line. The cursor moves to `start`.
    pub fn delete(&mut self, start: Position, end: Position) -> EditResult<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }

        if start.line == end.line {
            self.lines[start.line].replace_range(start.column..end.column, "");
        } else {
            let tail = self.lines[end.line][end.column..].to_string();
            let head = &mut self.lines[start.line];
            head.truncate(start.column);
            head.push_str(&tail);
            self.lines.drain(start.line + 1..=end.line);
        }

        self.cursor = Cursor::at_position(start);
        self.clamp_cursor();
        self.modified = true;
        tracing::trace!(%start, %end, "delete");
        Ok(())
    }

    /// Text `delete(start, end)` would remove; inserting it back at `start`
    /// restores the document.
    pub fn get_text(&self, start: Position, end: Position) -> EditResult<String> {
        self.check_range(start, end)?;

        if start.line == end.line {
            return Ok(self.lines[start.line][start.column..end.column].to_string());
        }

        let mut text = String::from(&self.lines[start.line][start.column..]);
        for line in &self.lines[start.line + 1..end.line] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(&self.lines[end.line][..end.column]);
        Ok(text)
    }

    // =========================================================================
    // Cursor movement
    // =========================================================================

    /// Move the cursor, normalising out-of-range values: negative line goes
    /// to 0, overflow to the last line; the column is clamped into the line
    /// and snapped down to a character boundary.
    pub fn move_cursor(&mut self, line: isize, column: isize) {
        let last = self.lines.len() - 1;
        let line = usize::try_from(line).unwrap_or(0).min(last);
        let column = usize::try_from(column).unwrap_or(0);
        self.cursor = Cursor::new(line, floor_char_boundary(&self.lines[line], column));
    }

    /// Move the cursor to `pos`, clamped into the document
    pub fn set_cursor(&mut self, pos: Position) {
        self.move_cursor(to_isize(pos.line), to_isize(pos.column));
    }

    fn clamp_cursor(&mut self) {
        let desired = self.cursor.desired_column;
        self.set_cursor(self.cursor.to_position());
        self.cursor.desired_column = desired;
    }

    /// Place the cursor on `line` at the column it wants to be in, keeping
    /// the desired column for the next vertical move.
    fn move_vertically(&mut self, line: usize) {
        self.cursor.set_desired_column();
        let desired = self.cursor.desired_column;
        let column = self.cursor.effective_column();
        self.set_cursor(Position::new(line, column));
        self.cursor.desired_column = desired;
    }

    /// One character left, wrapping to the end of the previous line
    pub fn move_cursor_left(&mut self) {
        let Position { line, column } = self.cursor();
        match prev_char_boundary(&self.lines[line], column) {
            Some(col) => self.cursor = Cursor::new(line, col),
            None if line > 0 => self.cursor = Cursor::new(line - 1, self.line_len(line - 1)),
            None => self.cursor.clear_desired_column(),
        }
    }

    /// One character right, wrapping to the start of the next line
    pub fn move_cursor_right(&mut self) {
        let Position { line, column } = self.cursor();
        match next_char_boundary(&self.lines[line], column) {
            Some(col) => self.cursor = Cursor::new(line, col),
            None if line + 1 < self.lines.len() => self.cursor = Cursor::new(line + 1, 0),
            None => self.cursor.clear_desired_column(),
        }
    }

    pub fn move_cursor_up(&mut self) {
        let line = self.cursor.line.saturating_sub(1);
        self.move_vertically(line);
    }

    pub fn move_cursor_down(&mut self) {
        let line = self.cursor.line + 1;
        self.move_vertically(line);
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor = Cursor::new(self.cursor.line, 0);
    }

    pub fn move_to_line_end(&mut self) {
        let line = self.cursor.line;
        self.cursor = Cursor::new(line, self.line_len(line));
    }

    pub fn move_to_document_start(&mut self) {
        self.cursor = Cursor::new(0, 0);
    }

    pub fn move_to_document_end(&mut self) {
        let last = self.lines.len() - 1;
        self.cursor = Cursor::new(last, self.line_len(last));
    }

    /// Move to the start of the current or previous word. At column 0 the
    /// cursor wraps to the end of the previous line.
    pub fn move_word_left(&mut self) {
        let Position { line, column } = self.cursor();
        if column == 0 {
            self.move_cursor_left();
            return;
        }
        self.cursor = Cursor::new(line, word_start_before(&self.lines[line], column));
    }

    /// Move to the start of the next word, or the line end. At the line end
    /// the cursor wraps to the start of the next line.
    pub fn move_word_right(&mut self) {
        let Position { line, column } = self.cursor();
        if column >= self.line_len(line) {
            self.move_cursor_right();
            return;
        }
        self.cursor = Cursor::new(line, word_start_after(&self.lines[line], column));
    }

    /// Move up by `lines` (0 means [`DEFAULT_PAGE_SIZE`])
    pub fn page_up(&mut self, lines: usize) {
        let step = page_step(lines);
        let line = self.cursor.line.saturating_sub(step);
        self.move_vertically(line);
    }

    /// Move down by `lines` (0 means [`DEFAULT_PAGE_SIZE`])
    pub fn page_down(&mut self, lines: usize) {
        let step = page_step(lines);
        let line = self.cursor.line.saturating_add(step);
        self.move_vertically(line);
    }

    // =========================================================================
    // Whole-line operations
    // =========================================================================

    /// Remove the cursor line and return its text. The only line of the
    /// document is emptied instead of removed.
    pub fn delete_line(&mut self) -> String {
        let line = self.cursor.line;
        let removed = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0])
        } else {
            self.lines.remove(line)
        };
        let line = line.min(self.lines.len() - 1);
        self.cursor = Cursor::new(line, 0);
        self.modified = true;
        removed
    }

    /// Copy the cursor line below itself and move onto the copy
    pub fn duplicate_line(&mut self) {
        let Position { line, column } = self.cursor();
        let copy = self.lines[line].clone();
        self.lines.insert(line + 1, copy);
        self.set_cursor(Position::new(line + 1, column));
        self.modified = true;
    }

    /// Swap the cursor line with the one above. Returns false at the top.
    pub fn move_line_up(&mut self) -> bool {
        let line = self.cursor.line;
        if line == 0 {
            return false;
        }
        self.lines.swap(line, line - 1);
        self.cursor.line = line - 1;
        self.cursor.clear_desired_column();
        self.modified = true;
        true
    }

    /// Swap the cursor line with the one below. Returns false at the bottom.
    pub fn move_line_down(&mut self) -> bool {
        let line = self.cursor.line;
        if line + 1 >= self.lines.len() {
            return false;
        }
        self.lines.swap(line, line + 1);
        self.cursor.line = line + 1;
        self.cursor.clear_desired_column();
        self.modified = true;
        true
    }

    pub fn insert_line_above(&mut self) {
        let line = self.cursor.line;
        self.lines.insert(line, String::new());
        self.cursor = Cursor::new(line, 0);
        self.modified = true;
    }

    pub fn insert_line_below(&mut self) {
        let line = self.cursor.line + 1;
        self.lines.insert(line, String::new());
        self.cursor = Cursor::new(line, 0);
        self.modified = true;
    }
}

fn page_step(lines: usize) -> usize {
    if lines == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        lines
    }
}

fn to_isize(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}
