//! Utility functions for text editing

/// Word characters are Unicode letters, digits, or `_`
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Byte offset of the character boundary before `col`, or `None` at 0
pub fn prev_char_boundary(text: &str, col: usize) -> Option<usize> {
    let col = floor_char_boundary(text, col);
    text[..col].char_indices().next_back().map(|(i, _)| i)
}

/// Byte offset of the character boundary after `col`, or `None` at the end
pub fn next_char_boundary(text: &str, col: usize) -> Option<usize> {
    let col = floor_char_boundary(text, col);
    text[col..].chars().next().map(|ch| col + ch.len_utf8())
}

/// Largest character boundary `<= col`, clamped to the text length
pub fn floor_char_boundary(text: &str, col: usize) -> usize {
    let mut col = col.min(text.len());
    while !text.is_char_boundary(col) {
        col -= 1;
    }
    col
}

/// Byte column of the start of the word ending at or before `col`.
///
/// Skips non-word characters backwards, then the word behind them.
pub fn word_start_before(text: &str, col: usize) -> usize {
    let col = floor_char_boundary(text, col);
    let mut chars = text[..col].char_indices().rev().peekable();
    let mut pos = col;

    while let Some(&(i, ch)) = chars.peek() {
        if is_word_char(ch) {
            break;
        }
        pos = i;
        chars.next();
    }
    while let Some(&(i, ch)) = chars.peek() {
        if !is_word_char(ch) {
            break;
        }
        pos = i;
        chars.next();
    }
    pos
}

/// Byte column of the start of the next word after `col`, or the line end.
///
/// Skips the rest of the current word, then the non-word run after it.
pub fn word_start_after(text: &str, col: usize) -> usize {
    let col = floor_char_boundary(text, col);
    let mut chars = text[col..].char_indices().peekable();
    let mut pos = text.len();

    while let Some(&(_, ch)) = chars.peek() {
        if !is_word_char(ch) {
            break;
        }
        chars.next();
    }
    while let Some(&(_, ch)) = chars.peek() {
        if is_word_char(ch) {
            break;
        }
        chars.next();
    }
    if let Some(&(i, _)) = chars.peek() {
        pos = col + i;
    }
    pos
}

/// Whether the match `start..end` in `line` has no word character directly
/// outside it on either side.
pub fn is_whole_word(line: &str, start: usize, end: usize) -> bool {
    let before_ok = line[..start]
        .chars()
        .next_back()
        .map_or(true, |ch| !is_word_char(ch));
    let after_ok = line[end..]
        .chars()
        .next()
        .map_or(true, |ch| !is_word_char(ch));
    before_ok && after_ok
}
