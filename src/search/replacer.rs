//! Replacement of finder matches, recorded in the edit history.

use regex::{Captures, Regex};

use super::finder::{Finder, Match};
use crate::editable::{Buffer, EditError, EditResult, History, Operation};

/// Turns the finder's matches into buffer edits.
///
/// In regex mode the replacement may reference the match: `$1`, `${1}` and
/// `${name}` insert capture groups, `$&` the whole match, `` $` `` and `$'`
/// the line text before and after it, and `$$` a literal `$`.
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    finder: Finder,
    replacement: String,
}

impl Replacer {
    pub fn new(finder: Finder) -> Self {
        Self {
            finder,
            replacement: String::new(),
        }
    }

    pub fn finder(&self) -> &Finder {
        &self.finder
    }

    pub fn finder_mut(&mut self) -> &mut Finder {
        &mut self.finder
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacement = replacement.to_string();
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace the finder's current match.
    ///
    /// Returns `Ok(false)` when there is no current match. With a history,
    /// the removal and the insertion are pushed as two separate entries.
    /// Cached matches are dropped afterwards since positions have shifted.
    pub fn replace_current(
        &mut self,
        buffer: &mut Buffer,
        history: Option<&mut History>,
    ) -> EditResult<bool> {
        let Some(m) = self.finder.current_match().cloned() else {
            return Ok(false);
        };
        self.validate_replacement()?;
        let regex = self.regex();

        let result = self.replacement_for(buffer, &m, regex.as_ref()).and_then(|text| {
            let (delete, insert) = replace_match(buffer, &m, text)?;
            if let Some(history) = history {
                history.push(delete);
                history.push(insert);
            }
            Ok(true)
        });
        self.finder.clear();
        result
    }

    /// Replace every match and return how many were replaced.
    ///
    /// Overlapping literal matches are thinned to a left-to-right,
    /// non-overlapping set first. The kept matches are applied from last to
    /// first so earlier positions stay valid while later text on the same
    /// line changes length. The edits go into history as one composite, so
    /// a single undo reverts them all. If an edit fails, the ones already
    /// applied are rolled back and nothing is recorded.
    pub fn replace_all(
        &mut self,
        buffer: &mut Buffer,
        history: Option<&mut History>,
    ) -> EditResult<usize> {
        let matches = non_overlapping(self.finder.find_all(buffer));
        if matches.is_empty() {
            return Ok(0);
        }
        self.validate_replacement()?;
        let regex = self.regex();

        // Expand against the untouched buffer so `$'` never sees replaced text
        let replacements = matches
            .iter()
            .map(|m| self.replacement_for(buffer, m, regex.as_ref()))
            .collect::<EditResult<Vec<_>>>()?;

        let mut operations = Vec::with_capacity(matches.len() * 2);
        for (m, text) in matches.iter().zip(replacements).rev() {
            match replace_match(buffer, m, text) {
                Ok((delete, insert)) => {
                    operations.push(delete);
                    operations.push(insert);
                }
                Err(err) => {
                    tracing::debug!(pattern = %self.finder.pattern(), %err, "replace all rolled back");
                    for op in operations.iter().rev() {
                        op.undo(buffer)?;
                    }
                    self.finder.clear();
                    return Err(err);
                }
            }
        }

        if let Some(history) = history {
            let description = format!(
                "Replace {} occurrences of \"{}\"",
                matches.len(),
                self.finder.pattern()
            );
            history.push(Operation::composite(operations, description));
        }
        self.finder.clear();
        tracing::debug!(pattern = %self.finder.pattern(), count = matches.len(), "replace all");
        Ok(matches.len())
    }

    /// Check `$` escapes in the replacement. Always valid in literal mode.
    pub fn validate_replacement(&self) -> EditResult<()> {
        if !self.finder.options().use_regex {
            return Ok(());
        }
        validate_template(&self.replacement)
    }

    /// Number of matches in `buffer`, without touching the finder's cache
    pub fn count_matches(&self, buffer: &Buffer) -> usize {
        self.finder.search(buffer).len()
    }

    /// Whether the pattern compiles as a regex with the current case
    /// setting. Literal patterns are always valid.
    pub fn is_pattern_valid(&self) -> bool {
        !self.finder.options().use_regex || self.finder.build_regex().is_ok()
    }

    fn regex(&self) -> Option<Regex> {
        if self.finder.options().use_regex {
            self.finder.compile()
        } else {
            None
        }
    }

    /// Text that replaces `m`: the literal replacement, or in regex mode
    /// the replacement expanded against the match's captures.
    fn replacement_for(
        &self,
        buffer: &Buffer,
        m: &Match,
        regex: Option<&Regex>,
    ) -> EditResult<String> {
        let Some(regex) = regex else {
            return Ok(self.replacement.clone());
        };
        let line = buffer
            .line(m.start.line)
            .ok_or_else(|| EditError::invalid_position(m.start))?;
        let captures = regex
            .captures_at(line, m.start.column)
            .filter(|caps| caps.get(0).is_some_and(|whole| whole.start() == m.start.column))
            .ok_or_else(|| EditError::invalid_position(m.start))?;
        Ok(expand_template(&self.replacement, &captures, line))
    }
}

/// Matches in document order, skipping any that start inside the
/// previously kept one
fn non_overlapping(matches: &[Match]) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::with_capacity(matches.len());
    for m in matches {
        if kept.last().is_some_and(|prev| m.start < prev.end) {
            continue;
        }
        kept.push(m.clone());
    }
    kept
}

/// Swap the text of `m` for `text`, returning the history entries that
/// describe the removal and the insertion.
fn replace_match(buffer: &mut Buffer, m: &Match, text: String) -> EditResult<(Operation, Operation)> {
    let removed = buffer.get_text(m.start, m.end)?;
    buffer.delete(m.start, m.end)?;
    buffer.insert(m.start, &text)?;
    Ok((
        Operation::delete(m.start, m.end, removed),
        Operation::insert(m.start, text),
    ))
}

fn validate_template(template: &str) -> EditResult<()> {
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'$' | b'&' | b'`' | b'\'') => i += 2,
            Some(b) if b.is_ascii_digit() => i += 2,
            Some(b'{') => {
                let close = template[i + 2..].find('}').ok_or_else(|| {
                    invalid_replacement(i, "unclosed \"${\" group")
                })?;
                let name = &template[i + 2..i + 2 + close];
                if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(invalid_replacement(
                        i,
                        format!("invalid group name \"{name}\""),
                    ));
                }
                i += close + 3;
            }
            Some(_) => {
                return Err(invalid_replacement(
                    i,
                    "\"$\" must be followed by $, &, `, ', a digit or {name}",
                ))
            }
            None => return Err(invalid_replacement(i, "dangling \"$\" at end")),
        }
    }
    Ok(())
}

fn invalid_replacement(index: usize, message: impl Into<String>) -> EditError {
    EditError::InvalidReplacement {
        index,
        message: message.into(),
    }
}

/// Expand a validated replacement template. Unknown groups expand to "".
fn expand_template(template: &str, caps: &Captures<'_>, line: &str) -> String {
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let consumed = match after.as_bytes().first() {
            Some(b'$') => {
                out.push('$');
                1
            }
            Some(b'&') => {
                out.push_str(&line[whole.clone()]);
                1
            }
            Some(b'`') => {
                out.push_str(&line[..whole.start]);
                1
            }
            Some(b'\'') => {
                out.push_str(&line[whole.end..]);
                1
            }
            Some(b'{') => match after.find('}') {
                Some(close) => {
                    push_group(&mut out, caps, &after[1..close]);
                    close + 1
                }
                None => {
                    out.push('$');
                    0
                }
            },
            Some(b) if b.is_ascii_digit() => {
                let digits = after.bytes().take_while(u8::is_ascii_digit).count();
                push_group(&mut out, caps, &after[..digits]);
                digits
            }
            _ => {
                out.push('$');
                0
            }
        };
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

fn push_group(out: &mut String, caps: &Captures<'_>, name: &str) {
    let group = match name.parse::<usize>() {
        Ok(idx) => caps.get(idx),
        Err(_) => caps.name(name),
    };
    if let Some(group) = group {
        out.push_str(group.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::Position;
    use crate::search::SearchOptions;

    fn buffer(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines.iter().map(|l| l.to_string()).collect())
    }

    fn make_replacer(pattern: &str, replacement: &str, options: SearchOptions) -> Replacer {
        let mut finder = Finder::with_options(options);
        finder.set_pattern(pattern);
        let mut replacer = Replacer::new(finder);
        replacer.set_replacement(replacement);
        replacer
    }

    fn regex_opts() -> SearchOptions {
        SearchOptions {
            use_regex: true,
            case_sensitive: true,
            ..SearchOptions::default()
        }
    }

    #[test]
    fn test_replace_current_without_match_is_noop() {
        let mut buf = buffer(&["abc"]);
        let mut replacer = make_replacer("zzz", "y", SearchOptions::default());
        assert_eq!(replacer.replace_current(&mut buf, None), Ok(false));
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_replace_current_pushes_two_entries() {
        let mut buf = buffer(&["one two one"]);
        let mut history = History::default();
        let mut replacer = make_replacer("one", "three", SearchOptions::default());
        replacer
            .finder_mut()
            .find_next(&buf, Position::new(0, 0))
            .unwrap();

        assert_eq!(replacer.replace_current(&mut buf, Some(&mut history)), Ok(true));
        assert_eq!(buf.lines(), &["one two three"]);
        assert_eq!(history.depth(), 2);
        assert_eq!(replacer.finder().match_count(), 0);

        history.undo(&mut buf).unwrap();
        assert_eq!(buf.lines(), &["one two "]);
        history.undo(&mut buf).unwrap();
        assert_eq!(buf.lines(), &["one two one"]);
    }

    #[test]
    fn test_replace_all_same_line_length_change() {
        let mut buf = buffer(&["a-a-a", "xa"]);
        let mut history = History::default();
        let mut replacer = make_replacer("a", "[bbb]", SearchOptions::default());

        assert_eq!(replacer.replace_all(&mut buf, Some(&mut history)), Ok(4));
        assert_eq!(buf.lines(), &["[bbb]-[bbb]-[bbb]", "x[bbb]"]);
        assert_eq!(history.depth(), 1);

        history.undo(&mut buf).unwrap();
        assert_eq!(buf.lines(), &["a-a-a", "xa"]);
        history.redo(&mut buf).unwrap();
        assert_eq!(buf.lines(), &["[bbb]-[bbb]-[bbb]", "x[bbb]"]);
    }

    #[test]
    fn test_replace_all_no_matches() {
        let mut buf = buffer(&["abc"]);
        let mut history = History::default();
        let mut replacer = make_replacer("zzz", "y", SearchOptions::default());
        assert_eq!(replacer.replace_all(&mut buf, Some(&mut history)), Ok(0));
        assert!(!history.can_undo());

        let mut replacer = make_replacer("", "y", SearchOptions::default());
        assert_eq!(replacer.replace_all(&mut buf, None), Ok(0));
    }

    #[test]
    fn test_regex_capture_expansion() {
        let mut buf = buffer(&["John Smith", "Jane Doe"]);
        let mut replacer = make_replacer(r"(?P<first>\w+) (\w+)", "$2, ${first}", regex_opts());
        assert_eq!(replacer.replace_all(&mut buf, None), Ok(2));
        assert_eq!(buf.lines(), &["Smith, John", "Doe, Jane"]);
    }

    #[test]
    fn test_regex_context_escapes() {
        let mut buf = buffer(&["key=value"]);
        let mut replacer = make_replacer("=", "[$`|$&|$'|$$]", regex_opts());
        replacer.replace_all(&mut buf, None).unwrap();
        assert_eq!(buf.lines(), &["key[key|=|value|$]value"]);
    }

    #[test]
    fn test_validate_replacement() {
        let mut replacer = make_replacer("x", "", regex_opts());
        for ok in ["plain", "$1", "${name}", "$$", "$&", "$`", "$'", "a$10b"] {
            replacer.set_replacement(ok);
            assert_eq!(replacer.validate_replacement(), Ok(()), "{ok}");
        }

        replacer.set_replacement("cost: $x");
        assert!(matches!(
            replacer.validate_replacement(),
            Err(EditError::InvalidReplacement { index: 6, .. })
        ));
        replacer.set_replacement("${open");
        assert!(replacer.validate_replacement().is_err());
        replacer.set_replacement("end$");
        assert!(replacer.validate_replacement().is_err());
    }

    #[test]
    fn test_validate_replacement_literal_mode() {
        let replacer = make_replacer("x", "cost: $x", SearchOptions::default());
        assert_eq!(replacer.validate_replacement(), Ok(()));
    }

    #[test]
    fn test_invalid_replacement_leaves_buffer_untouched() {
        let mut buf = buffer(&["abc"]);
        let mut replacer = make_replacer("b", "$x", regex_opts());
        assert!(replacer.replace_all(&mut buf, None).is_err());
        assert_eq!(buf.lines(), &["abc"]);
    }

    #[test]
    fn test_count_matches_and_pattern_validity() {
        let buf = buffer(&["a1 b2 c3"]);
        let replacer = make_replacer(r"\d", "", regex_opts());
        assert_eq!(replacer.count_matches(&buf), 3);
        assert_eq!(replacer.finder().match_count(), 0);
        assert!(replacer.is_pattern_valid());

        let replacer = make_replacer("(unclosed", "", regex_opts());
        assert!(!replacer.is_pattern_valid());
        let replacer = make_replacer("(unclosed", "", SearchOptions::default());
        assert!(replacer.is_pattern_valid());
    }
}
