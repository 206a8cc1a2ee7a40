//! Edit session tests - typing, line edits, find/replace and files together

mod common;

use common::{lines, pos, session_with, Lcg};
use tedit::config::EditorConfig;
use tedit::editable::EditError;
use tedit::file_io::LineEnding;
use tedit::search::SearchOptions;
use tedit::session::EditSession;
use tempfile::TempDir;

// ========================================================================
// Typing
// ========================================================================

#[test]
fn test_typing_and_undo_each_step() {
    let mut session = session_with("", 0, 0);
    session.insert_text("fn main()").unwrap();
    session.insert_text(" {").unwrap();
    session.insert_newline().unwrap();
    session.insert_text("}").unwrap();
    assert_eq!(session.buffer().text(), "fn main() {\n}");
    assert_eq!(session.cursor(), pos(1, 1));

    for expected in ["fn main() {\n", "fn main() {", "fn main()", ""] {
        session.undo().unwrap();
        assert_eq!(session.buffer().text(), expected);
    }
    assert_eq!(session.undo(), Err(EditError::NothingToUndo));
}

#[test]
fn test_backspace_and_delete_forward_round_trip() {
    let mut session = session_with("ab\ncd", 1, 1);
    session.backspace().unwrap();
    session.backspace().unwrap();
    session.delete_forward().unwrap();
    assert_eq!(session.buffer().text(), "ab");

    session.undo().unwrap();
    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.buffer().text(), "ab\ncd");
    assert_eq!(session.history().redo_depth(), 3);
}

#[test]
fn test_new_edit_clears_redo() {
    let mut session = session_with("x", 0, 1);
    session.insert_text("y").unwrap();
    session.undo().unwrap();
    assert!(session.history().can_redo());

    session.insert_text("z").unwrap();
    assert!(!session.history().can_redo());
    assert_eq!(session.redo(), Err(EditError::NothingToRedo));
}

#[test]
fn test_history_depth_from_config() {
    let config = EditorConfig {
        history_depth: 3,
        ..EditorConfig::default()
    };
    let mut session = EditSession::new(&config);
    for ch in ["a", "b", "c", "d", "e"] {
        session.insert_text(ch).unwrap();
    }
    assert_eq!(session.history().depth(), 3);
}

#[test]
fn test_page_size_from_config() {
    let config = EditorConfig {
        page_size: 3,
        ..EditorConfig::default()
    };
    let mut session = EditSession::new(&config);
    session.insert_text(&"\n".repeat(9)).unwrap();
    session.buffer_mut().move_to_document_start();
    session.page_down();
    assert_eq!(session.cursor(), pos(3, 0));
    session.page_up();
    assert_eq!(session.cursor(), pos(0, 0));
}

// ========================================================================
// Line edits
// ========================================================================

#[test]
fn test_move_line_down_twice_then_undo_all() {
    let mut session = session_with("a\nb\nc", 0, 0);
    assert!(session.move_line_down());
    assert!(session.move_line_down());
    assert_eq!(session.buffer().all_lines(), lines(&["b", "c", "a"]));

    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.buffer().all_lines(), lines(&["a", "b", "c"]));
}

#[test]
fn test_duplicate_then_delete_line() {
    let mut session = session_with("keep\ncopy me", 1, 2);
    session.duplicate_line();
    assert_eq!(session.buffer().all_lines(), lines(&["keep", "copy me", "copy me"]));
    assert_eq!(session.delete_line(), "copy me");
    assert_eq!(session.buffer().all_lines(), lines(&["keep", "copy me"]));

    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.buffer().all_lines(), lines(&["keep", "copy me"]));
    session.redo().unwrap();
    assert_eq!(session.buffer().line_count(), 3);
}

#[test]
fn test_random_edits_undo_to_original() {
    let original = "The quick brown fox\njumps over\n\nthe lazy dog";
    let mut session = session_with(original, 0, 0);
    let mut rng = Lcg::new(42);

    for _ in 0..100 {
        let line = rng.below(session.buffer().line_count());
        let column = rng.below(session.buffer().line_len(line) + 1);
        session.buffer_mut().set_cursor(pos(line, column));
        match rng.below(6) {
            0 => session.insert_text("xy").unwrap(),
            1 => session.insert_newline().unwrap(),
            2 => {
                session.backspace().unwrap();
            }
            3 => {
                session.delete_forward().unwrap();
            }
            4 => {
                session.move_line_up();
            }
            _ => {
                session.move_line_down();
            }
        }
    }

    while session.history().can_undo() {
        session.undo().unwrap();
    }
    assert_eq!(session.buffer().text(), original);
}

#[test]
fn test_line_edit_undo_keeps_unsaved_state() {
    let mut session = session_with("abc\ndef", 0, 0);
    session.insert_text("x").unwrap();
    session.buffer_mut().set_cursor(pos(1, 2));
    session.duplicate_line();
    assert_eq!(session.buffer().text(), "xabc\ndef\ndef");

    session.undo().unwrap();
    assert_eq!(session.buffer().text(), "xabc\ndef");
    assert!(session.is_modified());
    assert_eq!(session.cursor(), pos(1, 3));
}

#[test]
fn test_delete_last_line_undo_redo() {
    let mut session = session_with("one\ntwo\nthree", 2, 1);
    assert_eq!(session.delete_line(), "three");
    assert_eq!(session.buffer().text(), "one\ntwo");
    assert_eq!(
        session.history().undo_description().as_deref(),
        Some("Delete line")
    );

    session.undo().unwrap();
    assert_eq!(session.buffer().text(), "one\ntwo\nthree");
    assert!(session.is_modified());
    session.redo().unwrap();
    assert_eq!(session.buffer().text(), "one\ntwo");
}

#[test]
fn test_delete_only_empty_line_not_recorded() {
    let mut session = session_with("", 0, 0);
    assert_eq!(session.delete_line(), "");
    assert!(!session.history().can_undo());
}

#[test]
fn test_insert_lines_above_and_below_undo_redo() {
    let mut session = session_with("mid", 0, 1);
    session.insert_line_above();
    session.buffer_mut().set_cursor(pos(1, 0));
    session.insert_line_below();
    assert_eq!(session.buffer().all_lines(), lines(&["", "mid", ""]));

    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.buffer().text(), "mid");
    assert!(session.is_modified());

    session.redo().unwrap();
    session.redo().unwrap();
    assert_eq!(session.buffer().all_lines(), lines(&["", "mid", ""]));
}

// ========================================================================
// Find and replace
// ========================================================================

#[test]
fn test_find_then_replace_current_walk() {
    let mut session = session_with("foo bar foo baz foo", 0, 0);
    session.set_pattern("foo");
    session.set_replacement("qux");

    // The first find starts strictly after the cursor
    session.find_next().unwrap();
    session.replace_current().unwrap();
    session.find_next().unwrap();
    session.replace_current().unwrap();
    assert_eq!(session.buffer().text(), "foo bar qux baz qux");
    assert_eq!(session.count_matches(), 1);
}

#[test]
fn test_replace_all_whole_word() {
    let mut session = session_with("test testing test", 0, 0);
    session.set_search_options(SearchOptions {
        whole_word: true,
        ..SearchOptions::default()
    });
    session.set_pattern("test");
    session.set_replacement("check");
    assert_eq!(session.replace_all().unwrap(), 2);
    assert_eq!(session.buffer().text(), "check testing check");

    session.undo().unwrap();
    assert_eq!(session.buffer().text(), "test testing test");
}

#[test]
fn test_find_previous_moves_cursor() {
    let mut session = session_with("one\ntwo one\nthree", 2, 0);
    session.set_pattern("one");
    let found = session.find_previous().unwrap();
    assert_eq!(found.start, pos(1, 4));
    assert_eq!(session.cursor(), pos(1, 4));
}

// ========================================================================
// Files
// ========================================================================

#[test]
fn test_open_replace_save_keeps_crlf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "one\r\ntwo\r\n").unwrap();

    let mut session = EditSession::default();
    session.open(&path).unwrap();
    session.set_pattern("o");
    session.set_replacement("0");
    assert_eq!(session.replace_all().unwrap(), 2);
    assert!(session.is_modified());
    session.save().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0ne\r\ntw0\r\n");
    assert!(!session.is_modified());
    assert_eq!(session.line_ending(), LineEnding::CrLf);
}

#[test]
fn test_open_discards_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "content").unwrap();

    let mut session = session_with("scratch", 0, 0);
    session.insert_text("x").unwrap();
    session.open(&path).unwrap();
    assert!(!session.history().can_undo());
    assert_eq!(session.buffer().text(), "content");
    assert_eq!(session.cursor(), pos(0, 0));
}

#[test]
fn test_save_as_uses_configured_line_ending() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.txt");
    let config = EditorConfig {
        line_ending: LineEnding::CrLf,
        ..EditorConfig::default()
    };

    let mut session = EditSession::new(&config);
    session.insert_text("a\nb").unwrap();
    session.save_as(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\r\nb");
}
