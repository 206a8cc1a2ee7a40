//! Benchmarks for buffer editing and history replay
//!
//! Run with: cargo bench buffer_operations

use tedit::editable::{Buffer, History, Operation, Position};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn sample_buffer(line_count: usize) -> Buffer {
    let text = (0..line_count)
        .map(|i| format!("line {i}: some sample text for editing"))
        .collect::<Vec<_>>()
        .join("\n");
    Buffer::from_text(&text)
}

// ============================================================================
// Insert / delete
// ============================================================================

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn insert_char_middle(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| sample_buffer(line_count))
        .bench_local_values(|mut buffer| {
            buffer.insert(Position::new(line_count / 2, 5), "x").ok();
            buffer
        });
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn insert_multiline_middle(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| sample_buffer(line_count))
        .bench_local_values(|mut buffer| {
            buffer
                .insert(Position::new(line_count / 2, 5), "first\nsecond\nthird")
                .ok();
            buffer
        });
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn delete_across_lines(bencher: divan::Bencher, line_count: usize) {
    let start = Position::new(line_count / 4, 3);
    let end = Position::new(line_count / 2, 7);
    bencher
        .with_inputs(|| sample_buffer(line_count))
        .bench_local_values(|mut buffer| {
            buffer.delete(start, end).ok();
            buffer
        });
}

#[divan::bench(args = [1_000, 10_000])]
fn get_text_range(bencher: divan::Bencher, line_count: usize) {
    let buffer = sample_buffer(line_count);
    let end = Position::new(line_count - 1, 4);
    bencher.bench_local(|| divan::black_box(buffer.get_text(Position::new(0, 2), end)));
}

// ============================================================================
// Cursor movement
// ============================================================================

#[divan::bench]
fn move_word_right_across_document(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| sample_buffer(1_000))
        .bench_local_values(|mut buffer| {
            for _ in 0..5_000 {
                buffer.move_word_right();
            }
            buffer
        });
}

// ============================================================================
// History
// ============================================================================

#[divan::bench(args = [10, 100])]
fn undo_redo_inserts(bencher: divan::Bencher, edits: usize) {
    bencher
        .with_inputs(|| {
            let mut buffer = sample_buffer(1_000);
            let mut history = History::new(edits);
            for i in 0..edits {
                let pos = Position::new(i, 0);
                buffer.insert(pos, "edit ").ok();
                history.push(Operation::insert(pos, "edit "));
            }
            (buffer, history)
        })
        .bench_local_values(|(mut buffer, mut history)| {
            while history.undo(&mut buffer).is_ok() {}
            while history.redo(&mut buffer).is_ok() {}
            (buffer, history)
        });
}
