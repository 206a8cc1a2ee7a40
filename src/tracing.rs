//! Log output for the `tedit` binary.
//!
//! Two sinks are installed. Stderr shows warnings and errors unless
//! `RUST_LOG` asks for more, e.g. `RUST_LOG=tedit::search=debug` for
//! pattern compilation and replace decisions, or
//! `RUST_LOG=tedit::editable=trace` for every buffer mutation and cursor
//! move. A daily-rotated `tedit.log` under the config directory's `logs/`
//! always records `debug` and above, which covers file loads and saves,
//! undo/redo and replace counts.

use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Name prefix of the daily log files
pub const LOG_FILE_NAME: &str = "tedit.log";

/// Install the global subscriber. Call once, first thing in `main`.
///
/// A log directory that cannot be created is reported on stderr and only
/// the stderr sink is installed; the command itself still runs.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => Some(file_layer(&logs_dir)),
        Err(e) => {
            eprintln!("tedit: file logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn file_layer<S>(logs_dir: &Path) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
    fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("debug"))
}
