//! Command-line front end
//!
//! Supports:
//! - `find`: list every match as `path:line:col:text` (1-based)
//! - `replace`: replace every match in place, or count with `--dry-run`
//! - `stat`: line count, size, line ending and encoding per file

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::EditorConfig;
use crate::file_io;
use crate::search::{PatternHistory, SearchOptions};
use crate::session::EditSession;

/// Find and replace across text files
#[derive(Parser, Debug)]
#[command(name = "tedit", version, about = "Find and replace across text files")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every match as path:line:col:text
    Find {
        pattern: String,
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
        #[command(flatten)]
        search: SearchFlags,
    },

    /// Replace every match and save each file
    Replace {
        pattern: String,
        replacement: String,
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
        #[command(flatten)]
        search: SearchFlags,
        /// Count matches without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print line count, size, line ending and encoding
    Stat {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },
}

/// Search flags layered over the configured search options
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SearchFlags {
    /// Treat the pattern as a regular expression
    #[arg(short = 'e', long)]
    pub regex: bool,

    /// Match regardless of case
    #[arg(short = 'i', long, conflicts_with = "case_sensitive")]
    pub ignore_case: bool,

    /// Match case exactly
    #[arg(short = 's', long)]
    pub case_sensitive: bool,

    /// Only match whole words
    #[arg(short = 'w', long)]
    pub whole_word: bool,
}

impl SearchFlags {
    /// Flags switch options on; `-s` and `-i` override the configured case
    /// sensitivity either way
    pub fn apply(self, base: SearchOptions) -> SearchOptions {
        let case_sensitive = if self.case_sensitive {
            true
        } else if self.ignore_case {
            false
        } else {
            base.case_sensitive
        };
        SearchOptions {
            case_sensitive,
            whole_word: base.whole_word || self.whole_word,
            use_regex: base.use_regex || self.regex,
            wrap_around: base.wrap_around,
        }
    }
}

impl CliArgs {
    /// Pattern this invocation searches for, if any
    pub fn pattern(&self) -> Option<&str> {
        match &self.command {
            Command::Find { pattern, .. } | Command::Replace { pattern, .. } => {
                Some(pattern.as_str())
            }
            Command::Stat { .. } => None,
        }
    }

    /// Reject a pattern or replacement the command could not use
    pub fn check(&self, config: &EditorConfig) -> Result<()> {
        match &self.command {
            Command::Find {
                pattern, search, ..
            } => check_pattern(config, pattern, "", search.apply(config.search)),
            Command::Replace {
                pattern,
                replacement,
                search,
                ..
            } => check_pattern(config, pattern, replacement, search.apply(config.search)),
            Command::Stat { .. } => Ok(()),
        }
    }

    /// Execute the command, writing results to `out`.
    ///
    /// Per-file failures are reported on stderr and the remaining files are
    /// still processed; the overall result is an error if any file failed.
    pub fn run(&self, config: &EditorConfig, out: &mut impl Write) -> Result<()> {
        self.check(config)?;
        let failures = match &self.command {
            Command::Find {
                pattern,
                files,
                search,
            } => {
                let options = search.apply(config.search);
                for_each_file(files, |path| find_in_file(config, path, pattern, options, out))
            }
            Command::Replace {
                pattern,
                replacement,
                files,
                search,
                dry_run,
            } => {
                let options = search.apply(config.search);
                for_each_file(files, |path| {
                    replace_in_file(config, path, pattern, replacement, options, *dry_run, out)
                })
            }
            Command::Stat { files } => for_each_file(files, |path| stat_file(path, out)),
        };

        if failures > 0 {
            bail!("{} file(s) could not be processed", failures);
        }
        Ok(())
    }
}

/// Record the pattern in persisted search history when enabled
pub fn remember_pattern(config: &EditorConfig, pattern: &str) {
    if !config.persist_search_history {
        return;
    }
    let mut history = PatternHistory::load();
    history.add(pattern);
    if let Err(e) = history.save() {
        tracing::warn!("Failed to save search history: {}", e);
    }
}

fn for_each_file(files: &[PathBuf], mut f: impl FnMut(&Path) -> Result<()>) -> usize {
    let mut failures = 0;
    for path in files {
        if let Err(e) = f(path) {
            eprintln!("tedit: {:#}", e);
            failures += 1;
        }
    }
    failures
}

fn session_for(
    config: &EditorConfig,
    path: &Path,
    pattern: &str,
    options: SearchOptions,
) -> Result<EditSession> {
    let mut session = EditSession::new(config);
    session
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    session.set_search_options(options);
    session.set_pattern(pattern);
    Ok(session)
}

/// Reject an uncompilable regex or a malformed replacement before any file
/// is touched
fn check_pattern(
    config: &EditorConfig,
    pattern: &str,
    replacement: &str,
    options: SearchOptions,
) -> Result<()> {
    let mut session = EditSession::new(config);
    session.set_search_options(options);
    session.set_pattern(pattern);
    session.set_replacement(replacement);
    if !session.replacer().is_pattern_valid() {
        bail!("invalid regular expression: {}", pattern);
    }
    session
        .replacer()
        .validate_replacement()
        .with_context(|| format!("invalid replacement: {}", replacement))?;
    Ok(())
}

fn find_in_file(
    config: &EditorConfig,
    path: &Path,
    pattern: &str,
    options: SearchOptions,
    out: &mut impl Write,
) -> Result<()> {
    let mut session = session_for(config, path, pattern, options)?;
    let matches = session.find_all().to_vec();
    for m in matches {
        let line = session.buffer().line(m.start.line).unwrap_or_default();
        writeln!(
            out,
            "{}:{}:{}:{}",
            path.display(),
            m.start.line + 1,
            m.start.column + 1,
            line
        )?;
    }
    Ok(())
}

fn replace_in_file(
    config: &EditorConfig,
    path: &Path,
    pattern: &str,
    replacement: &str,
    options: SearchOptions,
    dry_run: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut session = session_for(config, path, pattern, options)?;
    if dry_run {
        let count = session.count_matches();
        writeln!(out, "{}: {} match(es)", path.display(), count)?;
        return Ok(());
    }

    session.set_replacement(replacement);
    let count = session
        .replace_all()
        .with_context(|| format!("failed to replace in {}", path.display()))?;
    if count > 0 {
        session
            .save()
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    writeln!(out, "{}: {} replacement(s)", path.display(), count)?;
    Ok(())
}

fn stat_file(path: &Path, out: &mut impl Write) -> Result<()> {
    let (lines, info) = file_io::read_file_with_info(path)
        .map_err(|e| anyhow::anyhow!(e.user_message(&file_io::filename_for_display(path))))?;
    writeln!(
        out,
        "{}: {} lines, {} bytes, {}, {}",
        path.display(),
        lines.len(),
        info.size,
        info.line_ending.name(),
        info.encoding
    )?;
    Ok(())
}
