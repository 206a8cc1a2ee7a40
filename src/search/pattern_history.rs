//! Bounded history of search patterns with a browse cursor.
//!
//! Persisted to `search_history.json` in the config directory so recent
//! patterns survive restarts.

use serde::{Deserialize, Serialize};

/// Maximum number of patterns to keep
pub const MAX_PATTERNS: usize = 20;

/// Search patterns, oldest first, without consecutive duplicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternHistory {
    /// Schema version for forward compatibility
    #[serde(default)]
    pub version: u32,
    entries: Vec<String>,
    /// Index of the entry shown while browsing
    #[serde(skip)]
    cursor: Option<usize>,
}

impl Default for PatternHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternHistory {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// Record a pattern and point the browse cursor at it.
    ///
    /// Empty patterns and repeats of the newest entry are not stored again.
    pub fn add(&mut self, pattern: &str) {
        if pattern.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) != Some(pattern) {
            self.entries.push(pattern.to_string());
            if self.entries.len() > MAX_PATTERNS {
                let excess = self.entries.len() - MAX_PATTERNS;
                self.entries.drain(..excess);
            }
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step the browse cursor one entry older
    pub fn older(&mut self) -> Option<&str> {
        let idx = match self.cursor {
            Some(0) => return None,
            Some(idx) => idx - 1,
            None => self.entries.len().checked_sub(1)?,
        };
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    /// Step the browse cursor one entry newer
    pub fn newer(&mut self) -> Option<&str> {
        let idx = self.cursor? + 1;
        if idx >= self.entries.len() {
            return None;
        }
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    /// Entry under the browse cursor
    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|idx| self.entries.get(idx))
            .map(String::as_str)
    }

    /// All patterns, oldest first
    pub fn patterns(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Load pattern history from disk
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::search_history_path() else {
            return Self::new();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let mut history: Self = serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    Self::new()
                });
                history.truncate_to_capacity();
                history
            }
            Err(_) => Self::new(),
        }
    }

    /// Save pattern history to disk
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = crate::config_paths::search_history_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory available",
            ));
        };
        crate::config_paths::ensure_config_dir()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
    }

    fn truncate_to_capacity(&mut self) {
        if self.entries.len() > MAX_PATTERNS {
            let excess = self.entries.len() - MAX_PATTERNS;
            self.entries.drain(..excess);
        }
        self.version = Self::CURRENT_VERSION;
    }
}
