//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/tedit/config.yaml`

use serde::{Deserialize, Serialize};

use crate::editable::{DEFAULT_MAX_DEPTH, DEFAULT_PAGE_SIZE};
use crate::file_io::LineEnding;
use crate::search::SearchOptions;

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of undo steps (0 means the default of 100)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Lines moved by page up/down (0 means the default of 10)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Initial search options for find/replace
    #[serde(default)]
    pub search: SearchOptions,

    /// Line ending used when saving a new document
    #[serde(default)]
    pub line_ending: LineEnding,

    /// Keep search patterns in `search_history.json` between runs
    #[serde(default = "default_true")]
    pub persist_search_history: bool,
}

fn default_history_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
            page_size: default_page_size(),
            search: SearchOptions::default(),
            line_ending: LineEnding::default(),
            persist_search_history: true,
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Undo depth with 0 mapped to the default
    pub fn effective_history_depth(&self) -> usize {
        if self.history_depth == 0 {
            DEFAULT_MAX_DEPTH
        } else {
            self.history_depth
        }
    }

    /// Page size with 0 mapped to the default
    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}
