//! Where tedit keeps its files on disk.
//!
//! One directory holds the YAML config, the persisted search patterns and
//! the rolling log files. It is resolved per platform and never created
//! until something needs to write there.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "tedit";

/// Directory for tedit's config, search history and logs.
///
/// Windows uses `%APPDATA%\tedit`. Elsewhere `$XDG_CONFIG_HOME/tedit` wins
/// over `~/.config/tedit`. `None` when neither base can be determined.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// The `EditorConfig` file
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// JSON file backing `PatternHistory::load` and `save`
pub fn search_history_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("search_history.json"))
}

/// Daily log files go here
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Create the config directory if needed. Called before any save.
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Create the log directory (and its parent) if needed
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
