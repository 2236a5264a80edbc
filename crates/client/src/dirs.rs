//! Platform-specific directory utilities
//!
//! Follows platform conventions for cache and data directories, with a
//! relative fallback when no home directory is known.

use std::path::PathBuf;

const APP: &str = "cultivation-sim";

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/cultivation-sim/logs`
/// - Linux: `~/.cache/cultivation-sim/logs` (or `$XDG_CACHE_HOME/...`)
/// - Windows: `%LOCALAPPDATA%\cultivation-sim\logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP))
        .join("logs")
}

/// Where battle sessions are persisted between runs.
pub fn battle_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("battles")
}
