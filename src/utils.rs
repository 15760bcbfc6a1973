use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

pub const APP_NAME: &str = "dayone-obsidian";

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    // On macOS, this will use ~/Library/Application Support/dayone-obsidian/
    ProjectDirs::from("com", APP_NAME, APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
