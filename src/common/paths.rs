//! Configuration paths

use std::path::PathBuf;

/// Name of the application directory
const APP_NAME: &str = "suite-replay";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/suite-replay/`
/// - macOS: `~/Library/Application Support/suite-replay/`
/// - Windows: `%APPDATA%\suite-replay\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
