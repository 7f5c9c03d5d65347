//! Locations of parkstat's own files

use std::path::PathBuf;

/// Get home directory
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Directory holding parkstat settings (`~/.parkstat`)
pub fn config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".parkstat"))
}

/// Settings file (`~/.parkstat/config.json`)
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.json"))
}
