// src/paths.rs
// Single source of truth for where FrameDeck's save dialogs open.

use std::path::PathBuf;

/// The user's Downloads directory where it exists, else the OS temp dir.
/// Only a dialog starting point — the user picks the final destination.
pub fn default_download_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let base = std::env::var("USERPROFILE").map(PathBuf::from).ok();
    #[cfg(not(target_os = "windows"))]
    let base = std::env::var("HOME").map(PathBuf::from).ok();

    base.map(|home| home.join("Downloads"))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(std::env::temp_dir)
}
