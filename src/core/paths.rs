use std::path::{Path, PathBuf};

use crate::error::{BridgeError, Result};

// ── Path Helpers ─────────────────────────────────────────────────────────────

pub const APP_DIR_NAME: &str = "streamduck-desktop";

/// `~/.config/streamduck-desktop` (or the platform equivalent).
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(BridgeError::MissingDirectory("config"))?;
    Ok(base.join(APP_DIR_NAME))
}

/// True iff `path` exists and is a directory. Any failure reads as `false`.
pub fn is_folder_valid(path: impl AsRef<Path>) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_dir(),
        Err(_) => false,
    }
}
