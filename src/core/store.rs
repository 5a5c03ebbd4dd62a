use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::paths::get_config_dir;
use crate::error::Result;

// ── Settings Store (<config dir>/config.json) ────────────────────────────────

/// Flat key-value settings for the webview. Values are opaque JSON; every
/// mutation is written through to disk.
pub struct SettingsStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl SettingsStore {
    pub fn open_default() -> Result<SettingsStore> {
        Ok(Self::open(get_config_dir()?.join("config.json")))
    }

    /// Never fails: a settings file that cannot be read or parsed is logged
    /// and the store starts empty at the same path.
    pub fn open(path: impl Into<PathBuf>) -> SettingsStore {
        let path = path.into();
        let values = match load(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(path = %path.display(), "settings file unreadable, starting empty: {}", e);
                Map::new()
            }
        };

        SettingsStore {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let mut values = self.lock();
        values.insert(name.to_string(), value);
        self.persist(&values)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.lock().get(name).cloned()
    }

    pub fn clear(&self, name: &str) -> Result<()> {
        let mut values = self.lock();
        if values.remove(name).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

fn load(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
