use serde_json::Value;
use tauri::State;

use crate::core::SettingsStore;
use crate::error::BridgeError;

// ── Settings Store ───────────────────────────────────────────────────────────

#[tauri::command]
pub fn store_set(store: State<'_, SettingsStore>, name: &str, value: Value) -> Result<(), BridgeError> {
    store.set(name, value)
}

#[tauri::command]
pub fn store_get(store: State<'_, SettingsStore>, name: &str) -> Option<Value> {
    store.get(name)
}

#[tauri::command]
pub fn store_clear(store: State<'_, SettingsStore>, name: &str) -> Result<(), BridgeError> {
    store.clear(name)
}
