use crate::core;

// ── Filesystem ───────────────────────────────────────────────────────────────

#[tauri::command]
pub fn fs_is_folder_valid(path: &str) -> bool {
    core::is_folder_valid(path)
}
