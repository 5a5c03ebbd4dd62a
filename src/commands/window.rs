use tauri::WebviewWindow;

use crate::core::{self, WindowAction};
use crate::error::BridgeError;

// ── Window Controls ──────────────────────────────────────────────────────────

#[tauri::command]
pub fn control_button(window: WebviewWindow, action: WindowAction) -> Result<(), BridgeError> {
    core::apply_window_action(&window, action)
}
