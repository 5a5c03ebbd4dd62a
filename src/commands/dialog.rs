use std::sync::Arc;
use tauri::{AppHandle, State};

use crate::core::{self, FolderRequests};
use crate::error::BridgeError;

// ── Folder Dialog ────────────────────────────────────────────────────────────

/// Resolves with the chosen folder, or `null` when the picker is cancelled.
#[tauri::command]
pub async fn dialog_folder(
    app: AppHandle,
    requests: State<'_, Arc<FolderRequests>>,
) -> Result<Option<String>, BridgeError> {
    let folder = core::request_folder(Arc::clone(requests.inner()), &app).await?;
    Ok(folder.map(|path| path.to_string_lossy().into_owned()))
}
