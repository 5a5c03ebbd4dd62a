use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;

use crate::error::{BridgeError, Result};

// ── Folder Dialog ────────────────────────────────────────────────────────────

type Completion = oneshot::Sender<Option<PathBuf>>;

/// Outstanding folder-picker requests, keyed by request id. Each request
/// owns its completion handle, so overlapping dialogs answer independently.
#[derive(Default)]
pub struct FolderRequests {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, Completion>>,
}

impl FolderRequests {
    pub fn begin(&self) -> (u64, oneshot::Receiver<Option<PathBuf>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.lock().insert(id, tx);
        (id, rx)
    }

    /// Returns false when `id` was never issued or already answered.
    pub fn complete(&self, id: u64, folder: Option<PathBuf>) -> bool {
        match self.lock().remove(&id) {
            Some(tx) => tx.send(folder).is_ok(),
            None => {
                tracing::debug!(id, "folder dialog response for unknown request");
                false
            }
        }
    }

    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Completion>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub type OnPick = Box<dyn FnOnce(Option<PathBuf>) + Send + 'static>;

/// Shows a native folder picker and reports the choice exactly once.
pub trait FolderPicker {
    fn pick_folder(&self, on_pick: OnPick);
}

impl<R: Runtime> FolderPicker for AppHandle<R> {
    fn pick_folder(&self, on_pick: OnPick) {
        self.dialog().file().pick_folder(move |folder| {
            on_pick(folder.and_then(|f| f.into_path().ok()));
        });
    }
}

/// Open a picker and wait for its answer. `None` means the user cancelled.
pub async fn request_folder<P: FolderPicker>(
    requests: Arc<FolderRequests>,
    picker: &P,
) -> Result<Option<PathBuf>> {
    let (id, answer) = requests.begin();
    let table = Arc::clone(&requests);
    picker.pick_folder(Box::new(move |folder| {
        table.complete(id, folder);
    }));
    answer.await.map_err(|_| BridgeError::Dialog)
}
