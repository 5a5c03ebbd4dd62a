use serde::{Serialize, Serializer};
use thiserror::Error;

// ── Bridge Errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse bridge.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),
    /// Carries the already-composed "Failed {op} request: {reason}" message.
    #[error("{0}")]
    OperationFailed(String),
    #[error("Window error: {0}")]
    Window(String),
    #[error("Folder dialog closed without a response")]
    Dialog,
    #[error("Could not find {0} directory")]
    MissingDirectory(&'static str),
    #[error(transparent)]
    Client(#[from] crate::streamduck::ClientError),
}

/// Commands hand errors to the webview as their display string.
impl Serialize for BridgeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<tauri::Error> for BridgeError {
    fn from(e: tauri::Error) -> Self {
        BridgeError::Window(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
