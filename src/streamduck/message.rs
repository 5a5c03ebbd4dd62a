use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::base::NamespacedName;

// ── Envelopes ───────────────────────────────────────────────────────────────

/// Outgoing request. `RequestID` correlates the daemon's answer.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SocketMessage {
    pub name: NamespacedName,
    pub data: Value,
    #[serde(rename = "RequestID")]
    pub request_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SocketResponse {
    #[serde(rename = "RequestID")]
    pub request_id: String,
    #[serde(default)]
    pub data: Value,
}

impl SocketResponse {
    /// Responses signal failure with an `{"Error": "..."}` body.
    pub fn into_result(self) -> Result<Value, String> {
        match self.data.get("Error") {
            Some(Value::String(reason)) => Err(reason.clone()),
            Some(other) => Err(other.to_string()),
            None => Ok(self.data),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SocketEvent {
    pub plugin_name: String,
    pub event_name: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SocketError {
    pub error: String,
}

/// Anything the daemon may push down the socket.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Incoming {
    Response(SocketResponse),
    Event(SocketEvent),
    Error(SocketError),
}
