use serde_json::Value;
use tauri::State;

use crate::error::BridgeError;
use crate::proxy::CapabilityProxy;

// ── Streamduck Proxy ─────────────────────────────────────────────────────────

/// Names the webview may pass to `sd_call`.
#[tauri::command]
pub fn sd_operations(proxy: State<'_, CapabilityProxy>) -> Vec<String> {
    proxy.operations()
}

/// Forward one call through the capability proxy. Arguments are positional.
#[tauri::command]
pub async fn sd_call(
    proxy: State<'_, CapabilityProxy>,
    operation: String,
    args: Option<Vec<Value>>,
) -> Result<Value, BridgeError> {
    let reply = proxy.call(&operation, args.unwrap_or_default())?;
    reply.settle().await
}
