pub mod core;
pub mod error;
pub mod proxy;
pub mod streamduck;

mod commands;

use std::sync::Arc;
use tauri::{AppHandle, Emitter, Manager, Runtime};
use tokio::sync::mpsc;

use proxy::CapabilityProxy;
use streamduck::{StreamduckClient, StreamduckEvent};

/// Webview event carrying [`StreamduckEvent`]s.
pub const STREAMDUCK_EVENT: &str = "streamduck-event";

// ── App Entry ────────────────────────────────────────────────────────────────

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::*;

    let (config, config_error) = match core::AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (core::AppConfig::default(), Some(e)),
    };
    core::init_logging(&config.log_level);
    if let Some(e) = config_error {
        tracing::error!("falling back to default config: {}", e);
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(core::navigation_guard())
        .setup(move |app| {
            let store = core::SettingsStore::open_default()?;
            tracing::info!(path = %store.path().display(), "settings store opened");
            app.manage(store);
            app.manage(Arc::new(core::FolderRequests::default()));

            let client_config = match config.client_config() {
                Ok(client_config) => client_config,
                Err(e) => {
                    tracing::error!("{}; using the default daemon address", e);
                    core::AppConfig::default().client_config()?
                }
            };
            tracing::info!(url = %client_config.url, "connecting to streamduck daemon");
            let (client, events) = StreamduckClient::spawn(client_config);

            // Built once; the webview only ever sees it through sd_call.
            let proxy = CapabilityProxy::generate(client);
            tracing::info!(operations = ?proxy.operations(), "streamduck proxy ready");
            app.manage(proxy);

            forward_events(app.handle().clone(), events);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            control_button,
            store_set,
            store_get,
            store_clear,
            dialog_folder,
            fs_is_folder_valid,
            sd_operations,
            sd_call,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn forward_events<R: Runtime>(app: AppHandle<R>, mut events: mpsc::Receiver<StreamduckEvent>) {
    tauri::async_runtime::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "daemon event");
            if let Err(e) = app.emit(STREAMDUCK_EVENT, &event) {
                tracing::warn!("failed to forward daemon event: {}", e);
            }
        }
    });
}
