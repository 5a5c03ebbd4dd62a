// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    // One runtime for the daemon client and Tauri's async commands. The
    // client is spawned from the setup hook on this thread, so keep the
    // runtime entered for the life of the app.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");
    tauri::async_runtime::set(rt.handle().clone());

    let _guard = rt.enter();

    streamduck_desktop_lib::run();
}
