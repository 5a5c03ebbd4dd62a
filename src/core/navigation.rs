use tauri::plugin::{Builder, TauriPlugin};
use tauri::Runtime;

/// Extended mouse buttons (3 = back, 4 = forward) must not navigate the webview.
pub const SUPPRESS_NAVIGATION_BUTTONS: &str = r#"
window.addEventListener("mouseup", (e) => {
    if (e.button === 3 || e.button === 4) e.preventDefault();
});
"#;

pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("navigation-guard")
        .js_init_script(SUPPRESS_NAVIGATION_BUTTONS.to_string())
        .build()
}
