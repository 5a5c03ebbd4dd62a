mod config;
mod dialog;
mod logging;
mod navigation;
mod paths;
mod store;
mod window;

pub use config::AppConfig;
pub use dialog::{request_folder, FolderPicker, FolderRequests, OnPick};
pub use logging::init as init_logging;
pub use navigation::{init as navigation_guard, SUPPRESS_NAVIGATION_BUTTONS};
pub use paths::{get_config_dir, is_folder_valid, APP_DIR_NAME};
pub use store::SettingsStore;
pub use window::{apply as apply_window_action, WindowAction, WindowChrome};
