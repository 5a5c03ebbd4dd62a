use serde::{Deserialize, Serialize};
use tauri::{Runtime, WebviewWindow};

use crate::error::Result;

// ── Window Chrome ────────────────────────────────────────────────────────────

/// Title-bar buttons drawn by the webview (the window is undecorated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowAction {
    Maximize,
    Minimize,
    Close,
}

pub trait WindowChrome {
    fn is_maximized(&self) -> Result<bool>;
    fn maximize(&self) -> Result<()>;
    fn unmaximize(&self) -> Result<()>;
    fn minimize(&self) -> Result<()>;
    fn close(&self) -> Result<()>;
}

impl<R: Runtime> WindowChrome for WebviewWindow<R> {
    fn is_maximized(&self) -> Result<bool> {
        Ok(WebviewWindow::is_maximized(self)?)
    }

    fn maximize(&self) -> Result<()> {
        Ok(WebviewWindow::maximize(self)?)
    }

    fn unmaximize(&self) -> Result<()> {
        Ok(WebviewWindow::unmaximize(self)?)
    }

    fn minimize(&self) -> Result<()> {
        Ok(WebviewWindow::minimize(self)?)
    }

    fn close(&self) -> Result<()> {
        Ok(WebviewWindow::close(self)?)
    }
}

/// Maximize toggles back to the restored size when already maximized.
pub fn apply<W: WindowChrome>(window: &W, action: WindowAction) -> Result<()> {
    tracing::debug!(?action, "window control");
    match action {
        WindowAction::Maximize => {
            if window.is_maximized()? {
                window.unmaximize()
            } else {
                window.maximize()
            }
        }
        WindowAction::Minimize => window.minimize(),
        WindowAction::Close => window.close(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeWindow {
        maximized: Cell<bool>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl WindowChrome for FakeWindow {
        fn is_maximized(&self) -> Result<bool> {
            Ok(self.maximized.get())
        }
        fn maximize(&self) -> Result<()> {
            self.maximized.set(true);
            self.calls.borrow_mut().push("maximize");
            Ok(())
        }
        fn unmaximize(&self) -> Result<()> {
            self.maximized.set(false);
            self.calls.borrow_mut().push("unmaximize");
            Ok(())
        }
        fn minimize(&self) -> Result<()> {
            self.calls.borrow_mut().push("minimize");
            Ok(())
        }
        fn close(&self) -> Result<()> {
            self.calls.borrow_mut().push("close");
            Ok(())
        }
    }

    #[test]
    fn test_action_names_deserialize() {
        let action: WindowAction = serde_json::from_str("\"maximize\"").unwrap();
        assert_eq!(action, WindowAction::Maximize);
        let action: WindowAction = serde_json::from_str("\"close\"").unwrap();
        assert_eq!(action, WindowAction::Close);
        assert!(serde_json::from_str::<WindowAction>("\"fullscreen\"").is_err());
    }

    #[test]
    fn test_maximize_toggles() {
        let window = FakeWindow::default();
        apply(&window, WindowAction::Maximize).unwrap();
        apply(&window, WindowAction::Maximize).unwrap();
        assert_eq!(*window.calls.borrow(), vec!["maximize", "unmaximize"]);
    }

    #[test]
    fn test_minimize_and_close_forward() {
        let window = FakeWindow::default();
        apply(&window, WindowAction::Minimize).unwrap();
        apply(&window, WindowAction::Close).unwrap();
        assert_eq!(*window.calls.borrow(), vec!["minimize", "close"]);
    }
}
