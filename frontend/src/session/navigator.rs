use log::warn;

use crate::utils::storage as storage_utils;

/// Programmatic navigation as seen by the guard.
pub trait Navigator {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
}

/// Full-page navigation through `window.location`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        storage_utils::current_pathname().unwrap_or_else(|_| "/".to_string())
    }

    fn redirect(&self, path: &str) {
        match storage_utils::window() {
            Ok(win) => {
                if win.location().set_href(path).is_err() {
                    warn!("Failed to navigate to {}", path);
                }
            }
            Err(err) => warn!("Cannot navigate to {}: {}", path, err),
        }
    }
}
