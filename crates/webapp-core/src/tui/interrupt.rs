//! Ctrl+C handling that removes a half-generated project

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Exit code used when the run is interrupted
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Shared handle to the directory an interrupt should remove
///
/// `install` registers the process-wide handler and must be called once,
/// from the entry point. The watched path is updated through `watch` and
/// `release` as the run progresses.
#[derive(Debug, Clone, Default)]
pub struct InterruptGuard {
    path: Arc<Mutex<Option<PathBuf>>>,
}

impl InterruptGuard {
    /// Register the Ctrl+C handler and return the guard controlling it
    pub fn install() -> Self {
        let guard = Self::default();
        let handler_guard = guard.clone();

        ctrlc::set_handler(move || {
            let _ = console::Term::stderr().show_cursor();
            if let Some(path) = handler_guard.watched() {
                let _ = std::fs::remove_dir_all(path);
            }
            std::process::exit(INTERRUPTED_EXIT_CODE);
        })
        .ok();

        guard
    }

    /// Remove `path` if the process is interrupted from now on
    pub fn watch(&self, path: &Path) {
        if let Ok(mut watched) = self.path.lock() {
            *watched = Some(path.to_path_buf());
        }
    }

    /// Stop removing anything on interrupt
    pub fn release(&self) {
        if let Ok(mut watched) = self.path.lock() {
            *watched = None;
        }
    }

    /// Directory an interrupt would remove right now
    pub fn watched(&self) -> Option<PathBuf> {
        self.path.lock().ok().and_then(|p| p.clone())
    }
}
