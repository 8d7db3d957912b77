//! Temporary file cleanup
//!
//! `TempFiles` owns the per-request scratch paths and removes them when it
//! goes out of scope, whichever way the request ends.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Remove each path that exists. Failures are logged, never raised.
pub fn cleanup<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}

/// Paths removed when the guard is dropped
#[derive(Debug, Default)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` for removal and hand it back
    pub fn register(&mut self, path: PathBuf) -> PathBuf {
        self.paths.push(path.clone());
        path
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        cleanup(&self.paths);
    }
}
