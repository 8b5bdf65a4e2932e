//! Per-adapter scratch directories.
//!
//! A [`ScratchArea`] is created once when an adapter is built and removed
//! exactly once: either explicitly through [`ScratchArea::destroy`] or when it
//! is dropped. Removal is best-effort and never fails the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::{GmxError, Result};
use crate::events::{Event, EventSink};

/// Environment variable consulted for the identity prefix when none is configured.
pub const DEFAULT_IDENTITY_VAR: &str = "LOGNAME";

/// Read the scratch-directory identity from the environment variable `var`.
pub fn resolve_identity(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GmxError::Environment {
            var: var.to_string(),
        }),
    }
}

pub struct ScratchArea {
    path: PathBuf,
    dir: Option<TempDir>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for ScratchArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchArea")
            .field("path", &self.path)
            .field("live", &self.dir.is_some())
            .finish()
    }
}

impl ScratchArea {
    /// Create `<tmp>/<identity>.<label>.<random>`.
    pub fn create(identity: &str, label: &str, sink: Arc<dyn EventSink>) -> Result<Self> {
        Self::create_in(&std::env::temp_dir(), identity, label, sink)
    }

    /// Create `<root>/<identity>.<label>.<random>`.
    pub fn create_in(
        root: &Path,
        identity: &str,
        label: &str,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let prefix = scratch_prefix(identity, label);
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(root)
            .map_err(|e| {
                GmxError::io(format!("create scratch area in {}", root.display()), e)
            })?;
        let path = dir.path().to_path_buf();
        sink.emit(Event::ScratchCreated { path: path.clone() });
        Ok(Self {
            path,
            dir: Some(dir),
            sink,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// False once [`Self::destroy`] has run.
    pub fn is_live(&self) -> bool {
        self.dir.is_some()
    }

    /// Recursively remove the directory.
    ///
    /// Safe to call any number of times; tolerates the directory having been
    /// removed by someone else. Failures are reported to the sink only.
    pub fn destroy(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => self.sink.emit(Event::ScratchRemoved {
                path: self.path.clone(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.sink.emit(Event::ScratchRemoved {
                    path: self.path.clone(),
                });
            }
            Err(e) => self.sink.emit(Event::ScratchCleanupFailed {
                path: self.path.clone(),
                error: e.to_string(),
            }),
        }
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        self.destroy();
    }
}

pub fn scratch_prefix(identity: &str, label: &str) -> String {
    format!("{identity}.{label}.")
}
