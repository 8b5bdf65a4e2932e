//! Reportable events and the sink they are emitted into.
//!
//! Every component that has something to report (scratch lifecycle, command
//! execution, process failure, output reading) receives an
//! `Arc<dyn EventSink>` instead of logging through a global. Production code
//! uses [`TracingSink`]; tests swap in a recording sink.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ScratchCreated {
        path: PathBuf,
    },
    ScratchRemoved {
        path: PathBuf,
    },
    ScratchCleanupFailed {
        path: PathBuf,
        error: String,
    },
    /// A command is about to be launched. `command` includes the redirection suffix.
    Executing {
        command: String,
    },
    /// The external process exited non-zero.
    ProcessFailed {
        command: String,
        code: i32,
    },
    ReadingOutput {
        path: PathBuf,
    },
    /// Both redirection paths were set to different files; stderr is not redirected.
    StderrRedirectIgnored {
        stdout: PathBuf,
        stderr: PathBuf,
    },
}

/// Destination for [`Event`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        match event {
            Event::ScratchCreated { path } => debug!(path = %path.display(), "created scratch area"),
            Event::ScratchRemoved { path } => debug!(path = %path.display(), "removed scratch area"),
            Event::ScratchCleanupFailed { path, error } => {
                warn!(path = %path.display(), err = %error, "failed to remove scratch area");
            }
            Event::Executing { command } => info!(%command, "executing"),
            Event::ProcessFailed { command, code } => {
                error!(%command, code, "external process failed");
            }
            Event::ReadingOutput { path } => info!(path = %path.display(), "reading output"),
            Event::StderrRedirectIgnored { stdout, stderr } => warn!(
                stdout = %stdout.display(),
                stderr = %stderr.display(),
                "stdout and stderr targets differ; only stdout is redirected"
            ),
        }
    }
}

pub fn tracing_sink() -> Arc<dyn EventSink> {
    Arc::new(TracingSink)
}
