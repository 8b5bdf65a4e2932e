//! Output-stream redirection for external processes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the external process's stdout and stderr are written.
///
/// Chosen once when an adapter is built and fixed for its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<PathBuf>,
}

/// The active redirection mode. Exactly one applies to a given spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode<'a> {
    /// stdout and stderr share one file.
    Combined(&'a Path),
    StdoutOnly(&'a Path),
    StderrOnly(&'a Path),
    None,
}

impl RedirectionSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn combined(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            stdout: Some(path.clone()),
            stderr: Some(path),
        }
    }

    pub fn stdout_only(path: impl Into<PathBuf>) -> Self {
        Self {
            stdout: Some(path.into()),
            stderr: None,
        }
    }

    pub fn stderr_only(path: impl Into<PathBuf>) -> Self {
        Self {
            stdout: None,
            stderr: Some(path.into()),
        }
    }

    /// Resolve the mode. When both paths are set but differ, stdout wins and
    /// stderr is left alone.
    pub fn mode(&self) -> RedirectMode<'_> {
        match (self.stdout.as_deref(), self.stderr.as_deref()) {
            (Some(out), Some(err)) if out == err => RedirectMode::Combined(out),
            (Some(out), _) => RedirectMode::StdoutOnly(out),
            (None, Some(err)) => RedirectMode::StderrOnly(err),
            (None, None) => RedirectMode::None,
        }
    }

    /// True when both paths are set to different files (stderr will be ignored).
    pub fn discards_stderr_target(&self) -> bool {
        matches!(
            (self.stdout.as_deref(), self.stderr.as_deref()),
            (Some(out), Some(err)) if out != err
        )
    }

    /// Shell-style suffix describing the redirection, for display.
    pub fn suffix(&self) -> Option<String> {
        match self.mode() {
            RedirectMode::Combined(path) => Some(format!(">{} 2>&1", path.display())),
            RedirectMode::StdoutOnly(path) => Some(format!(">{}", path.display())),
            RedirectMode::StderrOnly(path) => Some(format!("2>{}", path.display())),
            RedirectMode::None => None,
        }
    }
}
