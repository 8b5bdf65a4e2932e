//! Synchronous execution of external tools with optional stream redirection.

use std::fs::File;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::core::command::CommandInvocation;
use crate::core::redirect::RedirectMode;
use crate::error::{GmxError, Result};
use crate::events::{Event, EventSink};

/// Exit status of one external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Rendered command line, including the redirection suffix.
    pub command: String,
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Abstraction over how commands are executed.
///
/// Implementations run exactly one process per call and block until it exits.
/// A non-zero exit is not an error: it is reported and returned in the
/// [`ExecutionResult`]. Errors are reserved for failures to open redirection
/// targets or to launch the process at all.
pub trait ProcessRunner {
    fn execute(&self, invocation: &CommandInvocation) -> Result<ExecutionResult>;
}

/// Runs commands as real child processes.
pub struct SystemProcessRunner {
    sink: Arc<dyn EventSink>,
    stdout_to_stderr: bool,
}

impl SystemProcessRunner {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            stdout_to_stderr: false,
        }
    }

    /// When the redirection leaves stdout alone, send the tool's stdout to
    /// this process's stderr instead of inheriting it. Keeps the caller's own
    /// stdout free for its results.
    pub fn with_stdout_to_stderr(mut self) -> Self {
        self.stdout_to_stderr = true;
        self
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(program = invocation.program()))]
    fn execute(&self, invocation: &CommandInvocation) -> Result<ExecutionResult> {
        let command = invocation.render();
        let mut cmd = invocation.to_command();

        // The Command owns the redirection handles; they are closed when it
        // drops at the end of this call, whichever way it returns.
        let (stdout, stderr) = open_targets(invocation.redirection().mode())?;
        match stdout {
            Some(file) => {
                cmd.stdout(Stdio::from(file));
            }
            None if self.stdout_to_stderr => {
                cmd.stdout(Stdio::from(std::io::stderr()));
            }
            None => {}
        }
        if let Some(file) = stderr {
            cmd.stderr(Stdio::from(file));
        }

        self.sink.emit(Event::Executing {
            command: command.clone(),
        });
        let status = cmd.status().map_err(|source| GmxError::Spawn {
            program: invocation.program().to_string(),
            source,
        })?;

        let code = status.code().unwrap_or(-1);
        debug!(code, "command finished");
        if code != 0 {
            self.sink.emit(Event::ProcessFailed {
                command: command.clone(),
                code,
            });
        }
        Ok(ExecutionResult { command, code })
    }
}

/// Open (truncating) the files the given mode redirects into.
fn open_targets(mode: RedirectMode<'_>) -> Result<(Option<File>, Option<File>)> {
    match mode {
        RedirectMode::Combined(path) => {
            let out = create(path)?;
            let err = out
                .try_clone()
                .map_err(|e| GmxError::io(format!("duplicate handle {}", path.display()), e))?;
            Ok((Some(out), Some(err)))
        }
        RedirectMode::StdoutOnly(path) => Ok((Some(create(path)?), None)),
        RedirectMode::StderrOnly(path) => Ok((None, Some(create(path)?))),
        RedirectMode::None => Ok((None, None)),
    }
}

fn create(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|e| GmxError::io(format!("open redirection target {}", path.display()), e))
}
