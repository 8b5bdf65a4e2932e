//! Error taxonomy shared by every component.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing adapters, running tools or parsing output.
#[derive(Error, Debug)]
pub enum GmxError {
    /// The identity used to name scratch directories is missing from the environment.
    #[error("environment variable {var} is not set; cannot name scratch directory")]
    Environment { var: String },

    /// The external executable exited with a non-zero status.
    ///
    /// The runner only reports this through the event sink; it becomes an
    /// error when a caller asks for it via
    /// [`Invocation::require_success`](crate::tool::Invocation::require_success).
    #[error("command `{command}` failed with exit code {code}")]
    ExternalProcessFailure { command: String, code: i32 },

    #[error("output file {} does not exist", path.display())]
    FileNotFound { path: PathBuf },

    #[error("{}:{line}: cannot parse {text:?} as a number", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        text: String,
    },

    /// A tool binding lacks something an adapter needs to run it.
    #[error("tool {tool} does not provide {missing}")]
    NotImplementedCapability { tool: String, missing: String },

    #[error("failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid flag {flag:?}: {reason}")]
    InvalidFlag { flag: String, reason: String },

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl GmxError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GmxError>;
