//! The tool adapter: scratch area + process runner + output parser.
//!
//! A [`ToolBinding`] describes one external executable (name, output flag,
//! default output file, line pattern). [`ToolAdapter`] turns a binding into
//! something callable: [`ToolAdapter::invoke`] takes flags and returns the
//! parsed numeric series together with the process's exit status.
//!
//! Lifecycle: an adapter is live from construction until it is disposed
//! ([`ToolAdapter::dispose`]) or dropped, at which point its scratch area is
//! removed. Disposal consumes the adapter, so it cannot be invoked afterwards.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::instrument;

use crate::core::command::CommandInvocation;
use crate::core::flags::Flags;
use crate::core::redirect::RedirectionSpec;
use crate::core::series::Series;
use crate::error::{GmxError, Result};
use crate::events::{Event, EventSink, tracing_sink};
use crate::io::output::{LinePattern, parse_series};
use crate::io::process::{ExecutionResult, ProcessRunner, SystemProcessRunner};
use crate::io::scratch::{DEFAULT_IDENTITY_VAR, ScratchArea, resolve_identity};

/// Metadata a concrete tool must supply to be run by a [`ToolAdapter`].
pub trait ToolBinding {
    /// Short name, used to label the scratch directory.
    fn name(&self) -> &str;
    /// Executable resolved on `PATH`.
    fn executable(&self) -> &str;
    /// Flag key through which the tool receives its output file path.
    fn output_flag(&self) -> &str;
    /// Output file name used when the caller does not pass the output flag.
    fn default_output(&self) -> &str;
    /// Pattern selecting data lines and naming the numeric field.
    fn line_pattern(&self) -> &LinePattern;
}

/// Construction-time settings shared by adapters.
#[derive(Clone)]
pub struct AdapterOptions {
    /// Scratch identity prefix. When `None`, read from `identity_var`.
    pub identity: Option<String>,
    pub identity_var: String,
    /// Parent of the scratch directory; the system temp dir when `None`.
    pub scratch_root: Option<PathBuf>,
    pub redirection: RedirectionSpec,
    pub sink: Arc<dyn EventSink>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            identity: None,
            identity_var: DEFAULT_IDENTITY_VAR.to_string(),
            scratch_root: None,
            redirection: RedirectionSpec::default(),
            sink: tracing_sink(),
        }
    }
}

impl AdapterOptions {
    pub fn with_redirection(mut self, redirection: RedirectionSpec) -> Self {
        self.redirection = redirection;
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    fn identity(&self) -> Result<String> {
        match &self.identity {
            Some(identity) => Ok(identity.clone()),
            None => resolve_identity(&self.identity_var),
        }
    }
}

/// Outcome of one [`ToolAdapter::invoke`].
///
/// Carries both the process status and the parsed series so callers can tell
/// "process failed but left parseable output" from a clean run.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub execution: ExecutionResult,
    pub output_path: PathBuf,
    pub series: Series,
}

impl Invocation {
    pub fn succeeded(&self) -> bool {
        self.execution.success()
    }

    /// The series, or [`GmxError::ExternalProcessFailure`] if the process exited non-zero.
    pub fn require_success(&self) -> Result<&Series> {
        if self.execution.success() {
            return Ok(&self.series);
        }
        Err(GmxError::ExternalProcessFailure {
            command: self.execution.command.clone(),
            code: self.execution.code,
        })
    }
}

pub struct ToolAdapter<B, R = SystemProcessRunner> {
    binding: B,
    runner: R,
    redirection: RedirectionSpec,
    sink: Arc<dyn EventSink>,
    scratch: ScratchArea,
}

impl<B: ToolBinding> ToolAdapter<B> {
    /// Build an adapter that runs real processes.
    pub fn new(binding: B, options: AdapterOptions) -> Result<Self> {
        let runner = SystemProcessRunner::new(options.sink.clone());
        Self::with_runner(binding, runner, options)
    }
}

impl<B: ToolBinding, R: ProcessRunner> ToolAdapter<B, R> {
    /// Build an adapter with a custom runner.
    ///
    /// Fails with [`GmxError::Environment`] when no identity is configured and
    /// the identity variable is unset.
    pub fn with_runner(binding: B, runner: R, options: AdapterOptions) -> Result<Self> {
        let identity = options.identity()?;
        let scratch = match &options.scratch_root {
            Some(root) => {
                ScratchArea::create_in(root, &identity, binding.name(), options.sink.clone())?
            }
            None => ScratchArea::create(&identity, binding.name(), options.sink.clone())?,
        };
        if options.redirection.discards_stderr_target()
            && let (Some(stdout), Some(stderr)) =
                (&options.redirection.stdout, &options.redirection.stderr)
        {
            options.sink.emit(Event::StderrRedirectIgnored {
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            });
        }
        Ok(Self {
            binding,
            runner,
            redirection: options.redirection,
            sink: options.sink,
            scratch,
        })
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    pub fn redirection(&self) -> &RedirectionSpec {
        &self.redirection
    }

    /// Where the tool will be told to write its output for these flags.
    ///
    /// An override under the output flag is re-rooted inside the scratch
    /// area: only its normal components are kept, and `invoke` creates any
    /// subdirectories they name. An override with no normal components falls
    /// back to the default name.
    pub fn resolve_output_path(&self, flags: &Flags) -> PathBuf {
        let name = flags
            .get(self.binding.output_flag())
            .map(|name| confine(Path::new(name)))
            .filter(|name| !name.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(self.binding.default_output()));
        self.scratch.path().join(name)
    }

    /// The command `invoke` would run for these flags, and its output path.
    pub fn build_invocation(&self, mut flags: Flags) -> Result<(CommandInvocation, PathBuf)> {
        let output = self.resolve_output_path(&flags);
        flags.set_leading(
            self.binding.output_flag(),
            output.to_string_lossy().into_owned(),
        );
        let invocation =
            CommandInvocation::new(self.binding.executable(), flags, self.redirection.clone())?;
        Ok((invocation, output))
    }

    /// Run the tool once and parse its output.
    ///
    /// A non-zero exit does not stop parsing: the tool may have written partial
    /// output. Missing or unparsable output propagates as
    /// [`GmxError::FileNotFound`] / [`GmxError::Parse`].
    #[instrument(skip_all, fields(tool = self.binding.name()))]
    pub fn invoke(&self, flags: Flags) -> Result<Invocation> {
        let (invocation, output_path) = self.build_invocation(flags)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| GmxError::io(format!("create {}", parent.display()), e))?;
        }
        let execution = self.runner.execute(&invocation)?;
        self.sink.emit(Event::ReadingOutput {
            path: output_path.clone(),
        });
        let series = parse_series(&output_path, self.binding.line_pattern())?;
        Ok(Invocation {
            execution,
            output_path,
            series,
        })
    }

    /// Remove the scratch area now rather than at drop.
    pub fn dispose(mut self) {
        self.scratch.destroy();
    }
}

fn confine(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}
