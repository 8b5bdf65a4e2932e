//! A fully resolved external command: executable, ordered flags, redirection.

use std::process::Command;

use crate::core::flags::Flags;
use crate::core::redirect::RedirectionSpec;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    flags: Flags,
    redirection: RedirectionSpec,
}

impl CommandInvocation {
    /// Build an invocation, rejecting flag keys that are not single tokens.
    pub fn new(
        program: impl Into<String>,
        flags: Flags,
        redirection: RedirectionSpec,
    ) -> Result<Self> {
        flags.validate()?;
        Ok(Self {
            program: program.into(),
            flags,
            redirection,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn redirection(&self) -> &RedirectionSpec {
        &self.redirection
    }

    /// Argument vector passed to the process (without the program name).
    ///
    /// Values are passed verbatim as single arguments, so embedded spaces
    /// survive intact.
    pub fn args(&self) -> Vec<String> {
        self.flags.to_args()
    }

    /// Human-readable command line including the redirection suffix.
    ///
    /// Arguments that would not survive a shell are single-quoted. This string
    /// is only for reporting; execution uses [`Self::to_command`].
    pub fn render(&self) -> String {
        let mut parts = vec![shell_quote(&self.program)];
        parts.extend(self.args().iter().map(|arg| shell_quote(arg)));
        if let Some(suffix) = self.redirection.suffix() {
            parts.push(suffix);
        }
        parts.join(" ")
    }

    /// A `Command` with program and args set. Stdio is left to the caller.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args());
        cmd
    }
}

fn shell_quote(input: &str) -> String {
    if !input.is_empty()
        && input
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '='))
    {
        return input.to_string();
    }
    let mut quoted = String::from("'");
    for ch in input.chars() {
        if ch == '\'' {
            quoted.push_str("'\"'\"'");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}
