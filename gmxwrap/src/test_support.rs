//! Test doubles: a recording event sink, a scripted process runner and a
//! minimal tool binding.

use std::fs;
use std::sync::{LazyLock, Mutex};

use crate::core::command::CommandInvocation;
use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::io::output::LinePattern;
use crate::io::process::{ExecutionResult, ProcessRunner};
use crate::tool::ToolBinding;

/// Captures every emitted event in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Runner that never spawns: optionally writes canned contents to the path
/// passed under the output flag, then reports a canned exit code.
#[derive(Debug)]
pub struct ScriptedRunner {
    output_flag: String,
    contents: Option<String>,
    code: i32,
    seen: Mutex<Vec<CommandInvocation>>,
}

impl ScriptedRunner {
    /// Succeeds without writing anything.
    pub fn empty() -> Self {
        Self::new(None, 0)
    }

    /// Writes `contents` to the output path and exits with `code`.
    pub fn writing(contents: &str, code: i32) -> Self {
        Self::new(Some(contents.to_string()), code)
    }

    /// Exits with `code` without writing output.
    pub fn failing(code: i32) -> Self {
        Self::new(None, code)
    }

    fn new(contents: Option<String>, code: i32) -> Self {
        Self {
            output_flag: "o".to_string(),
            contents,
            code,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation executed so far.
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn execute(&self, invocation: &CommandInvocation) -> Result<ExecutionResult> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(invocation.clone());
        }
        if let (Some(contents), Some(path)) =
            (&self.contents, invocation.flags().get(&self.output_flag))
        {
            fs::write(path, contents).map_err(|e| crate::GmxError::io("write scripted output", e))?;
        }
        Ok(ExecutionResult {
            command: invocation.render(),
            code: self.code,
        })
    }
}

static TEST_PATTERN: LazyLock<LinePattern> = LazyLock::new(|| {
    LinePattern::new(r"^\s*([-.\d]+)\s+(?P<value>[-.\d]+)", "value").expect("valid test pattern")
});

/// Binding for `test_tool -o out.xvg`, second column as `value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestTool;

impl ToolBinding for TestTool {
    fn name(&self) -> &str {
        "test_tool"
    }

    fn executable(&self) -> &str {
        "test_tool"
    }

    fn output_flag(&self) -> &str {
        "o"
    }

    fn default_output(&self) -> &str {
        "out.xvg"
    }

    fn line_pattern(&self) -> &LinePattern {
        &TEST_PATTERN
    }
}
