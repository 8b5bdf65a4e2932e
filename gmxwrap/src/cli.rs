//! CLI command implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use gmxwrap::core::flags::Flags;
use gmxwrap::core::redirect::RedirectionSpec;
use gmxwrap::core::series::Series;
use gmxwrap::events::tracing_sink;
use gmxwrap::io::process::SystemProcessRunner;
use gmxwrap::exit_codes;
use gmxwrap::io::config::{GmxConfig, ToolDefinition, load_config, write_config};
use gmxwrap::tool::{AdapterOptions, Invocation, ToolAdapter, ToolBinding};
use gmxwrap::tools::configured::ConfiguredTool;
use gmxwrap::tools::rms::Rms;

/// Redirection given on the command line. Replaces the config's when either
/// path is set.
#[derive(Debug, Default)]
pub struct RedirectOverride {
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunOptions {
    pub flags: Flags,
    pub json: bool,
    pub strict: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    tool: &'a str,
    command: &'a str,
    exit_code: i32,
    output: &'a Path,
    values: &'a Series,
}

/// Write a default config, keeping an existing file unless `force`.
pub fn init_config(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        println!("init: {} exists, not overwritten", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &default_config()).context("write config")?;
    println!("init: wrote {}", path.display());
    Ok(exit_codes::OK)
}

/// Print the built-in tool followed by configured tools.
pub fn list_tools(config_path: &Path) -> Result<i32> {
    let cfg = load_config(config_path).context("load config")?;
    println!("rms");
    for name in cfg.tools.keys() {
        println!("{name}");
    }
    Ok(exit_codes::OK)
}

pub fn run_rms(
    config_path: &Path,
    redirect: &RedirectOverride,
    trajectory: Option<&Path>,
    executable: &str,
    mut run: RunOptions,
) -> Result<i32> {
    let cfg = load_config(config_path).context("load config")?;
    if let Some(trajectory) = trajectory {
        run.flags.insert("f", trajectory.to_string_lossy().into_owned());
    }
    let invocation = invoke(Rms::new(executable), adapter_options(&cfg, redirect), run.flags)?;
    report("rms", invocation, run.json, run.strict)
}

pub fn run_configured(
    config_path: &Path,
    redirect: &RedirectOverride,
    name: &str,
    run: RunOptions,
) -> Result<i32> {
    let cfg = load_config(config_path).context("load config")?;
    let definition = cfg.tools.get(name).with_context(|| {
        format!("tool {name} is not defined in {}", config_path.display())
    })?;
    let binding = ConfiguredTool::from_definition(name, definition)?;
    let invocation = invoke(binding, adapter_options(&cfg, redirect), run.flags)?;
    report(name, invocation, run.json, run.strict)
}

fn adapter_options(cfg: &GmxConfig, redirect: &RedirectOverride) -> AdapterOptions {
    let options = cfg.adapter_options(tracing_sink());
    if redirect.stdout.is_none() && redirect.stderr.is_none() {
        return options;
    }
    options.with_redirection(RedirectionSpec {
        stdout: redirect.stdout.clone(),
        stderr: redirect.stderr.clone(),
    })
}

fn invoke<B: ToolBinding>(binding: B, options: AdapterOptions, flags: Flags) -> Result<Invocation> {
    let name = binding.name().to_string();
    // Results go to our stdout; tool chatter must not interleave with them.
    let runner = SystemProcessRunner::new(options.sink.clone()).with_stdout_to_stderr();
    let adapter = ToolAdapter::with_runner(binding, runner, options).context("create adapter")?;
    debug!(tool = %name, scratch = %adapter.scratch_path().display(), "adapter ready");
    let result = adapter.invoke(flags).with_context(|| format!("run {name}"));
    adapter.dispose();
    result
}

fn report(tool: &str, invocation: Invocation, json: bool, strict: bool) -> Result<i32> {
    let code = if invocation.succeeded() {
        exit_codes::OK
    } else {
        exit_codes::PROCESS_FAILED
    };
    if strict {
        invocation.require_success()?;
    }
    if json {
        let report = Report {
            tool,
            command: &invocation.execution.command,
            exit_code: invocation.execution.code,
            output: &invocation.output_path,
            values: &invocation.series,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        for value in &invocation.series {
            println!("{value}");
        }
    }
    Ok(code)
}

fn default_config() -> GmxConfig {
    let mut cfg = GmxConfig::default();
    cfg.tools.insert(
        "gyrate".to_string(),
        ToolDefinition {
            executable: "g_gyrate".to_string(),
            output_flag: "o".to_string(),
            default_output: Some("gyrate.xvg".to_string()),
            pattern: Some(r"^\s*([-\.\d]+)\s+(?P<rg>[-\.\d]+)".to_string()),
            field: Some("rg".to_string()),
        },
    );
    cfg
}
