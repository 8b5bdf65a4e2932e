//! `gmxwrap`: run trajectory analysis tools and print the numeric series
//! they produce.
//!
//! Tools are either built in (`rms`) or defined under `[tools.<name>]` in
//! `gmxwrap.toml` and run with `gmxwrap run <name>`.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gmxwrap::core::flags::Flags;
use gmxwrap::exit_codes;
use gmxwrap::io::config::CONFIG_FILE;
use gmxwrap::tools::rms::DEFAULT_EXECUTABLE;

use crate::cli::{RedirectOverride, RunOptions};

#[derive(Parser)]
#[command(
    name = "gmxwrap",
    version,
    about = "Run trajectory analysis executables and print their numeric output"
)]
struct Cli {
    /// Config file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Redirect the tool's stdout to this file (overrides config).
    #[arg(long, global = true)]
    stdout: Option<PathBuf>,
    /// Redirect the tool's stderr to this file (overrides config).
    /// Pass the same path as --stdout to combine both streams.
    #[arg(long, global = true)]
    stderr: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// List runnable tools.
    Tools,
    /// RMSD of a trajectory.
    Rms {
        /// Trajectory file, passed as `-f`.
        #[arg(short = 'f', long)]
        trajectory: Option<PathBuf>,
        /// Name of the RMSD executable.
        #[arg(long, default_value = DEFAULT_EXECUTABLE)]
        executable: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Run a tool defined in the config file.
    Run {
        tool: String,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Tool flag, rendered as `-KEY VALUE`. Repeatable; order is preserved.
    #[arg(long = "flag", value_name = "KEY=VALUE", value_parser = Flags::parse_pair)]
    flags: Vec<(String, String)>,
    /// Print a JSON report instead of one value per line.
    #[arg(long)]
    json: bool,
    /// Treat a non-zero exit of the tool as an error.
    #[arg(long)]
    strict: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        RunOptions {
            flags: args.flags.into_iter().collect(),
            json: args.json,
            strict: args.strict,
        }
    }
}

fn main() {
    gmxwrap::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let redirect = RedirectOverride {
        stdout: cli.stdout,
        stderr: cli.stderr,
    };
    match cli.command {
        Command::Init { force } => cli::init_config(&cli.config, force),
        Command::Tools => cli::list_tools(&cli.config),
        Command::Rms {
            trajectory,
            executable,
            run,
        } => cli::run_rms(
            &cli.config,
            &redirect,
            trajectory.as_deref(),
            &executable,
            run.into(),
        ),
        Command::Run { tool, run } => cli::run_configured(&cli.config, &redirect, &tool, run.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rms_with_flags_in_order() {
        let cli = Cli::parse_from([
            "gmxwrap", "rms", "-f", "traj.xtc", "--flag", "s=topol.tpr", "--flag", "n=index.ndx",
        ]);
        let Command::Rms {
            trajectory, run, ..
        } = cli.command
        else {
            panic!("expected rms");
        };
        assert_eq!(trajectory, Some(PathBuf::from("traj.xtc")));
        let options = RunOptions::from(run);
        assert_eq!(options.flags.to_args(), vec!["-s", "topol.tpr", "-n", "index.ndx"]);
    }

    #[test]
    fn parse_global_redirects_after_subcommand() {
        let cli = Cli::parse_from(["gmxwrap", "run", "gyrate", "--stdout", "/dev/null"]);
        assert_eq!(cli.stdout, Some(PathBuf::from("/dev/null")));
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn rejects_malformed_flag() {
        assert!(Cli::try_parse_from(["gmxwrap", "rms", "--flag", "novalue"]).is_err());
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["gmxwrap", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }
}
