//! Side-effecting helpers: scratch directories, processes, output files, config.

pub mod config;
pub mod output;
pub mod process;
pub mod scratch;
