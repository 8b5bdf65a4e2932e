//! Thin wrappers around external trajectory analysis executables.
//!
//! Each tool adapter owns a private scratch directory, turns keyword flags
//! into a command line, runs the executable once, and reads the numeric
//! column it wrote back as a [`core::series::Series`]. The crate is split the
//! same way throughout:
//!
//! - **[`core`]**: Pure, deterministic pieces (flags, command rendering,
//!   redirection modes, series). No I/O.
//! - **[`io`]**: Scratch directories, process execution, output parsing and
//!   configuration files.
//!
//! [`tool`] composes both into the [`tool::ToolAdapter`] contract; concrete
//! bindings live in [`tools`].

pub mod core;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tool;
pub mod tools;

pub use error::{GmxError, Result};
