//! Deterministic, pure building blocks.
//!
//! Nothing here touches the filesystem or spawns processes; the types
//! describe what will be run and what came back.

pub mod command;
pub mod flags;
pub mod redirect;
pub mod series;
