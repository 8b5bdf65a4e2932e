//! Concrete tool bindings.

pub mod configured;
pub mod rms;
