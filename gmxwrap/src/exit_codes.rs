//! Stable exit codes for the `gmxwrap` CLI.

/// Tool ran and its output was parsed.
pub const OK: i32 = 0;
/// Invalid arguments/config, missing output, unparsable output or other errors.
pub const INVALID: i32 = 1;
/// The external executable exited non-zero; whatever output it left was still printed.
pub const PROCESS_FAILED: i32 = 2;
