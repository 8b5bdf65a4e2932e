//! Tracing setup for the `gmxwrap` binary.
//!
//! The library never installs a subscriber. Adapters, runners and scratch
//! areas emit [`Event`](crate::events::Event)s into their injected sink; the
//! default [`TracingSink`](crate::events::TracingSink) turns those into
//! `tracing` records, which this subscriber prints.
//!
//! With the default `warn` filter a user sees failed tool runs
//! (`ProcessFailed`, `error`) and scratch cleanup problems (`warn`), and
//! nothing else. Everything goes to stderr: stdout carries the parsed
//! values, and the CLI routes unredirected tool stdout to stderr too.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber.
///
/// # Example
/// ```bash
/// # show each executed command line and the output file being read
/// RUST_LOG=gmxwrap=info gmxwrap rms -f traj.xtc --flag s=topol.tpr
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_a_valid_directive() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        assert_eq!(filter.to_string(), "warn");
    }
}
