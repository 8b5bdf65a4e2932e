//! RMSD of a trajectory against a reference structure (`g_rms`).

use std::path::Path;
use std::sync::LazyLock;

use crate::core::flags::Flags;
use crate::error::Result;
use crate::io::output::LinePattern;
use crate::tool::{AdapterOptions, Invocation, ToolAdapter, ToolBinding};

pub const DEFAULT_EXECUTABLE: &str = "g_rms";

// time column, then RMSD
static RMSD_PATTERN: LazyLock<LinePattern> = LazyLock::new(|| {
    LinePattern::new(r"^\s*([-\.\d]+)\s+(?P<rmsd>[-\.\d]+)", "rmsd").expect("valid rmsd pattern")
});

#[derive(Debug, Clone)]
pub struct Rms {
    executable: String,
}

impl Default for Rms {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

impl Rms {
    /// Binding for an RMSD tool installed under a different name
    /// (e.g. `gmx_rms` or a suffixed build).
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl ToolBinding for Rms {
    fn name(&self) -> &str {
        "g_rms"
    }

    fn executable(&self) -> &str {
        &self.executable
    }

    fn output_flag(&self) -> &str {
        "o"
    }

    fn default_output(&self) -> &str {
        "rmsd.xvg"
    }

    fn line_pattern(&self) -> &LinePattern {
        &RMSD_PATTERN
    }
}

/// One-shot RMSD: run `g_rms -f <trajectory>` plus `flags` in a throwaway
/// adapter.
pub fn rmsd(trajectory: &Path, flags: Flags, options: AdapterOptions) -> Result<Invocation> {
    rmsd_with(Rms::default(), trajectory, flags, options)
}

/// [`rmsd`] with an explicit binding, e.g. `Rms::new("gmx_rms")`.
pub fn rmsd_with(
    rms: Rms,
    trajectory: &Path,
    mut flags: Flags,
    options: AdapterOptions,
) -> Result<Invocation> {
    flags.insert("f", trajectory.to_string_lossy().into_owned());
    let adapter = ToolAdapter::new(rms, options)?;
    let result = adapter.invoke(flags);
    adapter.dispose();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::output::parse_reader;
    use std::io::Cursor;

    const XVG: &str = "\
# This file was created by g_rms
@    title \"RMSD\"
@    xaxis  label \"Time (ps)\"
@TYPE xy
   0.0000000    0.0005210
  10.0000000    0.0912345
  20.0000000   -0.1000000
";

    #[test]
    fn pattern_reads_rmsd_column_and_skips_headers() {
        let series = parse_reader(Cursor::new(XVG), Path::new("rmsd.xvg"), Rms::default().line_pattern())
            .expect("parse");
        assert_eq!(series.as_slice(), &[0.000521, 0.0912345, -0.1]);
    }

    #[test]
    fn binding_metadata() {
        let rms = Rms::new("gmx_rms");
        assert_eq!(rms.executable(), "gmx_rms");
        assert_eq!(rms.name(), "g_rms");
        assert_eq!(rms.output_flag(), "o");
        assert_eq!(rms.default_output(), "rmsd.xvg");
        assert_eq!(Rms::default().executable(), DEFAULT_EXECUTABLE);
    }
}
