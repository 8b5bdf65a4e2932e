//! Adapter lifecycle scenarios: construction, repeated invocation, disposal.
//!
//! Most tests drive a `ToolAdapter` through a scripted runner so no external
//! executable is needed; the unix-only tests run real `sh` processes.

use std::fs;
use std::sync::Arc;

use gmxwrap::GmxError;
use gmxwrap::core::flags::Flags;
use gmxwrap::events::Event;
use gmxwrap::test_support::{RecordingSink, ScriptedRunner, TestTool};
use gmxwrap::tool::{AdapterOptions, ToolAdapter};

fn options(root: &std::path::Path, sink: &Arc<RecordingSink>) -> AdapterOptions {
    AdapterOptions::default()
        .with_identity("tester")
        .with_scratch_root(root)
        .with_sink(sink.clone())
}

/// Construct → invoke twice with the same output name → dispose.
///
/// The second run overwrites the first run's output; disposal removes the
/// scratch directory and everything in it.
#[test]
fn repeated_invocations_overwrite_then_dispose_cleans_up() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let adapter = ToolAdapter::with_runner(
        TestTool,
        ScriptedRunner::writing("0 1.0\n1 2.0\n", 0),
        options(temp.path(), &sink),
    )
    .expect("adapter");
    let scratch = adapter.scratch_path().to_path_buf();
    assert!(
        scratch
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("tester.test_tool."))
    );

    let first = adapter.invoke(Flags::new().with("o", "same.xvg")).expect("first");
    let second = adapter.invoke(Flags::new().with("o", "same.xvg")).expect("second");
    assert_eq!(first.output_path, second.output_path);
    assert_eq!(second.series.as_slice(), &[1.0, 2.0]);
    assert_eq!(fs::read_dir(&scratch).expect("read scratch").count(), 1);

    adapter.dispose();
    assert!(!scratch.exists());

    let events = sink.events();
    assert!(matches!(events.first(), Some(Event::ScratchCreated { .. })));
    assert!(matches!(events.last(), Some(Event::ScratchRemoved { .. })));
}

#[test]
fn independent_adapters_use_distinct_scratch_areas() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let a = ToolAdapter::with_runner(TestTool, ScriptedRunner::empty(), options(temp.path(), &sink))
        .expect("a");
    let b = ToolAdapter::with_runner(TestTool, ScriptedRunner::empty(), options(temp.path(), &sink))
        .expect("b");

    assert_ne!(a.scratch_path(), b.scratch_path());
    assert_ne!(
        a.resolve_output_path(&Flags::new()),
        b.resolve_output_path(&Flags::new())
    );
}

#[test]
fn dropping_adapter_removes_scratch() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let scratch = {
        let adapter =
            ToolAdapter::with_runner(TestTool, ScriptedRunner::empty(), options(temp.path(), &sink))
                .expect("adapter");
        adapter.scratch_path().to_path_buf()
    };
    assert!(!scratch.exists());
}

#[test]
fn zero_matches_is_empty_not_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let adapter = ToolAdapter::with_runner(
        TestTool,
        ScriptedRunner::writing("# only comments\n@ legend\n", 0),
        options(temp.path(), &sink),
    )
    .expect("adapter");

    let result = adapter.invoke(Flags::new()).expect("invoke");
    assert!(result.series.is_empty());
}

#[test]
fn malformed_value_propagates_parse_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let adapter = ToolAdapter::with_runner(
        TestTool,
        ScriptedRunner::writing("0 1.0\n1 1.2.3\n", 0),
        options(temp.path(), &sink),
    )
    .expect("adapter");

    let err = adapter.invoke(Flags::new()).unwrap_err();
    assert!(matches!(err, GmxError::Parse { line: 2, .. }));
}

#[cfg(unix)]
mod real_processes {
    use super::*;

    use gmxwrap::core::redirect::RedirectionSpec;
    use gmxwrap::tool::ToolBinding;
    use gmxwrap::tools::rms::{Rms, rmsd, rmsd_with};

    const WRITE_SERIES: &str = r#"printf '# rmsd\n0 0.25\n10 0.5\n' > "$1"; echo progress; echo warning 1>&2"#;

    /// `sh -c SCRIPT -o PATH` receives PATH as `$1`.
    fn sh_flags(script: &str) -> Flags {
        Flags::new().with("c", script).with("o", "rmsd.xvg")
    }

    #[test]
    fn real_process_with_combined_redirection() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sink = Arc::new(RecordingSink::default());
        let log = temp.path().join("tool.log");
        let adapter = ToolAdapter::new(
            Rms::new("sh"),
            options(temp.path(), &sink).with_redirection(RedirectionSpec::combined(&log)),
        )
        .expect("adapter");

        let result = adapter.invoke(sh_flags(WRITE_SERIES)).expect("invoke");

        assert!(result.succeeded());
        assert_eq!(result.series.as_slice(), &[0.25, 0.5]);
        let logged = fs::read_to_string(&log).expect("log");
        assert!(logged.contains("progress") && logged.contains("warning"));
        assert_eq!(adapter.binding().default_output(), "rmsd.xvg");
    }

    #[test]
    fn failing_real_process_is_logged_and_output_still_parsed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sink = Arc::new(RecordingSink::default());
        let adapter = ToolAdapter::new(
            Rms::new("sh"),
            options(temp.path(), &sink).with_redirection(RedirectionSpec::combined("/dev/null")),
        )
        .expect("adapter");

        let result = adapter
            .invoke(sh_flags(r#"printf '0 0.125\n' > "$1"; exit 7"#))
            .expect("invoke");

        assert_eq!(result.execution.code, 7);
        assert_eq!(result.series.as_slice(), &[0.125]);
        assert!(sink.events().contains(&Event::ProcessFailed {
            command: result.execution.command.clone(),
            code: 7,
        }));
        assert!(result.execution.command.ends_with(">/dev/null 2>&1"));
    }

    /// `sh -c SCRIPT -o PATH -f TRAJ`: `$1` is the output path, `$2 $3` the
    /// trajectory flag appended by the helper.
    #[test]
    fn one_shot_rmsd_passes_trajectory_and_returns_series() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sink = Arc::new(RecordingSink::default());
        let scratch_root = temp.path().join("scratch");
        fs::create_dir(&scratch_root).expect("scratch root");
        let trajectory = temp.path().join("traj.xtc");
        let script = r#"[ "$2" = -f ] && [ -n "$3" ] || exit 9; printf '0 0.3\n5 0.6\n' > "$1""#;

        let result = rmsd_with(
            Rms::new("sh"),
            &trajectory,
            sh_flags(script),
            options(&scratch_root, &sink),
        )
        .expect("rmsd");

        assert!(result.succeeded(), "{:?}", result.execution);
        assert_eq!(result.series.as_slice(), &[0.3, 0.6]);
        let args = format!(" -f {}", trajectory.display());
        assert!(result.execution.command.ends_with(&args));
        assert_eq!(fs::read_dir(&scratch_root).expect("read").count(), 0);
    }

    #[test]
    fn one_shot_rmsd_cleans_up_even_when_tool_is_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sink = Arc::new(RecordingSink::default());
        let empty_path = temp.path().join("no-such-dir");
        let scratch_root = temp.path().join("scratch");
        fs::create_dir(&scratch_root).expect("scratch root");

        // `g_rms` is not expected on PATH in test environments.
        let err = rmsd(&empty_path, Flags::new(), options(&scratch_root, &sink)).unwrap_err();

        assert!(matches!(
            err,
            GmxError::Spawn { .. } | GmxError::FileNotFound { .. }
        ));
        assert_eq!(fs::read_dir(&scratch_root).expect("read").count(), 0);
    }
}
