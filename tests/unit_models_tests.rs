//! # Models Module Unit Tests / Models 模块单元测试
//!
//! Tests for `Target`, `TargetOutcome` and `MatrixReport`.
//!
//! 测试 `Target`、`TargetOutcome` 和 `MatrixReport`。

use std::time::Duration;
use sysroot_matrix::models::{MatrixReport, StepFailure, Target, TargetOutcome};

fn target(name: &str) -> Target {
    Target::new(name).unwrap()
}

fn built() -> TargetOutcome {
    TargetOutcome::Built {
        duration: Duration::from_secs(2),
    }
}

fn failed(output: &str) -> TargetOutcome {
    TargetOutcome::Failed {
        output: output.to_string(),
        exit_code: Some(101),
        duration: Duration::from_secs(1),
    }
}

#[cfg(test)]
mod target_tests {
    use super::*;

    #[test]
    fn test_target_accepts_triples() {
        for name in ["x86_64-unknown-linux-gnu", "thumbv7em-none-eabihf", "wasm32-wasip1"] {
            assert_eq!(target(name).as_str(), name);
        }
    }

    #[test]
    fn test_target_rejects_blank() {
        assert!(Target::new("").is_err());
        assert!(Target::new("\t").is_err());
    }

    #[test]
    fn test_target_errors_are_translated_messages() {
        let error = Target::new("a/b").unwrap_err().to_string();
        assert_eq!(
            error,
            "Target name 'a/b' contains characters that cannot appear in a file name"
        );
        assert_eq!(
            Target::new("..").unwrap_err().to_string(),
            "'..' is not a valid target name"
        );
    }

    #[test]
    fn test_target_serde_uses_plain_string() {
        let json = serde_json::to_string(&target("i686-pc-windows-msvc")).unwrap();
        assert_eq!(json, "\"i686-pc-windows-msvc\"");

        let parsed: Target = serde_json::from_str("\"riscv64gc-unknown-linux-gnu\"").unwrap();
        assert_eq!(parsed, target("riscv64gc-unknown-linux-gnu"));

        assert!(serde_json::from_str::<Target>("\"a/b\"").is_err());
    }
}

#[cfg(test)]
mod outcome_tests {
    use super::*;

    #[test]
    fn test_built_outcome_keeps_no_output() {
        let outcome = built();
        assert!(!outcome.is_failure());
        assert_eq!(outcome.output(), "");
        assert_eq!(outcome.exit_code(), Some(0));
        assert_eq!(outcome.duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_failed_outcome_keeps_output() {
        let outcome = failed("error: could not compile `core`");
        assert!(outcome.is_failure());
        assert_eq!(outcome.output(), "error: could not compile `core`");
        assert_eq!(outcome.exit_code(), Some(101));
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;

    #[test]
    fn test_empty_report_is_success() {
        let report = MatrixReport::new();
        assert!(report.is_empty());
        assert!(report.is_success());
        assert!(report.failed_targets().is_empty());
    }

    #[test]
    fn test_report_keeps_execution_order() {
        let mut report = MatrixReport::new();
        report.record(target("c"), built());
        report.record(target("a"), failed("x"));
        report.record(target("b"), built());

        let order: Vec<&str> = report.results().iter().map(|r| r.target.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(report.built_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_failed_targets_are_sorted() {
        let mut report = MatrixReport::new();
        report.record(target("z-target"), failed("z"));
        report.record(target("ok"), built());
        report.record(target("a-target"), failed("a"));

        let failed: Vec<&str> = report.failed_targets().into_iter().map(Target::as_str).collect();
        assert_eq!(failed, vec!["a-target", "z-target"]);
    }

    #[test]
    fn test_recording_twice_replaces_outcome() {
        let mut report = MatrixReport::new();
        report.record(target("a"), failed("first"));
        report.record(target("a"), built());

        assert_eq!(report.len(), 1);
        assert_eq!(report.get(&target("a")), Some(&built()));
        assert!(report.is_success());
    }

    #[test]
    fn test_total_duration_sums_outcomes() {
        let mut report = MatrixReport::new();
        report.record(target("a"), built());
        report.record(target("b"), failed("x"));
        assert_eq!(report.total_duration(), Duration::from_secs(3));
    }
}

#[test]
fn test_step_failure_is_found_through_context() {
    let error = anyhow::Error::new(StepFailure {
        step: "cargo +miri miri clean".to_string(),
        code: Some(2),
    })
    .context("Cleaning the build cache failed");

    let failure = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StepFailure>())
        .unwrap();
    assert_eq!(failure.code, Some(2));
}
