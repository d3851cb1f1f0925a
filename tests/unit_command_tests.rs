//! # Command Module Unit Tests / Command 模块单元测试
//!
//! Tests for `CommandTemplate`, `spawn_and_capture` and the step helpers.
//!
//! 测试 `CommandTemplate`、`spawn_and_capture` 以及步骤辅助函数。

use sysroot_matrix::infra::command::{
    CommandTemplate, DOC_PLACEHOLDER, TARGET_PLACEHOLDER, run_step, spawn_and_capture,
    step_stdout,
};
use sysroot_matrix::models::StepFailure;

#[cfg(test)]
mod template_tests {
    use super::*;

    #[test]
    fn test_parse_splits_like_a_shell() {
        let template = CommandTemplate::parse("cargo +miri miri setup --target {target}").unwrap();
        assert_eq!(template.program(), "cargo");
        assert!(template.uses_placeholder(TARGET_PLACEHOLDER));
        assert!(!template.uses_placeholder(DOC_PLACEHOLDER));
        assert_eq!(
            template.render(&[(TARGET_PLACEHOLDER, "x86_64-unknown-linux-gnu")]),
            vec!["cargo", "+miri", "miri", "setup", "--target", "x86_64-unknown-linux-gnu"]
        );
    }

    #[test]
    fn test_quoted_words_stay_together() {
        let template = CommandTemplate::parse("python3 'ci/scrape targets.py' {doc}").unwrap();
        assert_eq!(
            template.render(&[(DOC_PLACEHOLDER, "/sysroot/platform support.html")]),
            vec!["python3", "ci/scrape targets.py", "/sysroot/platform support.html"]
        );
    }

    #[test]
    fn test_source_is_kept_verbatim() {
        let template = CommandTemplate::parse("cargo miri clean").unwrap();
        assert_eq!(template.source(), "cargo miri clean");
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(CommandTemplate::parse("").is_err());
        assert!(CommandTemplate::parse("   ").is_err());
    }

    #[test]
    fn test_unbalanced_quotes_are_rejected() {
        let error = CommandTemplate::parse("sh -c 'exit 1").unwrap_err();
        assert!(error.to_string().contains("Failed to parse command"));
    }

    #[test]
    fn test_unset_variable_is_rejected() {
        let error =
            CommandTemplate::parse("cargo $SYSROOT_MATRIX_SURELY_UNSET_VARIABLE_42").unwrap_err();
        assert!(error.to_string().contains("Failed to expand command"));
    }

    #[test]
    fn test_single_quotes_do_not_stop_expansion() {
        assert!(CommandTemplate::parse("sh -c 'echo $SYSROOT_MATRIX_SURELY_UNSET_VARIABLE_42'").is_err());
    }

    #[test]
    fn test_double_dollar_reaches_the_child_shell() {
        let template =
            CommandTemplate::parse("sh -c 'for i in 1 2; do echo $$i; done'").unwrap();
        assert_eq!(
            template.render(&[]),
            vec!["sh", "-c", "for i in 1 2; do echo $i; done"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_home_is_expanded() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        let template = CommandTemplate::parse("~/.cargo/bin/cargo miri clean").unwrap();
        assert_eq!(
            template.program(),
            format!("{}/.cargo/bin/cargo", home.to_string_lossy())
        );
    }
}

#[cfg(all(test, unix))]
mod spawn_tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_and_capture_combines_streams() {
        let template = CommandTemplate::parse("sh -c 'echo out; echo err >&2'").unwrap();
        let (status, output) = spawn_and_capture(template.to_command(&[]), false).await;

        assert!(status.unwrap().success());
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[tokio::test]
    async fn test_spawn_and_capture_reports_exit_code() {
        let template = CommandTemplate::parse("sh -c 'echo failing {target}; exit 42'").unwrap();
        let (status, output) =
            spawn_and_capture(template.to_command(&[(TARGET_PLACEHOLDER, "mips-fail")]), false)
                .await;

        assert_eq!(status.unwrap().code(), Some(42));
        assert_eq!(output, "failing mips-fail\n");
    }

    #[tokio::test]
    async fn test_spawn_and_capture_missing_program() {
        let template = CommandTemplate::parse("this_command_definitely_does_not_exist_12345").unwrap();
        let (status, output) = spawn_and_capture(template.to_command(&[]), false).await;

        assert!(status.is_err());
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_run_step_success() {
        let template = CommandTemplate::parse("true").unwrap();
        run_step("true", template.to_command(&[])).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_step_failure_carries_code() {
        let template = CommandTemplate::parse("sh -c 'exit 5'").unwrap();
        let error = run_step("clean", template.to_command(&[])).await.unwrap_err();

        let failure = error.downcast_ref::<StepFailure>().unwrap();
        assert_eq!(failure.step, "clean");
        assert_eq!(failure.code, Some(5));
    }

    #[tokio::test]
    async fn test_run_step_spawn_failure_has_no_code() {
        let template = CommandTemplate::parse("this_command_definitely_does_not_exist_12345").unwrap();
        let error = run_step("missing", template.to_command(&[])).await.unwrap_err();

        let failure = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<StepFailure>())
            .unwrap();
        assert_eq!(failure.code, None);
    }

    #[tokio::test]
    async fn test_step_stdout_returns_stdout_only() {
        let template = CommandTemplate::parse("sh -c 'echo /opt/sysroot; echo noise >&2'").unwrap();
        let stdout = step_stdout("rustc --print sysroot", template.to_command(&[]))
            .await
            .unwrap();
        assert_eq!(stdout, "/opt/sysroot\n");
    }

    #[tokio::test]
    async fn test_step_stdout_failure() {
        let template = CommandTemplate::parse("false").unwrap();
        let error = step_stdout("scraper", template.to_command(&[]))
            .await
            .unwrap_err();
        assert_eq!(error.downcast_ref::<StepFailure>().unwrap().code, Some(1));
    }
}
