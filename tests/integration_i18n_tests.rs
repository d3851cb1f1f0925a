//! # Internationalization Integration Tests / 国际化集成测试
//!
//! Checks that the summary is printed in the language picked by `--lang` or
//! by the `language` key of the configuration file.
//!
//! 检查摘要是否以 `--lang` 或配置文件 `language` 键选择的语言打印。

#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use common::setup_test_environment;

fn write_localized_config(dir: &Path, language: &str) -> PathBuf {
    let config_path = dir.join("SysrootMatrix.toml");
    let content = format!(
        r#"language = "{language}"
failures_dir = "{failures}"

[commands]
clean = "true"
build = "false"
"#,
        failures = dir.join("failures").display(),
    );
    fs::write(&config_path, content).unwrap();
    config_path
}

fn matrix_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sysroot-matrix").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_language_is_used() {
    let temp_dir = setup_test_environment();
    let config = write_localized_config(temp_dir.path(), "zh-CN");

    matrix_cmd(temp_dir.path())
        .args(["run", "--target", "mips-unknown-linux-gnu", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("以下目标的 sysroot 构建失败："))
        .stdout(predicate::str::contains("mips-unknown-linux-gnu"));
}

#[test]
fn test_lang_flag_overrides_config_language() {
    let temp_dir = setup_test_environment();
    let config = write_localized_config(temp_dir.path(), "zh-CN");

    matrix_cmd(temp_dir.path())
        .args(["--lang", "en", "run", "--target", "mips-unknown-linux-gnu", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Sysroots for the following targets failed to build:",
        ))
        .stdout(predicate::str::contains("以下目标").not());
}

#[test]
fn test_invalid_target_error_is_translated() {
    let temp_dir = setup_test_environment();
    let config = write_localized_config(temp_dir.path(), "zh-CN");

    matrix_cmd(temp_dir.path())
        .args(["run", "--target", "a/b", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("目标名称 'a/b' 包含不能出现在文件名中的字符"));
}

#[test]
fn test_chinese_message_for_empty_target_list() {
    let temp_dir = setup_test_environment();
    let config = write_localized_config(temp_dir.path(), "en");
    let targets = temp_dir.path().join("targets.txt");
    fs::write(&targets, "\n").unwrap();

    matrix_cmd(temp_dir.path())
        .args(["--lang", "zh", "run", "--config"])
        .arg(&config)
        .arg("--targets-file")
        .arg(&targets)
        .assert()
        .success()
        .stdout(predicate::str::contains("没有需要构建的目标。"));
}
