// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Build command that fails, printing "boom", for every target whose name
/// contains "fail".
pub const FAIL_ON_FAIL_NAMES: &str =
    "sh -c 'case {target} in *fail*) echo boom; echo bang >&2; exit 3;; esac'";

pub fn setup_test_environment() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// Writes a `SysrootMatrix.toml` with the given clean and build commands.
pub fn write_config(dir: &Path, clean: &str, build: &str) -> PathBuf {
    let config_path = dir.join("SysrootMatrix.toml");
    let content = format!(
        r#"language = "en"
failures_dir = "{failures}"

[commands]
clean = {clean:?}
build = {build:?}
"#,
        failures = dir.join("failures").display(),
    );
    fs::write(&config_path, content).expect("Failed to write config");
    config_path
}

/// Sorted names of the entries in `dir`.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
