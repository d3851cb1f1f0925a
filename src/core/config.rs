//! # Configuration Module / 配置模块
//!
//! `SysrootMatrix.toml` parsing. Every field has a default, and the defaults
//! reproduce the CI job this tool replaces: scrape the targets listed in the
//! toolchain's platform-support page, then run `cargo +miri miri clean` and
//! `cargo +miri miri setup --target <target>` for each of them.
//!
//! `SysrootMatrix.toml` 解析。每个字段都有默认值，默认值复现了此工具所取代的 CI 任务。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::t;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "SysrootMatrix.toml";

/// The complete configuration of a sysroot matrix run.
/// sysroot 矩阵运行的完整配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatrixConfig {
    /// The language for output messages (e.g., "en", "zh-CN").
    /// 输出消息的语言（例如 "en", "zh-CN"）。
    pub language: String,
    /// Directory that receives one failure record per failed target. It is
    /// wiped at the start of every run.
    /// 每个失败目标对应一个失败记录的目录。每次运行开始时都会清空。
    pub failures_dir: PathBuf,
    /// Echo the build tool's output to the console while it runs.
    /// 构建工具运行时将其输出回显到控制台。
    pub echo_output: bool,
    pub toolchain: ToolchainConfig,
    pub targets: TargetsConfig,
    pub commands: CommandsConfig,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            failures_dir: PathBuf::from("failures"),
            echo_output: true,
            toolchain: ToolchainConfig::default(),
            targets: TargetsConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

/// How to find the platform-support document of the active toolchain.
/// 如何找到当前工具链的平台支持文档。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// The `rustc` executable queried with `--print sysroot`.
    pub rustc: String,
    /// Optional rustup toolchain name, passed as `+<toolchain>`.
    /// 可选的 rustup 工具链名称，以 `+<toolchain>` 形式传递。
    pub toolchain: Option<String>,
    /// Path of the platform-support page, relative to the sysroot.
    /// 平台支持页面相对于 sysroot 的路径。
    pub platform_support_doc: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            rustc: "rustc".to_string(),
            toolchain: Some("miri".to_string()),
            platform_support_doc: PathBuf::from("share/doc/rust/html/rustc/platform-support.html"),
        }
    }
}

/// Where the list of targets comes from.
/// 目标列表的来源。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetsConfig {
    /// Scraper command. `{doc}` is replaced with the platform-support page path.
    /// The scraper prints one target per line.
    /// 抓取器命令。`{doc}` 会被替换为平台支持页面路径。抓取器每行输出一个目标。
    pub scraper: String,
    /// A fixed target list. When non-empty the scraper is not run.
    /// 固定的目标列表。非空时不运行抓取器。
    pub list: Vec<String>,
    /// Targets that are never built, whatever the source says.
    /// 无论来源如何都不会构建的目标。
    pub exclude: Vec<String>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            scraper: "python3 ci/scrape-targets.py {doc}".to_string(),
            list: vec![],
            exclude: vec![],
        }
    }
}

/// The two build-tool invocations run for every target.
///
/// Commands are split like a shell would, but never run through one.
/// `$VAR` and `~` are expanded before splitting, even inside single quotes;
/// `$$` stands for a literal `$`.
///
/// 每个目标运行的两个构建工具调用。
/// 命令按 shell 规则拆分，但不经过 shell 执行。`$VAR` 和 `~` 在拆分前展开，
/// 即使位于单引号内；`$$` 表示字面的 `$`。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandsConfig {
    /// Cache-clean command, run before every target. An empty string disables it.
    /// 缓存清理命令，在每个目标之前运行。空字符串表示禁用。
    pub clean: String,
    /// Sysroot build command. `{target}` is replaced with the target name.
    /// Sysroot 构建命令。`{target}` 会被替换为目标名称。
    pub build: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            clean: "cargo +miri miri clean".to_string(),
            build: "cargo +miri miri setup --target {target}".to_string(),
        }
    }
}

/// Loads and parses a `SysrootMatrix.toml` file.
pub fn load_matrix_config(path: &Path) -> Result<MatrixConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    parse_matrix_config(&content)
}

pub fn parse_matrix_config(content: &str) -> Result<MatrixConfig> {
    toml::from_str(content).with_context(|| t!("config.parse_failed").to_string())
}

/// Resolves the configuration for a run.
///
/// A path the user passed explicitly must exist. The default path is optional:
/// when it is absent the built-in defaults are used.
pub fn resolve_matrix_config(path: &Path, explicit: bool) -> Result<MatrixConfig> {
    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file found, using defaults");
        return Ok(MatrixConfig::default());
    }
    load_matrix_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse_matrix_config("").unwrap(), MatrixConfig::default());
    }

    #[test]
    fn defaults_mirror_the_miri_job() {
        let config = MatrixConfig::default();
        assert_eq!(config.failures_dir, PathBuf::from("failures"));
        assert_eq!(config.commands.clean, "cargo +miri miri clean");
        assert!(config.commands.build.contains("{target}"));
        assert_eq!(config.toolchain.toolchain.as_deref(), Some("miri"));
    }
}
