//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the sysroot matrix.
//! It includes the target identifier, per-target outcomes, the ordered report
//! collected during a run and the typed error for broken tooling steps.
//!
//! 此模块定义了整个 sysroot 矩阵中使用的核心数据结构。
//! 它包括目标标识符、逐目标结果、运行期间收集的有序报告以及工具步骤失败的类型化错误。

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::infra::t;

/// A named build configuration, usually a platform triple such as
/// `x86_64-unknown-linux-gnu`.
///
/// The name doubles as the file name of the target's failure record, so it can
/// never be blank, contain whitespace or path separators, or be `.`/`..`.
///
/// 命名的构建配置，通常是平台三元组，例如 `x86_64-unknown-linux-gnu`。
/// 该名称同时用作失败记录的文件名，因此不能为空、不能包含空白或路径分隔符，也不能是 `.`/`..`。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target(String);

impl Target {
    /// Validates and wraps a target name. Surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            bail!(t!("targets.name_empty").to_string());
        }
        if name == "." || name == ".." {
            bail!(t!("targets.name_reserved", name = name).to_string());
        }
        if name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
        {
            bail!(t!("targets.name_invalid_chars", name = name).to_string());
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl TryFrom<String> for Target {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Target::new(value)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.0
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The result of attempting one target's sysroot build.
/// 尝试构建单个目标 sysroot 的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// The build action exited with status 0. Nothing is kept.
    /// 构建动作以状态 0 退出，不保留任何内容。
    Built {
        /// Wall-clock time of the build action / 构建动作的耗时
        duration: Duration,
    },
    /// The build action exited non-zero or was killed by a signal.
    /// 构建动作以非零状态退出或被信号终止。
    Failed {
        /// Combined stdout and stderr of the build action / 构建动作合并后的 stdout 和 stderr
        output: String,
        /// Exit code, `None` when the process was terminated by a signal.
        /// 退出码，进程被信号终止时为 `None`。
        exit_code: Option<i32>,
        /// Wall-clock time of the build action / 构建动作的耗时
        duration: Duration,
    },
}

impl TargetOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TargetOutcome::Failed { .. })
    }

    pub fn duration(&self) -> Duration {
        match self {
            TargetOutcome::Built { duration } | TargetOutcome::Failed { duration, .. } => {
                *duration
            }
        }
    }

    /// Gets the captured output. Successful builds keep none.
    pub fn output(&self) -> &str {
        match self {
            TargetOutcome::Built { .. } => "",
            TargetOutcome::Failed { output, .. } => output,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TargetOutcome::Built { .. } => Some(0),
            TargetOutcome::Failed { exit_code, .. } => *exit_code,
        }
    }
}

/// One entry of a `MatrixReport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResult {
    pub target: Target,
    pub outcome: TargetOutcome,
}

/// The ordered mapping from target to outcome collected during a run.
///
/// Entries keep execution order. Recording a target twice replaces its earlier
/// outcome in place, so every target appears at most once.
///
/// 运行期间收集的从目标到结果的有序映射。
/// 条目保持执行顺序。重复记录同一目标会原地替换其先前的结果，因此每个目标最多出现一次。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixReport {
    results: Vec<TargetResult>,
}

impl MatrixReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, target: Target, outcome: TargetOutcome) {
        match self.results.iter_mut().find(|r| r.target == target) {
            Some(existing) => existing.outcome = outcome,
            None => self.results.push(TargetResult { target, outcome }),
        }
    }

    /// All results in execution order.
    pub fn results(&self) -> &[TargetResult] {
        &self.results
    }

    pub fn get(&self, target: &Target) -> Option<&TargetOutcome> {
        self.results
            .iter()
            .find(|r| &r.target == target)
            .map(|r| &r.outcome)
    }

    /// Failed results sorted by target name, the order a directory listing shows.
    pub fn failures(&self) -> Vec<&TargetResult> {
        let mut failures: Vec<_> = self
            .results
            .iter()
            .filter(|r| r.outcome.is_failure())
            .collect();
        failures.sort_by(|a, b| a.target.cmp(&b.target));
        failures
    }

    pub fn failed_targets(&self) -> Vec<&Target> {
        self.failures().into_iter().map(|r| &r.target).collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn built_count(&self) -> usize {
        self.results.iter().filter(|r| !r.outcome.is_failure()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failure()).count()
    }

    /// `true` when no recorded target failed. An empty report is a success.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.outcome.duration()).sum()
    }
}

/// A tooling step that is not allowed to fail: locating the sysroot, running
/// the scraper, cleaning the cache or spawning the build tool.
///
/// Carried inside `anyhow::Error` so the binary can exit with the step's own status.
///
/// 不允许失败的工具步骤：定位 sysroot、运行抓取器、清理缓存或启动构建工具。
/// 封装在 `anyhow::Error` 中，以便二进制程序以该步骤自身的状态退出。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{step}` {}", describe_exit(.code))]
pub struct StepFailure {
    /// The command line of the failed step / 失败步骤的命令行
    pub step: String,
    /// The step's exit code, `None` if it was killed or could not be spawned.
    /// 步骤的退出码，如果被终止或无法启动则为 `None`。
    pub code: Option<i32>,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => t!("command.exited_with", code = code).to_string(),
        None => t!("command.no_exit_status").to_string(),
    }
}
