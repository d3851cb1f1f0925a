//! # Matrix Execution Module / 矩阵执行模块
//!
//! The per-target loop. Targets are attempted exactly once, strictly one after
//! another: clean the cache, build the sysroot, classify the result. Only the
//! build action may fail without ending the run; a failing clean action aborts
//! it immediately.
//!
//! 逐目标循环。每个目标严格依次只尝试一次：清理缓存、构建 sysroot、分类结果。
//! 只有构建动作可以失败而不终止运行；清理动作失败会立即中止运行。

use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;

use crate::{
    core::{
        config::CommandsConfig,
        models::{MatrixReport, StepFailure, Target, TargetOutcome},
    },
    infra::{
        command::{self, CommandTemplate, TARGET_PLACEHOLDER},
        t,
    },
};

/// The parsed clean and build commands of a run.
#[derive(Debug, Clone)]
pub struct MatrixCommands {
    /// `None` when the configuration disables the clean step.
    pub clean: Option<CommandTemplate>,
    pub build: CommandTemplate,
}

impl MatrixCommands {
    pub fn from_config(config: &CommandsConfig) -> Result<Self> {
        let clean = if config.clean.trim().is_empty() {
            None
        } else {
            Some(CommandTemplate::parse(&config.clean)?)
        };
        let build = CommandTemplate::parse(&config.build)?;

        if !build.uses_placeholder(TARGET_PLACEHOLDER) {
            tracing::warn!(
                command = build.source(),
                "build command has no {TARGET_PLACEHOLDER} placeholder; every target runs the same command"
            );
        }

        Ok(Self { clean, build })
    }
}

/// Runs the whole matrix and returns the outcome of every target.
///
/// # Errors
/// Returns the first tooling failure: a clean action that exits non-zero, or
/// a build action that cannot be spawned at all. Target build failures are
/// recorded in the report instead.
pub async fn run_matrix(
    targets: &[Target],
    commands: &MatrixCommands,
    echo_output: bool,
) -> Result<MatrixReport> {
    let mut report = MatrixReport::new();
    let total = targets.len();

    for (i, target) in targets.iter().enumerate() {
        println!(
            "\n{}",
            t!("run.target_header", index = i + 1, total = total, target = target)
                .blue()
                .bold()
        );

        if let Some(clean) = &commands.clean {
            clean_cache(clean).await?;
        }

        let outcome = build_target(target, &commands.build, echo_output).await?;
        report.record(target.clone(), outcome);
    }

    Ok(report)
}

/// Runs the cache-clean action. It takes no target argument.
pub async fn clean_cache(clean: &CommandTemplate) -> Result<()> {
    let step = clean.display(&[]);
    command::run_step(&step, clean.to_command(&[]))
        .await
        .with_context(|| t!("run.clean_failed").to_string())
}

/// Builds one target's sysroot and classifies the result.
///
/// A non-zero exit, or death by signal, is a `Failed` outcome carrying the
/// combined output. Only a failure to spawn the build tool is an error.
pub async fn build_target(
    target: &Target,
    build: &CommandTemplate,
    echo_output: bool,
) -> Result<TargetOutcome> {
    let vars = [(TARGET_PLACEHOLDER, target.as_str())];
    let command_line = build.display(&vars);
    tracing::debug!(%target, command = %command_line, "building sysroot");

    let start_time = Instant::now();
    let (status_res, output) = command::spawn_and_capture(build.to_command(&vars), echo_output).await;
    let duration = start_time.elapsed();

    let status = status_res
        .map_err(|e| {
            anyhow::Error::new(StepFailure {
                step: command_line.clone(),
                code: None,
            })
            .context(e)
        })
        .with_context(|| t!("run.build_spawn_failed", target = target).to_string())?;

    if status.success() {
        println!(
            "{}",
            t!(
                "run.target_built",
                target = target,
                duration = format!("{:.2}", duration.as_secs_f64())
            )
            .green()
        );
        Ok(TargetOutcome::Built { duration })
    } else {
        let code = status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| t!("run.no_exit_code").to_string());
        println!(
            "{}",
            t!(
                "run.target_failed",
                target = target,
                code = code,
                duration = format!("{:.2}", duration.as_secs_f64())
            )
            .red()
        );
        Ok(TargetOutcome::Failed {
            output,
            exit_code: status.code(),
            duration,
        })
    }
}
