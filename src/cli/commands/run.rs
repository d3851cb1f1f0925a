//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: reset the failure-records
//! directory, discover and plan the targets, build every sysroot, then report.
//!
//! 此模块实现 `run` 命令：重置失败记录目录，发现并规划目标，构建每个 sysroot，然后报告。

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::{
    cli::RunStatus,
    core::{
        config::{self, MatrixConfig},
        execution::{MatrixCommands, run_matrix},
        planner,
        targets::{self, TargetSource},
    },
    infra::{fs::FailureRecords, t},
    reporting::{
        console::{print_failed_targets, print_summary},
        html::generate_html_report,
        json::generate_json_report,
    },
};

/// Arguments of the `run` subcommand.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to `SysrootMatrix.toml`
    pub config: PathBuf,
    /// `true` if the user passed `--config`; a missing explicit file is an error.
    pub config_explicit: bool,
    pub targets: Vec<String>,
    pub targets_file: Option<PathBuf>,
    pub failures_dir: Option<PathBuf>,
    pub total_runners: Option<usize>,
    pub runner_index: Option<usize>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// Do not echo build output while it runs.
    pub quiet: bool,
    /// Locale given with `--lang`; overrides the configuration.
    pub lang: Option<String>,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// `RunStatus::TargetsFailed` when at least one sysroot failed to build.
/// Tooling failures are returned as errors.
pub async fn execute(args: RunArgs) -> Result<RunStatus> {
    let matrix_config = config::resolve_matrix_config(&args.config, args.config_explicit)?;
    let locale = match &args.lang {
        Some(lang) => lang.clone(),
        None => crate::resolve_locale(&matrix_config.language),
    };
    rust_i18n::set_locale(&locale);

    // The directory is wiped before anything else runs, so a run that aborts
    // early never leaves a previous run's records behind.
    let failures_dir = args
        .failures_dir
        .clone()
        .unwrap_or_else(|| matrix_config.failures_dir.clone());
    let failures = FailureRecords::reset(&failures_dir)?;
    println!(
        "{}",
        t!("run.failures_dir_ready", path = failures.path().display())
    );

    let commands = MatrixCommands::from_config(&matrix_config.commands)?;
    let plan = plan_targets(&args, &matrix_config).await?;

    if plan.targets.is_empty() {
        println!("{}", t!("run.no_targets").green());
        return Ok(RunStatus::Success);
    }

    let echo_output = matrix_config.echo_output && !args.quiet;
    let report = run_matrix(&plan.targets, &commands, echo_output).await?;

    failures.materialize(&report)?;
    print_summary(&report);

    // A requested report that cannot be written is fatal.
    if let Some(path) = &args.html {
        println!("\n{}", t!("run.writing_html", path = path.display()));
        generate_html_report(&report, path)?;
    }
    if let Some(path) = &args.json {
        println!("{}", t!("run.writing_json", path = path.display()));
        generate_json_report(&report, path)?;
    }

    let failed = failures.list()?;
    if failed.is_empty() {
        println!("\n{}", t!("run.all_built").green().bold());
        Ok(RunStatus::Success)
    } else {
        print_failed_targets(&failed);
        Ok(RunStatus::TargetsFailed)
    }
}

async fn plan_targets(args: &RunArgs, matrix_config: &MatrixConfig) -> Result<planner::ExecutionPlan> {
    let source = TargetSource::select(
        args.targets.clone(),
        args.targets_file.clone(),
        matrix_config,
    );
    tracing::debug!(?source, "discovering targets");

    let discovered = targets::discover_targets(&source, matrix_config).await?;
    let plan = planner::plan_execution(
        discovered,
        &matrix_config.targets.exclude,
        args.total_runners,
        args.runner_index,
    )?;

    if plan.duplicate_count > 0 {
        println!(
            "{}",
            t!("plan.duplicates", count = plan.duplicate_count).yellow()
        );
    }
    if plan.excluded_count > 0 {
        println!(
            "{}",
            t!("plan.excluded", count = plan.excluded_count).cyan()
        );
    }

    if let (true, Some(total), Some(index)) =
        (plan.is_distributed, args.total_runners, args.runner_index)
    {
        println!(
            "{}",
            t!(
                "plan.split_runner",
                index = index + 1,
                total = total,
                count = plan.targets.len()
            )
            .bold()
        );
    } else if !plan.targets.is_empty() {
        println!(
            "{}",
            t!("plan.single_runner", count = plan.targets.len()).bold()
        );
    }

    Ok(plan)
}
