//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints matrix results to the console with color and
//! internationalization support.
//!
//! 此模块在控制台打印矩阵结果，支持颜色和国际化。

use colored::*;

use crate::core::models::{MatrixReport, TargetOutcome};
use crate::infra::t;

/// Prints a formatted summary of the matrix results to the console.
/// Displays one row per target with status, name, duration and exit code.
///
/// 在控制台打印格式化的矩阵结果摘要。
/// 每个目标一行，显示状态、名称、持续时间和退出码。
///
/// # Output Format / 输出格式
/// ```text
/// --- Sysroot Matrix Summary ---
///   - Built    | x86_64-unknown-linux-gnu                 |     41.20s
///   - Failed   | mips-unknown-linux-gnu                   |      3.02s  (exit 101)
/// ```
pub fn print_summary(report: &MatrixReport) {
    if report.is_empty() {
        return;
    }

    println!("\n{}", t!("summary.banner").bold());

    for result in report.results() {
        let duration_str = format!("{:.2?}", result.outcome.duration());
        let (status, exit_str) = match &result.outcome {
            TargetOutcome::Built { .. } => (t!("summary.status_built").green(), String::new()),
            TargetOutcome::Failed { exit_code, .. } => {
                let exit_str = match exit_code {
                    Some(code) => format!(" (exit {code})"),
                    None => format!(" ({})", t!("run.no_exit_code")),
                };
                (t!("summary.status_failed").red(), exit_str)
            }
        };

        println!(
            "  - {:<8} | {:<40} | {:>10}{}",
            status, result.target, duration_str, exit_str
        );
    }

    println!(
        "\n{}",
        t!(
            "summary.totals",
            total = report.len(),
            built = report.built_count(),
            failed = report.failed_count()
        )
    );
}

/// Prints the failure summary: a header line, then every failed target name on
/// its own line. Names are printed bare so CI logs can be grepped.
pub fn print_failed_targets(failed: &[String]) {
    if failed.is_empty() {
        return;
    }

    println!("\n{}", t!("summary.failed_header").red().bold());
    for name in failed {
        println!("{name}");
    }
}
