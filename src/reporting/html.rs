//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML report of a matrix run: summary
//! counters, one row per target and the captured output of failed builds in
//! collapsible blocks.
//!
//! 此模块渲染矩阵运行的独立 HTML 报告：汇总计数、每个目标一行，
//! 以及可折叠块中失败构建的捕获输出。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{MatrixReport, TargetOutcome};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.6rem; }
.meta { color: #666; font-size: 0.9rem; }
.summary-container { display: flex; gap: 1.5rem; margin: 1.5rem 0; }
.summary-item { display: flex; flex-direction: column; align-items: center; padding: 0.8rem 1.4rem; border-radius: 6px; background: #f4f4f4; }
.summary-item .count { font-size: 1.8rem; font-weight: bold; }
.built-text { color: #2e7d32; }
.failed-text { color: #c62828; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #ddd; vertical-align: top; }
.status-built { color: #2e7d32; font-weight: bold; }
.status-failed { color: #c62828; font-weight: bold; }
.duration-cell { text-align: right; white-space: nowrap; }
pre.output-content { background: #1e1e1e; color: #ddd; padding: 0.8rem; overflow-x: auto; max-height: 30rem; }
"#;

/// Renders the report markup. Separate from writing so it can be inspected.
pub fn render_html_report(report: &MatrixReport, generated_at: DateTime<Utc>) -> Markup {
    let title = t!("html_report.title").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (title) }
                p class="meta" {
                    (t!("html_report.generated_at", time = generated_at.format("%Y-%m-%d %H:%M:%S UTC")).to_string())
                }
                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (report.len()) }
                        span class="label" { (t!("html_report.summary.total").to_string()) }
                    }
                    div class="summary-item" {
                        span class="count built-text" { (report.built_count()) }
                        span class="label" { (t!("html_report.summary.built").to_string()) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (report.failed_count()) }
                        span class="label" { (t!("html_report.summary.failed").to_string()) }
                    }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.target").to_string()) }
                            th { (t!("html_report.table.status").to_string()) }
                            th class="duration-cell" { (t!("html_report.table.duration").to_string()) }
                        }
                    }
                    tbody {
                        @for result in report.results() {
                            tr {
                                td { code { (result.target.as_str()) } }
                                @match &result.outcome {
                                    TargetOutcome::Built { .. } => {
                                        td class="status-built" { (t!("summary.status_built").to_string()) }
                                    }
                                    TargetOutcome::Failed { output, exit_code, .. } => {
                                        td class="status-failed" {
                                            (t!("summary.status_failed").to_string())
                                            @if let Some(code) = exit_code {
                                                " (exit " (code) ")"
                                            }
                                            details {
                                                summary { (t!("html_report.toggle_output").to_string()) }
                                                pre class="output-content" { (output) }
                                            }
                                        }
                                    }
                                }
                                td class="duration-cell" {
                                    (format!("{:.2}s", result.outcome.duration().as_secs_f64()))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Generates an HTML report from the matrix results and writes it to `output_path`.
///
/// # Errors
/// Returns an error if the output file cannot be written.
pub fn generate_html_report(report: &MatrixReport, output_path: &Path) -> Result<()> {
    let markup = render_html_report(report, Utc::now());
    fs::write(output_path, markup.into_string())
        .with_context(|| t!("report.write_failed", path = output_path.display()).to_string())
}
