//! Machine-readable JSON report, for CI jobs that post-process the matrix.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{MatrixReport, Target, TargetOutcome};
use crate::infra::t;

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub success: bool,
    pub total: usize,
    pub built: usize,
    pub failed: usize,
    pub failed_targets: Vec<&'a str>,
    pub results: Vec<JsonTargetResult<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonTargetResult<'a> {
    pub target: &'a str,
    pub status: &'static str,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<&'a str>,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a MatrixReport, generated_at: DateTime<Utc>) -> Self {
        let results = report
            .results()
            .iter()
            .map(|result| match &result.outcome {
                TargetOutcome::Built { duration } => JsonTargetResult {
                    target: result.target.as_str(),
                    status: "built",
                    duration_secs: duration.as_secs_f64(),
                    exit_code: Some(0),
                    output: None,
                },
                TargetOutcome::Failed {
                    output,
                    exit_code,
                    duration,
                } => JsonTargetResult {
                    target: result.target.as_str(),
                    status: "failed",
                    duration_secs: duration.as_secs_f64(),
                    exit_code: *exit_code,
                    output: Some(output.as_str()),
                },
            })
            .collect();

        Self {
            generated_at,
            success: report.is_success(),
            total: report.len(),
            built: report.built_count(),
            failed: report.failed_count(),
            failed_targets: report.failed_targets().into_iter().map(Target::as_str).collect(),
            results,
        }
    }
}

pub fn generate_json_report(report: &MatrixReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::new(report, Utc::now()))?;
    fs::write(output_path, json)
        .with_context(|| t!("report.write_failed", path = output_path.display()).to_string())
}
