//! # Reporting Module / 报告模块
//!
//! This module handles the display of matrix results: the console summary and
//! failure list, plus optional HTML and JSON report files.
//!
//! 此模块处理矩阵结果的展示：控制台摘要和失败列表，以及可选的 HTML 和 JSON 报告文件。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failed_targets, print_summary};
pub use html::generate_html_report;
pub use json::generate_json_report;
