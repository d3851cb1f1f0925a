//! # Sysroot Matrix Library / Sysroot 矩阵库
//!
//! This library provides the core functionality for the `sysroot-matrix` tool,
//! a CI helper that builds a toolchain sysroot for every supported target and
//! reports the targets whose build failed.
//!
//! 此库为 `sysroot-matrix` 工具提供核心功能，
//! 这是一个为每个受支持的目标构建工具链 sysroot 并报告构建失败目标的 CI 辅助工具。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, configuration, target discovery and the matrix loop
//! - `infra` - Command templates, process capture, the failure-records directory, logging
//! - `reporting` - Console summaries plus HTML and JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、配置、目标发现和矩阵循环
//! - `infra` - 命令模板、进程输出捕获、失败记录目录、日志
//! - `reporting` - 控制台摘要以及 HTML 和 JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

/// Resolves a requested locale against the locales bundled with the binary.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "zh"), and finally falls back to "en".
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }

    let lang_code = requested.split(['-', '_']).next().unwrap_or_default();
    available_locales
        .iter()
        .find(|locale| {
            **locale == lang_code
                || locale
                    .split('-')
                    .next()
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(lang_code))
        })
        .map(|locale| locale.to_string())
        .unwrap_or_else(|| "en".to_string())
}

/// Detects the system locale and activates the closest bundled translation.
pub fn init() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let lang = resolve_locale(&locale);
    rust_i18n::set_locale(&lang);
    lang
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
