//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! This module writes a `SysrootMatrix.toml` for the `init` command, either
//! straight from the built-in defaults or through an interactive wizard that
//! asks for the toolchain, the two build-tool commands and the failures
//! directory.
//!
//! 此模块为 `init` 命令写入 `SysrootMatrix.toml`，可以直接使用内置默认值，
//! 也可以通过交互式向导询问工具链、两个构建工具命令和失败目录。

use anyhow::{Context, Result, bail};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::MatrixConfig;
use crate::infra::command::{CommandTemplate, TARGET_PLACEHOLDER};
use crate::infra::t;

/// Runs the `init` command.
///
/// Non-interactive mode writes the defaults and refuses to replace an existing
/// file unless `force` is set. The wizard asks before overwriting instead.
pub fn run_init_wizard(
    config_path: &Path,
    language: &str,
    non_interactive: bool,
    force: bool,
) -> Result<()> {
    let mut matrix_config = MatrixConfig {
        language: language.to_string(),
        ..MatrixConfig::default()
    };

    if non_interactive {
        if config_path.exists() && !force {
            bail!(t!("init.file_exists", path = config_path.display()).to_string());
        }
        return write_config(config_path, &matrix_config);
    }

    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init.welcome").cyan().bold());
    println!("{}", t!("init.description"));

    if config_path.exists() && !force {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", path = config_path.display()).to_string())
            .default(false)
            .interact()
            .context(t!("init.prompt_failed").to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted"));
            return Ok(());
        }
    }

    let toolchain: String = Input::with_theme(&theme)
        .with_prompt(t!("init.toolchain_prompt").to_string())
        .default(matrix_config.toolchain.toolchain.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .context(t!("init.prompt_failed").to_string())?;
    let toolchain = toolchain.trim();
    matrix_config.toolchain.toolchain = (!toolchain.is_empty()).then(|| toolchain.to_string());

    matrix_config.commands.clean = Input::with_theme(&theme)
        .with_prompt(t!("init.clean_prompt").to_string())
        .default(matrix_config.commands.clean.clone())
        .allow_empty(true)
        .validate_with(|input: &String| validate_command(input, false))
        .interact_text()
        .context(t!("init.prompt_failed").to_string())?;

    matrix_config.commands.build = Input::with_theme(&theme)
        .with_prompt(t!("init.build_prompt").to_string())
        .default(matrix_config.commands.build.clone())
        .validate_with(|input: &String| validate_command(input, true))
        .interact_text()
        .context(t!("init.prompt_failed").to_string())?;

    let failures_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init.failures_dir_prompt").to_string())
        .default(matrix_config.failures_dir.display().to_string())
        .interact_text()
        .context(t!("init.prompt_failed").to_string())?;
    matrix_config.failures_dir = PathBuf::from(failures_dir.trim());

    write_config(config_path, &matrix_config)
}

/// Checks a command typed into the wizard. An empty clean command is allowed
/// and disables the clean step.
fn validate_command(input: &str, needs_target: bool) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        return if needs_target {
            Err(t!("init.build_command_required").to_string())
        } else {
            Ok(())
        };
    }
    let template = CommandTemplate::parse(input).map_err(|e| format!("{e:#}"))?;
    if needs_target && !template.uses_placeholder(TARGET_PLACEHOLDER) {
        return Err(t!("init.missing_target_placeholder").to_string());
    }
    Ok(())
}

fn write_config(path: &Path, matrix_config: &MatrixConfig) -> Result<()> {
    let toml_string = toml::to_string_pretty(matrix_config)
        .context(t!("init.serialize_failed").to_string())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| t!("fs.create_dir_failed", path = parent.display()).to_string())?;
    }

    fs::write(path, toml_string)
        .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success", path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint"));

    Ok(())
}
