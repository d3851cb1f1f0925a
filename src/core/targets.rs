//! # Target Discovery Module / 目标发现模块
//!
//! Produces the ordered list of targets a run works through. By default the
//! list comes from an external scraper that reads the platform-support page
//! shipped with the active toolchain.
//!
//! 生成一次运行要处理的有序目标列表。默认情况下，列表来自外部抓取器，
//! 它读取当前工具链附带的平台支持页面。

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::core::config::{MatrixConfig, ToolchainConfig};
use crate::core::models::Target;
use crate::infra::command::{self, CommandTemplate, DOC_PLACEHOLDER};
use crate::infra::t;

/// Where a run takes its targets from, in order of precedence.
/// 运行获取目标的来源，按优先级排列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Targets named on the command line / 命令行上指定的目标
    Explicit(Vec<String>),
    /// A file with one target per line; `-` reads stdin / 每行一个目标的文件；`-` 读取标准输入
    File(PathBuf),
    /// The `targets.list` array of the configuration / 配置中的 `targets.list` 数组
    Config(Vec<String>),
    /// The scraper run against the platform-support page / 针对平台支持页面运行的抓取器
    Scraper,
}

impl TargetSource {
    /// Picks the source: command-line targets, then a targets file, then the
    /// configured list, then the scraper.
    pub fn select(explicit: Vec<String>, file: Option<PathBuf>, config: &MatrixConfig) -> Self {
        if !explicit.is_empty() {
            TargetSource::Explicit(explicit)
        } else if let Some(file) = file {
            TargetSource::File(file)
        } else if !config.targets.list.is_empty() {
            TargetSource::Config(config.targets.list.clone())
        } else {
            TargetSource::Scraper
        }
    }
}

/// Resolves a `TargetSource` into validated targets, in source order.
pub async fn discover_targets(source: &TargetSource, config: &MatrixConfig) -> Result<Vec<Target>> {
    match source {
        TargetSource::Explicit(names) | TargetSource::Config(names) => {
            names.iter().map(Target::new).collect()
        }
        TargetSource::File(path) => {
            let text = read_targets_file(path)?;
            parse_target_list(&text)
        }
        TargetSource::Scraper => {
            let doc = locate_platform_support_doc(&config.toolchain).await?;
            let scraper = CommandTemplate::parse(&config.targets.scraper)?;
            scrape_targets(&scraper, &doc).await
        }
    }
}

/// Parses scraper-style output: one target per line, blank lines ignored.
pub fn parse_target_list(text: &str) -> Result<Vec<Target>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            Target::new(line)
                .with_context(|| t!("targets.invalid_line", line = line).to_string())
        })
        .collect()
}

fn read_targets_file(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .with_context(|| t!("targets.stdin_read_failed").to_string())?;
        return Ok(text);
    }
    fs::read_to_string(path)
        .with_context(|| t!("targets.file_read_failed", path = path.display()).to_string())
}

/// Asks the toolchain for its installation root and returns the path of the
/// platform-support page inside it.
pub async fn locate_platform_support_doc(toolchain: &ToolchainConfig) -> Result<PathBuf> {
    let mut cmd = Command::new(&toolchain.rustc);
    if let Some(name) = &toolchain.toolchain {
        cmd.arg(format!("+{name}"));
    }
    cmd.arg("--print").arg("sysroot").kill_on_drop(true);

    let step = match &toolchain.toolchain {
        Some(name) => format!("{} +{name} --print sysroot", toolchain.rustc),
        None => format!("{} --print sysroot", toolchain.rustc),
    };

    let sysroot = command::step_stdout(&step, cmd)
        .await
        .with_context(|| t!("targets.sysroot_failed").to_string())?;
    let sysroot = sysroot.trim();
    if sysroot.is_empty() {
        bail!(t!("targets.sysroot_empty", command = &step).to_string());
    }

    let doc = Path::new(sysroot).join(&toolchain.platform_support_doc);
    if !doc.is_file() {
        bail!(t!("targets.doc_missing", path = doc.display()).to_string());
    }
    tracing::debug!(doc = %doc.display(), "located platform support page");
    Ok(doc)
}

/// Runs the scraper with `{doc}` replaced and parses its stdout.
pub async fn scrape_targets(scraper: &CommandTemplate, doc: &Path) -> Result<Vec<Target>> {
    let doc = doc.to_string_lossy();
    let vars = [(DOC_PLACEHOLDER, doc.as_ref())];
    let step = scraper.display(&vars);

    let stdout = command::step_stdout(&step, scraper.to_command(&vars))
        .await
        .with_context(|| t!("targets.scraper_failed").to_string())?;

    let targets = parse_target_list(&stdout)?;
    tracing::debug!(count = targets.len(), "scraper listed targets");
    Ok(targets)
}
