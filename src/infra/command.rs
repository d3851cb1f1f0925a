//! # Command Execution Module / 命令执行模块
//!
//! Command templates read from the configuration, and the helpers that run
//! them: combined-output capture for build actions, plus fail-fast wrappers for
//! tooling steps that are not allowed to fail.
//!
//! 从配置读取的命令模板，以及运行它们的辅助函数：
//! 构建动作的合并输出捕获，以及不允许失败的工具步骤的快速失败包装。

use anyhow::{Context, Result, anyhow, bail};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::core::models::StepFailure;
use crate::infra::t;

/// Placeholder replaced with the target name in the build command.
pub const TARGET_PLACEHOLDER: &str = "{target}";
/// Placeholder replaced with the platform-support page path in the scraper command.
pub const DOC_PLACEHOLDER: &str = "{doc}";

/// A command line from the configuration, expanded and split into words.
///
/// Environment variables and `~` are expanded once with `shellexpand`; an unset
/// variable is an error. Expansion runs on the whole line before it is split,
/// so quotes do not protect a `$`: write `$$` for a literal `$` meant for a
/// child shell, as in `sh -c 'echo $$HOME'`. Placeholders are substituted per
/// word after splitting, so a substituted value never needs quoting.
///
/// 来自配置的命令行，已展开并拆分为单词。
/// 环境变量和 `~` 通过 `shellexpand` 展开一次；未设置的变量视为错误。
/// 展开在拆分之前作用于整行，引号不会保护 `$`：传给子 shell 的字面 `$` 需写作 `$$`。
/// 占位符在拆分后逐词替换，因此替换值无需加引号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    source: String,
    words: Vec<String>,
}

impl CommandTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let expanded = shellexpand::full(template)
            .with_context(|| t!("command.expand_failed", command = template).to_string())?
            .to_string();

        let words = shlex::split(&expanded)
            .ok_or_else(|| anyhow!(t!("command.parse_failed", command = &expanded).to_string()))?;

        if words.is_empty() {
            bail!(t!("command.empty", command = template).to_string());
        }

        Ok(Self {
            source: template.to_string(),
            words,
        })
    }

    /// The template exactly as written in the configuration.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &str {
        &self.words[0]
    }

    pub fn uses_placeholder(&self, placeholder: &str) -> bool {
        self.words.iter().any(|w| w.contains(placeholder))
    }

    /// Returns the words with every `(placeholder, value)` pair substituted.
    pub fn render(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.words
            .iter()
            .map(|word| {
                vars.iter()
                    .fold(word.clone(), |acc, (key, value)| acc.replace(key, value))
            })
            .collect()
    }

    /// Renders the command as a single shell-quoted line for display and errors.
    pub fn display(&self, vars: &[(&str, &str)]) -> String {
        let words = self.render(vars);
        shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
    }

    /// Builds a `tokio` command that is killed if its handle is dropped.
    pub fn to_command(&self, vars: &[(&str, &str)]) -> Command {
        let words = self.render(vars);
        let mut cmd = Command::new(&words[0]);
        cmd.args(&words[1..]).kill_on_drop(true);
        cmd
    }
}

/// Spawns a command and captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
/// With `echo` set every line is also printed as it arrives.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。设置 `echo` 时每一行在到达时也会被打印。
pub async fn spawn_and_capture(
    mut cmd: Command,
    echo: bool,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return (
            Err(std::io::Error::other(t!("command.capture_failed").to_string())),
            String::new(),
        );
    };

    // Shared by both reader tasks so lines land in arrival order.
    let output = Arc::new(tokio::sync::Mutex::new(String::new()));

    let stdout_handle = tokio::spawn(collect_lines(stdout, Arc::clone(&output), echo));
    let stderr_handle = tokio::spawn(collect_lines(stderr, Arc::clone(&output), echo));

    let status = child.wait().await;

    // Drain both pipes before reading the buffer.
    if let Err(e) = stdout_handle.await {
        tracing::warn!("failed to join stdout reader: {e}");
    }
    if let Err(e) = stderr_handle.await {
        tracing::warn!("failed to join stderr reader: {e}");
    }

    let output = output.lock().await.clone();
    (status, output)
}

/// Reads `stream` to the end, appending each line to `output`.
///
/// Lines are read as raw bytes and decoded lossily: build tools may print
/// anything. The pipe is always drained to EOF, even after a read error, so
/// the child never sees a closed pipe.
async fn collect_lines<R>(stream: R, output: Arc<tokio::sync::Mutex<String>>, echo: bool)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.strip_suffix('\n').unwrap_or(&text);
                let line = line.strip_suffix('\r').unwrap_or(line);
                if echo {
                    println!("{line}");
                }
                let mut output = output.lock().await;
                output.push_str(line);
                output.push('\n');
            }
            Err(e) => {
                tracing::warn!("failed to read command output: {e}");
                if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                    tracing::warn!("failed to drain command output: {e}");
                }
                break;
            }
        }
    }
}

/// Runs a tooling step with inherited stdio. Any failure, including a failure
/// to spawn, is returned as a `StepFailure`.
pub async fn run_step(step: &str, mut cmd: Command) -> Result<()> {
    tracing::debug!(step, "running step");
    let status = cmd
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            anyhow::Error::new(StepFailure {
                step: step.to_string(),
                code: None,
            })
            .context(e)
        })?;

    if !status.success() {
        return Err(StepFailure {
            step: step.to_string(),
            code: status.code(),
        }
        .into());
    }
    Ok(())
}

/// Runs a tooling step and returns its stdout. Stderr goes straight to the
/// console. A non-zero status is returned as a `StepFailure`.
pub async fn step_stdout(step: &str, mut cmd: Command) -> Result<String> {
    tracing::debug!(step, "capturing step output");
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|e| {
            anyhow::Error::new(StepFailure {
                step: step.to_string(),
                code: None,
            })
            .context(e)
        })?;

    if !output.status.success() {
        return Err(StepFailure {
            step: step.to_string(),
            code: output.status.code(),
        }
        .into());
    }

    String::from_utf8(output.stdout)
        .with_context(|| t!("command.non_utf8_output", command = step).to_string())
}
