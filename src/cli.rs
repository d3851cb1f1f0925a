// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, parser::ValueSource};
use std::{env, path::PathBuf, process::ExitCode};

use crate::core::{config::DEFAULT_CONFIG_FILE, models::StepFailure};
use crate::infra::{logging, t};

pub mod commands;

use commands::run::RunArgs;

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every target built, or there was nothing to build.
    Success,
    /// At least one target's sysroot failed to build.
    TargetsFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::TargetsFailed => ExitCode::from(1),
        }
    }
}

/// Maps a fatal error to the process exit status.
///
/// A failed tooling step propagates its own exit code; anything else exits 1.
pub fn exit_code_for_error(error: &anyhow::Error) -> ExitCode {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StepFailure>())
        .and_then(|failure| failure.code)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang="))
        .map(str::to_string)
}

fn build_cli(locale: &str) -> Command {
    Command::new("sysroot-matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .help(t!("cli.arg_target", locale = locale).to_string())
                        .value_name("TARGET")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("targets-file")
                        .long("targets-file")
                        .help(t!("cli.arg_targets_file", locale = locale).to_string())
                        .value_name("PATH")
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with("target")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("failures-dir")
                        .long("failures-dir")
                        .help(t!("cli.arg_failures_dir", locale = locale).to_string())
                        .value_name("DIR")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("total-runners")
                        .long("total-runners")
                        .help(t!("cli.arg_total_runners", locale = locale).to_string())
                        .value_name("TOTAL_RUNNERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("runner-index"),
                )
                .arg(
                    Arg::new("runner-index")
                        .long("runner-index")
                        .help(t!("cli.arg_runner_index", locale = locale).to_string())
                        .value_name("RUNNER_INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("total-runners"),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("cli.arg_json", locale = locale).to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help(t!("cli.arg_quiet", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output", locale = locale).to_string())
                        .value_name("PATH")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("cli.arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_args_from_matches(matches: &ArgMatches, lang: Option<String>) -> RunArgs {
    RunArgs {
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        config_explicit: matches.value_source("config") == Some(ValueSource::CommandLine),
        targets: matches
            .get_many::<String>("target")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        targets_file: matches.get_one::<PathBuf>("targets-file").cloned(),
        failures_dir: matches.get_one::<PathBuf>("failures-dir").cloned(),
        total_runners: matches.get_one::<usize>("total-runners").copied(),
        runner_index: matches.get_one::<usize>("runner-index").copied(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        quiet: matches.get_flag("quiet"),
        lang,
    }
}

pub async fn run() -> Result<RunStatus> {
    // Pre-parse language and initialize i18n first.
    let lang_override = pre_parse_language().map(|lang| crate::resolve_locale(&lang));
    let language = match &lang_override {
        Some(lang) => {
            rust_i18n::set_locale(lang);
            lang.clone()
        }
        None => crate::init(),
    };

    let matches = build_cli(&language).get_matches();
    logging::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = run_args_from_matches(run_matches, lang_override);
            commands::run::execute(args).await
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            commands::init::run_init_wizard(
                &output,
                &language,
                init_matches.get_flag("non-interactive"),
                init_matches.get_flag("force"),
            )?;
            Ok(RunStatus::Success)
        }
        // `subcommand_required` makes clap exit before we get here.
        _ => Ok(RunStatus::Success),
    }
}
