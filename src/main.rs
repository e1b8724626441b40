use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use svn_color::config::load_settings;
use svn_color::exec::{
	ColorGate, ensure_not_self, execute_colorized, execute_passthrough, exit_code,
	resolve_command,
};
use svn_color::rules::compile_classifier;

/// Environment variable holding the log filter, e.g. `debug`.
const LOG_ENV_VAR: &str = "SVN_COLOR_LOG";

#[derive(Parser)]
#[command(name = "svn-color")]
#[command(
	version,
	about = "Drop-in svn wrapper that colorizes status, diff, log and update output"
)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
	/// Arguments passed to svn unchanged
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	args: Vec<OsString>,
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

/// Parse argv so every argument after argv[0] lands in `args` verbatim.
///
/// A `--` is inserted ahead of the user's arguments so clap never consumes
/// one of them as its own end-of-options marker.
fn parse_cli<I>(argv: I) -> Cli
where
	I: IntoIterator<Item = OsString>,
{
	let mut argv = argv.into_iter();
	let argv0 = argv.next().unwrap_or_else(|| OsString::from("svn-color"));
	Cli::parse_from(
		std::iter::once(argv0)
			.chain(std::iter::once(OsString::from("--")))
			.chain(argv),
	)
}

fn run() -> Result<ExitCode> {
	let cli = parse_cli(std::env::args_os());

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_settings(&cwd).context("Failed to load configuration")?;

	let binary = resolve_command(&settings.svn_binary)
		.ok_or_else(|| anyhow::anyhow!("svn binary not found: {}", settings.svn_binary))?;
	ensure_not_self(&binary)?;

	// Custom rules are compiled up front so config mistakes surface on every run.
	let classifier = compile_classifier(&settings.rules).context("Failed to compile rules")?;

	let gate = ColorGate::from_settings(&settings, |name| std::env::var(name).ok());
	let stdout_is_terminal = std::io::stdout().is_terminal();
	let colorize = gate.should_colorize(&cli.args, stdout_is_terminal);

	tracing::debug!(
		binary = %binary.display(),
		mode = gate.mode().as_str(),
		stdout_is_terminal,
		colorize,
		"running svn"
	);

	let executed = if colorize {
		let mut out = std::io::stdout().lock();
		execute_colorized(&binary, &cli.args, &classifier, &mut out)
	} else {
		execute_passthrough(&binary, &cli.args)
	};
	let status = executed.with_context(|| format!("Failed to execute: {}", binary.display()))?;

	Ok(ExitCode::from(exit_code(status)))
}
