use crate::config::types::{ColorMode, Settings};
use std::ffi::OsString;

/// Decides whether an invocation's output gets colorized.
#[derive(Debug, Clone)]
pub struct ColorGate {
	subcommands: Vec<String>,
	mode: ColorMode,
}

impl ColorGate {
	pub fn new(subcommands: Vec<String>, mode: ColorMode) -> Self {
		ColorGate { subcommands, mode }
	}

	/// Build a gate from settings, resolving the mode against the environment
	/// through `env`.
	pub fn from_settings<F>(settings: &Settings, env: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let mode = resolve_color_mode(
			settings.color,
			env(&settings.color_env_var).as_deref(),
			env("NO_COLOR").as_deref(),
		);
		ColorGate::new(settings.subcommands.clone(), mode)
	}

	pub fn mode(&self) -> ColorMode {
		self.mode
	}

	/// True when the first argument is an allowed subcommand and the mode
	/// permits color for this stdout.
	pub fn should_colorize(&self, args: &[OsString], stdout_is_terminal: bool) -> bool {
		let Some(subcommand) = args.first().and_then(|arg| arg.to_str()) else {
			return false;
		};

		if !self.subcommands.iter().any(|allowed| allowed == subcommand) {
			return false;
		}

		match self.mode {
			ColorMode::Always => true,
			ColorMode::Never => false,
			ColorMode::Auto => stdout_is_terminal,
		}
	}
}

/// Resolve the effective color mode.
///
/// Priority: override variable → `NO_COLOR` (non-empty) → configured mode.
/// An override value that names no mode is ignored with a warning.
pub fn resolve_color_mode(
	configured: ColorMode,
	override_value: Option<&str>,
	no_color: Option<&str>,
) -> ColorMode {
	if let Some(value) = override_value {
		match ColorMode::parse_override(value) {
			Some(mode) => return mode,
			None => tracing::warn!(value, "ignoring unrecognized color override"),
		}
	}

	if no_color.is_some_and(|value| !value.is_empty()) {
		return ColorMode::Never;
	}

	configured
}
