use serde::Deserialize;
use std::path::PathBuf;

/// Path of the real client when no config names one.
pub const DEFAULT_SVN_BINARY: &str = "/usr/bin/svn";

/// Environment variable that overrides the color mode when no config names one.
pub const DEFAULT_COLOR_ENV_VAR: &str = "SVN_COLOR";

/// Subcommands whose output is colorized by default.
pub const DEFAULT_SUBCOMMANDS: &[&str] = &[
	"status", "stat", "st", "add", "remove", "diff", "di", "log", "update", "up",
];

/// When to colorize output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
	/// Colorize only when stdout is a terminal.
	#[default]
	Auto,
	Always,
	Never,
}

impl ColorMode {
	/// Parse an override value such as `always`, `1`, `no` or `auto`.
	///
	/// Returns `None` for values that name no mode.
	pub fn parse_override(value: &str) -> Option<Self> {
		match value.trim().to_lowercase().as_str() {
			"" | "auto" => Some(ColorMode::Auto),
			"always" | "1" | "true" | "yes" | "on" | "force" => Some(ColorMode::Always),
			"never" | "0" | "false" | "no" | "off" => Some(ColorMode::Never),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ColorMode::Auto => "auto",
			ColorMode::Always => "always",
			ColorMode::Never => "never",
		}
	}
}

/// Top-level configuration from a `.svn-color.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.svn-color.toml.
	#[serde(default)]
	pub root: bool,

	/// Absolute path, or name looked up on PATH, of the real svn client.
	#[serde(default)]
	pub svn_binary: Option<String>,

	/// Color mode used when the override variable is unset.
	#[serde(default)]
	pub color: Option<ColorMode>,

	/// Name of the environment variable that overrides `color`.
	#[serde(default)]
	pub color_env_var: Option<String>,

	/// Subcommands whose output is colorized.
	#[serde(default)]
	pub subcommands: Option<Vec<String>>,

	/// Extra solid-color rules, tried after the built-in ones.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A user-defined colorization rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Literal prefix that triggers the rule (mutually exclusive with pattern).
	pub prefix: Option<String>,

	/// Regex that must match at the start of the line (mutually exclusive with prefix).
	pub pattern: Option<String>,

	/// SGR color code applied to the whole line, e.g. "36" or "38;5;208".
	pub color: String,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

/// Effective settings after merging the cascade over the defaults.
#[derive(Debug, Clone)]
pub struct Settings {
	pub svn_binary: String,
	pub color: ColorMode,
	pub color_env_var: String,
	pub subcommands: Vec<String>,

	/// All rules from all configs, in cascade order.
	pub rules: Vec<RuleWithSource>,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			svn_binary: DEFAULT_SVN_BINARY.to_string(),
			color: ColorMode::Auto,
			color_env_var: DEFAULT_COLOR_ENV_VAR.to_string(),
			subcommands: DEFAULT_SUBCOMMANDS.iter().map(|s| s.to_string()).collect(),
			rules: Vec::new(),
		}
	}
}

impl Rule {
	/// Validate that exactly one trigger is set and the color is well formed.
	pub fn validate(&self) -> Result<(), crate::error::SvnColorError> {
		match (&self.prefix, &self.pattern) {
			(Some(_), Some(_)) => {
				return Err(crate::error::SvnColorError::MutuallyExclusive {
					option1: "prefix".to_string(),
					option2: "pattern".to_string(),
				});
			}
			(None, None) => {
				return Err(crate::error::SvnColorError::MissingTrigger {
					option1: "prefix".to_string(),
					option2: "pattern".to_string(),
				});
			}
			_ => {}
		}

		crate::rules::ansi::validate_sgr(&self.color)
	}
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self) -> Result<(), crate::error::SvnColorError> {
		for rule in &self.rules {
			rule.validate()?;
		}
		Ok(())
	}
}
