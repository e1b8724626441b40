use std::path::PathBuf;

/// Library-level structured errors for svn-color.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum SvnColorError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid SGR color code: {color:?}")]
	InvalidColor { color: String },

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Rule needs one of: {option1} or {option2}")]
	MissingTrigger { option1: String, option2: String },

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Refusing to run svn-color as its own svn binary: {path}")]
	SelfInvocation { path: PathBuf },

	#[error("Output from {command} is not valid UTF-8")]
	InvalidUtf8 {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to relay output from {command}")]
	OutputFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using SvnColorError.
pub type Result<T> = std::result::Result<T, SvnColorError>;
