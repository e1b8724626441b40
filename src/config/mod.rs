//! Configuration loading and parsing for svn-color.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Merging the cascade over built-in defaults

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_settings, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{ColorMode, Config, LoadedConfig, Rule, RuleWithSource, Settings};
