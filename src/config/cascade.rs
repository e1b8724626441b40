use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, RuleWithSource, Settings};
use crate::error::{Result, SvnColorError};
use std::path::{Path, PathBuf};

/// File name looked up in every directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".svn-color.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.svn-color.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.svn-color.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let stop = config.root;

			tracing::debug!(path = %config_path.display(), root = stop, "loaded config");
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if stop {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs, dirs::home_dir())? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.svn-color.toml if it exists and the walk didn't already
/// pick it up. Without a home directory there is no user config.
fn load_user_config(
	existing_configs: &[LoadedConfig],
	home_dir: Option<PathBuf>,
) -> Result<Option<LoadedConfig>> {
	let Some(home_dir) = home_dir else {
		tracing::debug!("no home directory, skipping user config");
		return Ok(None);
	};
	let user_config_path = home_dir.join(CONFIG_FILE_NAME);

	if existing_configs
		.iter()
		.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		tracing::debug!(path = %user_config_path.display(), "loaded user config");
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into effective settings.
///
/// For single-valued keys the most specific config that sets them wins.
/// Rules are collected in cascade order.
pub fn merge_configs(configs: &[LoadedConfig]) -> Settings {
	let mut merged = Settings::default();
	let mut svn_binary = None;
	let mut color = None;
	let mut color_env_var = None;
	let mut subcommands = None;

	for loaded in configs {
		let config = &loaded.config;
		svn_binary = svn_binary.or_else(|| config.svn_binary.clone());
		color = color.or(config.color);
		color_env_var = color_env_var.or_else(|| config.color_env_var.clone());
		subcommands = subcommands.or_else(|| config.subcommands.clone());

		// Collect rules with their source
		for rule in &config.rules {
			merged.rules.push(RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}
	}

	if let Some(svn_binary) = svn_binary {
		merged.svn_binary = svn_binary;
	}
	if let Some(color) = color {
		merged.color = color;
	}
	if let Some(color_env_var) = color_env_var {
		merged.color_env_var = color_env_var;
	}
	if let Some(subcommands) = subcommands {
		merged.subcommands = subcommands;
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_settings(start_dir: &Path) -> Result<Settings> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(SvnColorError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
