//! Runtime configuration.
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (~/.syncpilot/config.toml or config.json)
//! 3. Environment variables (SYNCPILOT_* prefix)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::command::CommandBuilder;
use crate::error::ConfigError;
use crate::validate::PathPolicy;

/// Crate-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Home directory for syncpilot state (~/.syncpilot)
	pub state_dir: PathBuf,

	/// The rsync binary to invoke (name or absolute path)
	pub rsync_binary: String,

	/// Patterns excluded when the system-paths option is on
	pub system_exclude_patterns: Vec<String>,

	/// Where syncs are allowed to operate
	pub policy: PolicyConfig,
}

/// Path policy settings.
///
/// The restriction to home-and-volumes pairs is a product decision, not a
/// filesystem one, which is why it lives in configuration instead of code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyConfig {
	/// Enforce the pair restriction at validation time
	pub enforce: bool,

	/// Home root; falls back to $HOME when unset
	pub home: Option<PathBuf>,

	/// Roots under which externally mounted volumes appear
	pub volume_roots: Vec<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			state_dir: home_dir().join(".syncpilot"),
			rsync_binary: "rsync".to_string(),
			system_exclude_patterns: vec![
				".Trash".to_string(),
				".Trashes".to_string(),
				".Spotlight-V100".to_string(),
			],
			policy: PolicyConfig::default(),
		}
	}
}

impl Default for PolicyConfig {
	fn default() -> Self {
		PolicyConfig {
			enforce: true,
			home: None,
			volume_roots: vec![PathBuf::from("/Volumes")],
		}
	}
}

fn home_dir() -> PathBuf {
	env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
	/// Load configuration through the defaults -> file -> env chain.
	pub fn load() -> Result<Self, ConfigError> {
		let mut config = Config::default();

		let toml_path = config.state_dir.join("config.toml");
		let json_path = config.state_dir.join("config.json");
		if toml_path.exists() {
			let raw = fs::read_to_string(&toml_path)
				.map_err(|e| ConfigError::Io { path: toml_path.clone(), source: e })?;
			config = toml::from_str(&raw)
				.map_err(|e| ConfigError::Parse { path: toml_path, message: e.to_string() })?;
		} else if json_path.exists() {
			let raw = fs::read_to_string(&json_path)
				.map_err(|e| ConfigError::Io { path: json_path.clone(), source: e })?;
			config = serde_json::from_str(&raw)
				.map_err(|e| ConfigError::Parse { path: json_path, message: e.to_string() })?;
		}

		config.apply_env();
		Ok(config)
	}

	fn apply_env(&mut self) {
		if let Some(dir) = env::var_os("SYNCPILOT_STATE_DIR") {
			self.state_dir = PathBuf::from(dir);
		}
		if let Ok(binary) = env::var("SYNCPILOT_RSYNC_BINARY") {
			self.rsync_binary = binary;
		}
		if let Ok(enforce) = env::var("SYNCPILOT_ENFORCE_POLICY") {
			self.policy.enforce = matches!(enforce.as_str(), "1" | "true" | "yes");
		}
	}

	/// Command builder configured with this binary and exclusion set.
	pub fn command_builder(&self) -> CommandBuilder {
		CommandBuilder::new(self.rsync_binary.clone(), self.system_exclude_patterns.clone())
	}

	/// Resolve the policy settings into a checkable [`PathPolicy`].
	pub fn path_policy(&self) -> PathPolicy {
		PathPolicy {
			enforce: self.policy.enforce,
			home: self.policy.home.clone().unwrap_or_else(home_dir),
			volume_roots: self.policy.volume_roots.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_config_default() {
		let config = Config::default();
		assert_eq!(config.rsync_binary, "rsync");
		assert_eq!(config.system_exclude_patterns.len(), 3);
		assert!(config.policy.enforce);
		assert_eq!(config.policy.volume_roots, vec![PathBuf::from("/Volumes")]);
	}

	#[test]
	fn test_config_serialization() {
		let config = Config::default();
		let json = serde_json::to_string(&config).expect("Failed to serialize");
		let deserialized: Config = serde_json::from_str(&json).expect("Failed to deserialize");
		assert_eq!(config.rsync_binary, deserialized.rsync_binary);
		assert_eq!(config.policy.enforce, deserialized.policy.enforce);
	}

	#[test]
	fn test_partial_file_keeps_defaults() {
		let config: Config = toml::from_str("rsyncBinary = \"/opt/rsync/bin/rsync\"").unwrap();
		assert_eq!(config.rsync_binary, "/opt/rsync/bin/rsync");
		assert_eq!(config.system_exclude_patterns.len(), 3);
	}

	#[test]
	fn test_path_policy_resolves_home() {
		let mut config = Config::default();
		config.policy.home = Some(PathBuf::from("/Users/somebody"));
		let policy = config.path_policy();
		assert_eq!(policy.home, PathBuf::from("/Users/somebody"));
	}
}

// vim: ts=4
