//! CLI configuration file.
//!
//! Looked up at `$XDG_CONFIG_HOME/sb/config.json` (or the platform config
//! directory) unless `--config` names a file. Command-line flags override
//! anything set here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Schema version for config files.
pub const SCHEMA_VERSION: u32 = 1;

/// Writes in flight during import when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

const STORE_FILE: &str = "storage.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
	#[serde(default)]
	pub schema: u32,
	/// Store file used when `--store` is not given.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub store_path: Option<PathBuf>,
	/// Import write concurrency used when `--concurrency` is not given.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub concurrency: Option<usize>,
	/// Store byte quota used when `--quota` is not given. Unlimited if unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub quota_bytes: Option<usize>,
}

impl CliConfig {
	/// Creates a config with current [`SCHEMA_VERSION`].
	pub fn new() -> Self {
		Self {
			schema: SCHEMA_VERSION,
			..Default::default()
		}
	}

	/// Loads configuration.
	///
	/// An explicit path must exist and parse. The default location is
	/// optional: a missing file means defaults, an unreadable one is logged and
	/// ignored.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		if let Some(path) = explicit {
			let content = fs::read_to_string(path).map_err(|source| CliError::Read {
				path: path.to_path_buf(),
				source,
			})?;
			return parse(path, &content);
		}

		let Some(path) = default_config_path() else {
			return Ok(Self::new());
		};
		match fs::read_to_string(&path) {
			Ok(content) => match parse(&path, &content) {
				Ok(config) => Ok(config),
				Err(err) => {
					warn!(target = "sb", path = %path.display(), error = %err, "ignoring unreadable config");
					Ok(Self::new())
				}
			},
			Err(_) => {
				debug!(target = "sb", path = %path.display(), "no config file, using defaults");
				Ok(Self::new())
			}
		}
	}

	/// Store path: flag, then config, then the platform data directory.
	pub fn store_path(&self, flag: Option<&Path>) -> PathBuf {
		flag.map(Path::to_path_buf)
			.or_else(|| self.store_path.clone())
			.unwrap_or_else(default_store_path)
	}

	/// Write concurrency: flag, then config, then [`DEFAULT_CONCURRENCY`].
	pub fn concurrency(&self, flag: Option<usize>) -> usize {
		flag.or(self.concurrency).unwrap_or(DEFAULT_CONCURRENCY).max(1)
	}

	/// Store quota: flag, then config, else unlimited.
	pub fn quota(&self, flag: Option<usize>) -> Option<usize> {
		flag.or(self.quota_bytes)
	}
}

fn parse(path: &Path, content: &str) -> Result<CliConfig> {
	let config: CliConfig = serde_json::from_str(content).map_err(|e| CliError::Config {
		path: path.to_path_buf(),
		reason: e.to_string(),
	})?;
	if config.schema > SCHEMA_VERSION {
		return Err(CliError::Config {
			path: path.to_path_buf(),
			reason: format!("schema {} is newer than supported {SCHEMA_VERSION}", config.schema),
		});
	}
	Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
	std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(dirs::config_dir)
		.map(|dir| dir.join("sb").join("config.json"))
}

fn default_store_path() -> PathBuf {
	dirs::data_dir()
		.map(|dir| dir.join("sb").join(STORE_FILE))
		.unwrap_or_else(|| PathBuf::from(STORE_FILE))
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	#[test]
	fn explicit_config_is_loaded() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		fs::write(&path, r#"{ "schema": 1, "storePath": "/var/lib/sb/s.json", "concurrency": 2 }"#).unwrap();

		let config = CliConfig::load(Some(&path)).unwrap();
		assert_eq!(config.store_path, Some(PathBuf::from("/var/lib/sb/s.json")));
		assert_eq!(config.concurrency(None), 2);
		assert_eq!(config.quota(None), None);
	}

	#[test]
	fn quota_flag_overrides_config() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		fs::write(&path, r#"{ "quotaBytes": 5242880 }"#).unwrap();

		let config = CliConfig::load(Some(&path)).unwrap();
		assert_eq!(config.quota(None), Some(5_242_880));
		assert_eq!(config.quota(Some(64)), Some(64));
	}

	#[test]
	fn explicit_missing_config_is_an_error() {
		let tmp = TempDir::new().unwrap();
		let err = CliConfig::load(Some(&tmp.path().join("missing.json"))).unwrap_err();
		assert!(matches!(err, CliError::Read { .. }));
	}

	#[test]
	fn invalid_config_is_an_error() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		fs::write(&path, r#"{ "concurrency": "lots" }"#).unwrap();
		assert!(matches!(CliConfig::load(Some(&path)), Err(CliError::Config { .. })));
	}

	#[test]
	fn newer_schema_is_rejected() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		fs::write(&path, r#"{ "schema": 99 }"#).unwrap();
		assert!(matches!(CliConfig::load(Some(&path)), Err(CliError::Config { .. })));
	}

	#[test]
	fn flags_override_config() {
		let config = CliConfig {
			store_path: Some(PathBuf::from("from-config.json")),
			concurrency: Some(2),
			..CliConfig::new()
		};

		assert_eq!(config.store_path(Some(Path::new("flag.json"))), PathBuf::from("flag.json"));
		assert_eq!(config.store_path(None), PathBuf::from("from-config.json"));
		assert_eq!(config.concurrency(Some(9)), 9);
		assert_eq!(config.concurrency(None), 2);
	}

	#[test]
	fn defaults_apply_without_config() {
		let config = CliConfig::new();
		assert_eq!(config.concurrency(None), DEFAULT_CONCURRENCY);
		assert_eq!(config.concurrency(Some(0)), 1);
		assert!(config.store_path(None).ends_with(STORE_FILE));
	}
}
