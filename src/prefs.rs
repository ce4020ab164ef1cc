//! Preference persistence for the hosting surface.
//!
//! A flat key/value store in a JSON file under the state directory. Keys are
//! qualified with a per-installation instance id so several installations
//! can share one file, the way multiple widget instances share one
//! preference domain.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::PrefsError;

/// Keys the session host reads and writes.
pub mod keys {
	pub const SOURCE_PATH: &str = "sourcePath";
	pub const TARGET_PATH: &str = "targetPath";
	pub const LAST_SYNC: &str = "lastSync";
	pub const DRY_RUN: &str = "dryRun";
	pub const MIRROR: &str = "mirror";
	pub const EXCLUDE_SYSTEM: &str = "excludeSystemPaths";
}

/// Key/value preference capability.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
	/// Read a value; `None` when the key was never set or was cleared.
	async fn get(&self, key: &str) -> Option<String>;

	/// Write a value, or clear the key with `None`. Persists immediately.
	async fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), PrefsError>;
}

/// JSON-file-backed store.
pub struct JsonPrefStore {
	path: PathBuf,
	instance: String,
	values: BTreeMap<String, String>,
}

impl JsonPrefStore {
	/// Open (or create) the store under `state_dir`.
	///
	/// The instance id is generated on first use and persisted inside the
	/// same file, so it is stable for the lifetime of the installation.
	pub async fn open(state_dir: &Path) -> Result<Self, PrefsError> {
		let path = state_dir.join("prefs.json");

		let mut values: BTreeMap<String, String> = if path.exists() {
			let raw = tokio::fs::read_to_string(&path)
				.await
				.map_err(|e| PrefsError::LoadFailed { source: Box::new(e) })?;
			serde_json::from_str(&raw).map_err(|e| PrefsError::Corrupted {
				message: format!("Failed to parse preference JSON: {}", e),
			})?
		} else {
			BTreeMap::new()
		};

		let instance = match values.get("instance") {
			Some(id) => id.clone(),
			None => {
				let id = Uuid::new_v4().to_string();
				values.insert("instance".to_string(), id.clone());
				let mut store = JsonPrefStore { path, instance: id, values };
				store.save().await?;
				return Ok(store);
			}
		};

		Ok(JsonPrefStore { path, instance, values })
	}

	/// The persisted per-installation id.
	pub fn instance(&self) -> &str {
		&self.instance
	}

	fn qualified(&self, key: &str) -> String {
		format!("{}.{}", self.instance, key)
	}

	async fn save(&mut self) -> Result<(), PrefsError> {
		if let Some(parent) = self.path.parent() {
			if !parent.exists() {
				tokio::fs::create_dir_all(parent)
					.await
					.map_err(|e| PrefsError::SaveFailed { source: Box::new(e) })?;
			}
		}

		let json = serde_json::to_string_pretty(&self.values)
			.map_err(|e| PrefsError::SaveFailed { source: Box::new(e) })?;

		tokio::fs::write(&self.path, json)
			.await
			.map_err(|e| PrefsError::SaveFailed { source: Box::new(e) })
	}
}

#[async_trait]
impl PreferenceStore for JsonPrefStore {
	async fn get(&self, key: &str) -> Option<String> {
		self.values.get(&self.qualified(key)).cloned()
	}

	async fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), PrefsError> {
		let qualified = self.qualified(key);
		match value {
			Some(v) => {
				self.values.insert(qualified, v.to_string());
			}
			None => {
				self.values.remove(&qualified);
			}
		}
		self.save().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_roundtrip() {
		let dir = TempDir::new().unwrap();
		let mut store = JsonPrefStore::open(dir.path()).await.unwrap();

		assert!(store.get(keys::SOURCE_PATH).await.is_none());
		store.set(keys::SOURCE_PATH, Some("/Users/me/docs/")).await.unwrap();
		assert_eq!(store.get(keys::SOURCE_PATH).await.as_deref(), Some("/Users/me/docs/"));

		store.set(keys::SOURCE_PATH, None).await.unwrap();
		assert!(store.get(keys::SOURCE_PATH).await.is_none());
	}

	#[tokio::test]
	async fn test_instance_id_is_stable_across_opens() {
		let dir = TempDir::new().unwrap();

		let first = {
			let mut store = JsonPrefStore::open(dir.path()).await.unwrap();
			store.set(keys::LAST_SYNC, Some("1700000000")).await.unwrap();
			store.instance().to_string()
		};

		let store = JsonPrefStore::open(dir.path()).await.unwrap();
		assert_eq!(store.instance(), first);
		assert_eq!(store.get(keys::LAST_SYNC).await.as_deref(), Some("1700000000"));
	}

	#[tokio::test]
	async fn test_corrupted_file_is_an_error_not_a_panic() {
		let dir = TempDir::new().unwrap();
		tokio::fs::write(dir.path().join("prefs.json"), "{ not json").await.unwrap();

		let result = JsonPrefStore::open(dir.path()).await;
		assert!(matches!(result, Err(PrefsError::Corrupted { .. })));
	}
}

// vim: ts=4
