use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{AsyncKeyValueStore, KeyValueStore, check_quota};
use crate::error::StoreError;

/// Store persisted as a single JSON object on disk.
///
/// The document is rewritten after every write, so each key can fail on its
/// own (full disk, read-only directory) without losing earlier keys. The
/// in-memory view only changes once the write reached disk.
///
/// An optional quota rejects writes that would grow the stored keys and values
/// past a byte limit, before anything touches disk.
///
/// Async writes are serialized among themselves; mixing sync and async writes
/// on one store from different tasks is not ordered.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	entries: Mutex<BTreeMap<String, String>>,
	quota: Option<usize>,
	write_lock: tokio::sync::Mutex<()>,
}

impl FileStore {
	/// Opens the store at `path`. A missing file is an empty store.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();
		let entries = match fs::read_to_string(&path) {
			Ok(content) if content.trim().is_empty() => BTreeMap::new(),
			Ok(content) => serde_json::from_str(&content)?,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
			Err(source) => return Err(StoreError::Io { path, source }),
		};
		debug!(target = "sb", path = %path.display(), keys = entries.len(), "opened file store");

		Ok(Self {
			path,
			entries: Mutex::new(entries),
			quota: None,
			write_lock: tokio::sync::Mutex::new(()),
		})
	}

	/// Limits stored keys and values to `bytes` in total.
	pub fn with_quota(mut self, bytes: usize) -> Self {
		self.quota = Some(bytes);
		self
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	/// Copy of the current contents.
	pub fn snapshot(&self) -> BTreeMap<String, String> {
		self.entries.lock().clone()
	}

	fn staged(&self, key: &str, value: String) -> Result<(BTreeMap<String, String>, String), StoreError> {
		let mut next = self.entries.lock().clone();
		check_quota(&next, key, &value, self.quota)?;
		next.insert(key.to_string(), value);
		let body = render(&next);
		Ok((next, body))
	}

	fn io_error(&self, source: std::io::Error) -> StoreError {
		StoreError::Io {
			path: self.path.clone(),
			source,
		}
	}
}

impl KeyValueStore for FileStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.lock().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
		let mut entries = self.entries.lock();
		check_quota(&entries, key, &value, self.quota)?;
		let mut next = entries.clone();
		next.insert(key.to_string(), value);

		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
		}
		fs::write(&self.path, render(&next)).map_err(|e| self.io_error(e))?;

		*entries = next;
		Ok(())
	}
}

#[async_trait]
impl AsyncKeyValueStore for FileStore {
	async fn get_async(&self, key: &str) -> Option<String> {
		KeyValueStore::get(self, key)
	}

	async fn set_async(&self, key: &str, value: String) -> Result<(), StoreError> {
		let _guard = self.write_lock.lock().await;
		let (next, body) = self.staged(key, value)?;

		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
		}
		tokio::fs::write(&self.path, body).await.map_err(|e| self.io_error(e))?;

		*self.entries.lock() = next;
		Ok(())
	}
}

fn render(entries: &BTreeMap<String, String>) -> String {
	// A map of strings always serializes.
	serde_json::to_string_pretty(entries).unwrap_or_default()
}
