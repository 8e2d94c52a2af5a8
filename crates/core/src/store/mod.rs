//! Key/value persistence capabilities.
//!
//! The replay engine never reaches for ambient storage; callers hand it a
//! store. Writes may fail one key at a time, which is the only failure the
//! engine tolerates.
//!
//! * [`KeyValueStore`] - synchronous capability
//! * [`AsyncKeyValueStore`] - awaitable capability for async persistence
//! * [`MemoryStore`] - in-process map with an optional byte quota
//! * [`FileStore`] - JSON document on disk, rewritten on every write, with an
//!   optional byte quota

mod file;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Synchronous key/value store.
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared while a replay is running.
pub trait KeyValueStore: Send + Sync {
	/// Reads the value stored under `key`.
	fn get(&self, key: &str) -> Option<String>;

	/// Writes `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

	fn contains(&self, key: &str) -> bool {
		self.get(key).is_some()
	}
}

/// Awaitable key/value store.
#[async_trait]
pub trait AsyncKeyValueStore: Send + Sync {
	/// Reads the value stored under `key`.
	async fn get_async(&self, key: &str) -> Option<String>;

	/// Writes `value` under `key`, replacing any previous value.
	async fn set_async(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Rejects a write that would push the summed byte length of keys and values
/// past `limit`. A replaced value only counts once.
pub(crate) fn check_quota(entries: &BTreeMap<String, String>, key: &str, value: &str, limit: Option<usize>) -> Result<(), StoreError> {
	let Some(limit) = limit else {
		return Ok(());
	};
	let others: usize = entries.iter().filter(|(k, _)| k.as_str() != key).map(|(k, v)| k.len() + v.len()).sum();
	if others + key.len() + value.len() > limit {
		return Err(StoreError::QuotaExceeded { key: key.to_string(), limit });
	}
	Ok(())
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
	fn get(&self, key: &str) -> Option<String> {
		(**self).get(key)
	}

	fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
		(**self).set(key, value)
	}
}
