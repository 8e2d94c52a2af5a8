use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{AsyncKeyValueStore, KeyValueStore, check_quota};
use crate::error::StoreError;

/// In-memory store.
///
/// With a quota set, a write that would push the summed byte length of all
/// keys and values past the limit is rejected, the way browser storage rejects
/// writes once its origin quota is used up.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<BTreeMap<String, String>>,
	quota: Option<usize>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store that rejects writes beyond `bytes`.
	pub fn with_quota(bytes: usize) -> Self {
		Self {
			entries: Mutex::default(),
			quota: Some(bytes),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	/// Bytes currently used by keys and values.
	pub fn used_bytes(&self) -> usize {
		self.entries.lock().iter().map(|(k, v)| k.len() + v.len()).sum()
	}

	/// Copy of the current contents.
	pub fn snapshot(&self) -> BTreeMap<String, String> {
		self.entries.lock().clone()
	}

	fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
		let mut entries = self.entries.lock();
		check_quota(&entries, key, &value, self.quota)?;
		entries.insert(key.to_string(), value);
		Ok(())
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.lock().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
		self.write(key, value)
	}
}

#[async_trait]
impl AsyncKeyValueStore for MemoryStore {
	async fn get_async(&self, key: &str) -> Option<String> {
		KeyValueStore::get(self, key)
	}

	async fn set_async(&self, key: &str, value: String) -> Result<(), StoreError> {
		self.write(key, value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn last_write_wins() {
		let store = MemoryStore::new();
		store.set("k", "one".into()).unwrap();
		store.set("k", "two".into()).unwrap();
		assert_eq!(store.get("k").as_deref(), Some("two"));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn quota_rejects_oversized_write() {
		let store = MemoryStore::with_quota(10);
		store.set("a", "12345".into()).unwrap();
		let err = store.set("b", "123456".into()).unwrap_err();
		assert!(matches!(err, StoreError::QuotaExceeded { ref key, limit: 10 } if key == "b"));
		assert!(!store.contains("b"));
		assert_eq!(store.used_bytes(), 6);
	}

	#[test]
	fn quota_counts_replaced_value_once() {
		let store = MemoryStore::with_quota(6);
		store.set("a", "12345".into()).unwrap();
		store.set("a", "54321".into()).unwrap();
		assert_eq!(store.get("a").as_deref(), Some("54321"));
	}

	#[tokio::test]
	async fn async_surface_shares_contents() {
		let store = MemoryStore::new();
		store.set_async("k", "v".into()).await.unwrap();
		assert_eq!(store.get_async("k").await.as_deref(), Some("v"));
		assert_eq!(KeyValueStore::get(&store, "k").as_deref(), Some("v"));
	}
}
