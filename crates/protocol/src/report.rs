//! Outcome of replaying a storage map into a key/value store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-key outcome of a replay.
///
/// Every attempted key is in exactly one of [`applied_keys`](Self::applied_keys)
/// and [`failed_keys`](Self::failed_keys). The recording methods keep that
/// partition intact when a key is recorded twice: the later outcome wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
	/// Keys written successfully.
	pub applied_keys: BTreeSet<String>,
	/// Keys that failed to persist, with a human-readable reason.
	pub failed_keys: BTreeMap<String, String>,
	/// Number of distinct keys attempted.
	pub total_attempted: usize,
}

impl ReplayReport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record_applied(&mut self, key: impl Into<String>) {
		let key = key.into();
		self.failed_keys.remove(&key);
		self.applied_keys.insert(key);
		self.recount();
	}

	pub fn record_failed(&mut self, key: impl Into<String>, reason: impl Into<String>) {
		let key = key.into();
		self.applied_keys.remove(&key);
		self.failed_keys.insert(key, reason.into());
		self.recount();
	}

	/// True when no key failed.
	pub fn is_complete(&self) -> bool {
		self.failed_keys.is_empty()
	}

	pub fn applied_count(&self) -> usize {
		self.applied_keys.len()
	}

	pub fn failed_count(&self) -> usize {
		self.failed_keys.len()
	}

	fn recount(&mut self) {
		self.total_attempted = self.applied_keys.len() + self.failed_keys.len();
	}
}
