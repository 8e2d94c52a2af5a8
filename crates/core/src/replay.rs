//! Storage replay.
//!
//! Writes a normalized localStorage map into a store one key at a time. A key
//! that fails to persist is recorded in the [`ReplayReport`] and the batch
//! carries on; replay as a whole never fails.

use futures::stream::{self, StreamExt};
use sb_protocol::ReplayReport;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::codec::{decode_value, encode_value};
use crate::store::{AsyncKeyValueStore, KeyValueStore};

/// Applies every entry of `map` to `store`, in map order.
///
/// Re-applying the same map converges to the same store contents.
pub fn apply<S: KeyValueStore + ?Sized>(map: &Map<String, Value>, store: &S) -> ReplayReport {
	let mut report = ReplayReport::new();

	for (key, value) in map {
		match store.set(key, encode_value(value)) {
			Ok(()) => {
				debug!(target = "sb", key = %key, "applied storage key");
				report.record_applied(key.as_str());
			}
			Err(e) => {
				warn!(target = "sb", key = %key, error = %e, "failed to apply storage key");
				report.record_failed(key.as_str(), e.to_string());
			}
		}
	}

	log_summary(&report);
	report
}

/// Async variant of [`apply`] with bounded concurrency.
///
/// Up to `concurrency` writes are in flight at once; outcomes are recorded in
/// map order as they settle. A `concurrency` of 0 behaves like 1.
pub async fn apply_async<S: AsyncKeyValueStore + ?Sized>(map: &Map<String, Value>, store: &S, concurrency: usize) -> ReplayReport {
	let writes = map.iter().map(|(key, value)| {
		let encoded = encode_value(value);
		async move { (key, store.set_async(key, encoded).await) }
	});

	let mut outcomes = stream::iter(writes).buffered(concurrency.max(1));
	let mut report = ReplayReport::new();

	while let Some((key, outcome)) = outcomes.next().await {
		match outcome {
			Ok(()) => {
				debug!(target = "sb", key = %key, "applied storage key");
				report.record_applied(key.as_str());
			}
			Err(e) => {
				warn!(target = "sb", key = %key, error = %e, "failed to apply storage key");
				report.record_failed(key.as_str(), e.to_string());
			}
		}
	}

	log_summary(&report);
	report
}

/// Reads `key` back and decodes it.
pub fn read_value<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<Value> {
	store.get(key).map(|text| decode_value(&text))
}

fn log_summary(report: &ReplayReport) {
	info!(
		target = "sb",
		attempted = report.total_attempted,
		applied = report.applied_count(),
		failed = report.failed_count(),
		"storage replay finished"
	);
}
