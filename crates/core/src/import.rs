//! Normalize-then-replay pipeline.

use sb_protocol::{ReplayReport, SessionBundle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::normalize::{Normalized, normalize_detailed};
use crate::replay::{apply, apply_async};
use crate::store::{AsyncKeyValueStore, KeyValueStore};

/// What an import did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
	/// Layout the payload was recognized as.
	pub shape: String,
	/// Cookies found in the bundle. They are normalized but never replayed.
	pub cookies_skipped: usize,
	/// Cookie entries that could not be represented and were left out.
	#[serde(default)]
	pub cookies_dropped: usize,
	/// Origin the bundle claims to come from.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source_url: Option<String>,
	/// Per-key storage outcome.
	pub report: ReplayReport,
}

impl ImportOutcome {
	fn new(normalized: Normalized, report: ReplayReport) -> Self {
		Self {
			shape: normalized.shape.to_string(),
			cookies_skipped: normalized.bundle.cookies.len(),
			cookies_dropped: normalized.cookies_dropped,
			source_url: normalized.bundle.source_url,
			report,
		}
	}
}

/// Normalizes `raw` and replays its storage portion into `store`.
///
/// Fails only when normalization fails; storage errors are in the report.
pub fn import<S: KeyValueStore + ?Sized>(raw: &Value, store: &S) -> Result<ImportOutcome> {
	let normalized = normalize_detailed(raw)?;
	warn_unreplayed_cookies(&normalized.bundle);
	let report = apply(&normalized.bundle.local_storage, store);
	Ok(ImportOutcome::new(normalized, report))
}

/// Async variant of [`import`].
pub async fn import_async<S: AsyncKeyValueStore + ?Sized>(raw: &Value, store: &S, concurrency: usize) -> Result<ImportOutcome> {
	let normalized = normalize_detailed(raw)?;
	warn_unreplayed_cookies(&normalized.bundle);
	let report = apply_async(&normalized.bundle.local_storage, store, concurrency).await;
	Ok(ImportOutcome::new(normalized, report))
}

fn warn_unreplayed_cookies(bundle: &SessionBundle) {
	// No cookie store exists to replay into; only storage is applied.
	if !bundle.cookies.is_empty() {
		warn!(target = "sb", cookies = bundle.cookies.len(), "bundle cookies are not replayed");
	}
}
