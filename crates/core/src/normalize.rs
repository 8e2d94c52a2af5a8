//! Bundle normalization.
//!
//! Session captures arrive in one of three layouts:
//!
//! * **List** - a bare array of cookie objects (devtools / extension exports)
//! * **Wrapped** - `{ "cookies": [...], "localStorage": ..., "url": ... }`
//! * **Records** - `{ "<label>": { "name": ..., "value": ... }, ... }`
//!
//! [`BundleShape::classify`] decides which layout a payload is by checking
//! structural predicates in that fixed order; the first match wins even when a
//! payload would satisfy a later rule too. [`normalize`] then lowers the payload
//! into a [`SessionBundle`].

use sb_protocol::{CookieRecord, SessionBundle};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Field holding cookies in the wrapped layout.
pub const COOKIES_FIELD: &str = "cookies";
/// Field holding the storage map in the wrapped layout.
pub const LOCAL_STORAGE_FIELD: &str = "localStorage";
/// Field holding the capture origin in the wrapped layout.
pub const URL_FIELD: &str = "url";

/// Recognized payload layouts, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleShape {
	List,
	Wrapped,
	Records,
}

impl BundleShape {
	/// Determines the layout of `raw`, or [`None`] if nothing matches.
	pub fn classify(raw: &Value) -> Option<Self> {
		match raw {
			Value::Array(_) => Some(BundleShape::List),
			Value::Object(object) if object.contains_key(COOKIES_FIELD) => Some(BundleShape::Wrapped),
			Value::Object(object) if object.values().all(is_cookie_candidate) => Some(BundleShape::Records),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			BundleShape::List => "list",
			BundleShape::Wrapped => "wrapped",
			BundleShape::Records => "records",
		}
	}
}

impl std::fmt::Display for BundleShape {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A normalized bundle together with how it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
	pub shape: BundleShape,
	pub bundle: SessionBundle,
	/// Cookie candidates left out because the model cannot hold them.
	pub cookies_dropped: usize,
}

/// Normalizes an untyped payload into a [`SessionBundle`].
///
/// # Errors
///
/// - [`Error::Shape`] when the payload matches no layout (scalars and `null`
///   never do).
/// - [`Error::MalformedPayload`] when a wrapped payload carries a
///   `localStorage` that is not a JSON object (or JSON text of one), or a
///   `cookies` field that is not an array.
///
/// Individual cookie entries never fail a bundle: ones without a string
/// `name` and `value` are dropped and counted in [`Normalized`].
pub fn normalize(raw: &Value) -> Result<SessionBundle> {
	normalize_shaped(raw).map(|(_, bundle)| bundle)
}

/// Like [`normalize`], also returning the layout that matched.
pub fn normalize_shaped(raw: &Value) -> Result<(BundleShape, SessionBundle)> {
	normalize_detailed(raw).map(|n| (n.shape, n.bundle))
}

/// Like [`normalize`], also reporting the layout and dropped cookies.
pub fn normalize_detailed(raw: &Value) -> Result<Normalized> {
	let shape = BundleShape::classify(raw).ok_or_else(Error::unrecognized)?;
	debug!(target = "sb", %shape, "recognized session bundle");

	let (bundle, cookies_dropped) = match (shape, raw) {
		(BundleShape::List, Value::Array(items)) => from_list(items),
		(BundleShape::Wrapped, Value::Object(object)) => from_wrapped(object)?,
		(BundleShape::Records, Value::Object(object)) => (from_records(object), 0),
		_ => return Err(Error::unrecognized()),
	};

	debug!(
		target = "sb",
		%shape,
		cookies = bundle.cookies.len(),
		cookies_dropped,
		storage_keys = bundle.local_storage.len(),
		"normalized session bundle"
	);
	Ok(Normalized {
		shape,
		bundle,
		cookies_dropped,
	})
}

/// Parses JSON text and normalizes it.
///
/// Text that is not JSON at all is reported as a malformed `<root>`.
pub fn normalize_str(text: &str) -> Result<Normalized> {
	normalize_detailed(&parse_payload(text)?)
}

/// Parses payload text into an untyped value.
pub fn parse_payload(text: &str) -> Result<Value> {
	serde_json::from_str(text).map_err(|e| Error::malformed("<root>", e))
}

/// Coerces a raw `localStorage` field into a map.
///
/// Strings are parsed as JSON text; objects pass through; absent or `null`
/// yields an empty map. Anything else fails the whole bundle, since a storage
/// map cannot be partially recovered.
pub fn coerce_local_storage(field: Option<&Value>) -> Result<Map<String, Value>> {
	match field {
		None | Some(Value::Null) => Ok(Map::new()),
		Some(Value::Object(map)) => Ok(map.clone()),
		Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
			Ok(Value::Object(map)) => Ok(map),
			Ok(other) => Err(Error::malformed(LOCAL_STORAGE_FIELD, format!("expected an object, found {}", kind(&other)))),
			Err(e) => Err(Error::malformed(LOCAL_STORAGE_FIELD, e)),
		},
		Some(other) => Err(Error::malformed(LOCAL_STORAGE_FIELD, format!("expected an object or JSON text, found {}", kind(other)))),
	}
}

fn from_list(items: &[Value]) -> (SessionBundle, usize) {
	let cookies: Vec<_> = items
		.iter()
		.enumerate()
		.filter_map(|(index, item)| match CookieRecord::from_value(item) {
			Ok(cookie) if cookie.is_complete() => Some(cookie),
			Ok(_) => {
				trace!(target = "sb", index, "dropping cookie with empty name or value");
				None
			}
			Err(reason) => {
				trace!(target = "sb", index, %reason, "dropping cookie candidate");
				None
			}
		})
		.collect();

	let dropped = items.len() - cookies.len();
	(SessionBundle::with_cookies(cookies), dropped)
}

/// Wrapped cookies are trusted and not re-filtered, but entries that are not
/// objects with a string `name` and `value` cannot be represented and are
/// dropped with a warning.
fn from_wrapped(object: &Map<String, Value>) -> Result<(SessionBundle, usize)> {
	let mut dropped = 0;
	let cookies = match object.get(COOKIES_FIELD) {
		Some(Value::Array(items)) => items
			.iter()
			.enumerate()
			.filter_map(|(index, item)| match CookieRecord::from_value(item) {
				Ok(cookie) => Some(cookie),
				Err(reason) => {
					warn!(target = "sb", index, %reason, "dropping unrepresentable wrapped cookie");
					dropped += 1;
					None
				}
			})
			.collect(),
		Some(Value::Null) | None => Vec::new(),
		Some(other) => return Err(Error::malformed(COOKIES_FIELD, format!("expected an array, found {}", kind(other)))),
	};

	let local_storage = coerce_local_storage(object.get(LOCAL_STORAGE_FIELD))?;

	let source_url = match object.get(URL_FIELD) {
		Some(Value::String(url)) => Some(url.clone()),
		Some(other) if !other.is_null() => {
			debug!(target = "sb", kind = kind(other), "ignoring non-string url field");
			None
		}
		_ => None,
	};

	Ok((
		SessionBundle {
			cookies,
			local_storage,
			source_url,
		},
		dropped,
	))
}

fn from_records(object: &Map<String, Value>) -> SessionBundle {
	// classify() already checked every value, so nothing is dropped here.
	let cookies = object.values().filter_map(|item| CookieRecord::from_value(item).ok()).collect();
	SessionBundle::with_cookies(cookies)
}

fn is_cookie_candidate(value: &Value) -> bool {
	CookieRecord::from_value(value).is_ok_and(|cookie| cookie.is_complete())
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn names(bundle: &SessionBundle) -> Vec<&str> {
		bundle.cookies.iter().map(|c| c.name.as_str()).collect()
	}

	#[test]
	fn list_keeps_complete_entries_in_order() {
		let raw = json!([
			{ "name": "a", "value": "1" },
			{ "name": "", "value": "2" },
			{ "value": "3" },
			"junk",
			{ "name": "b", "value": "" },
			{ "name": "c", "value": "4", "domain": ".example.com" },
			{ "name": "a", "value": "5" }
		]);

		let bundle = normalize(&raw).unwrap();
		assert_eq!(names(&bundle), ["a", "c", "a"]);
		assert_eq!(bundle.cookies[2].value, "5");
		assert!(bundle.local_storage.is_empty());
		assert_eq!(bundle.source_url, None);
	}

	#[test]
	fn empty_list_is_an_empty_bundle() {
		let bundle = normalize(&json!([])).unwrap();
		assert!(bundle.is_empty());
	}

	#[test]
	fn wrapped_parses_string_local_storage() {
		let raw = json!({
			"cookies": [{ "name": "sid", "value": "abc" }],
			"localStorage": "{\"a\":1}",
			"url": "https://example.com/app"
		});

		let bundle = normalize(&raw).unwrap();
		assert_eq!(bundle.local_storage, *json!({ "a": 1 }).as_object().unwrap());
		assert_eq!(bundle.source_url.as_deref(), Some("https://example.com/app"));
		assert_eq!(names(&bundle), ["sid"]);
	}

	#[test]
	fn wrapped_invalid_local_storage_text_is_malformed() {
		let raw = json!({ "cookies": [], "localStorage": "{invalid json" });
		let err = normalize(&raw).unwrap_err();
		assert!(err.is_malformed(), "{err}");
	}

	#[test]
	fn wrapped_local_storage_must_be_an_object() {
		for bad in [json!("[1,2]"), json!(42), json!([1])] {
			let raw = json!({ "cookies": [], "localStorage": bad });
			assert!(normalize(&raw).unwrap_err().is_malformed());
		}
	}

	#[test]
	fn wrapped_object_local_storage_passes_through() {
		let raw = json!({
			"cookies": [],
			"localStorage": { "token": "t", "prefs": { "dark": true } }
		});
		let bundle = normalize(&raw).unwrap();
		assert_eq!(bundle.local_storage["prefs"], json!({ "dark": true }));
		assert!(bundle.cookies.is_empty());
	}

	#[test]
	fn wrapped_does_not_refilter_cookies() {
		let raw = json!({ "cookies": [{ "name": "", "value": "" }, { "name": "x", "value": "y" }] });
		let bundle = normalize(&raw).unwrap();
		assert_eq!(names(&bundle), ["", "x"]);
	}

	#[test]
	fn wrapped_drops_unrepresentable_cookies() {
		let raw = json!({
			"cookies": [{ "name": "ok", "value": "1" }, { "value": "2" }, "junk", { "name": "n", "value": 3 }],
			"localStorage": { "token": "t" }
		});
		let normalized = normalize_detailed(&raw).unwrap();
		assert_eq!(names(&normalized.bundle), ["ok"]);
		assert_eq!(normalized.cookies_dropped, 3);
		assert_eq!(normalized.bundle.local_storage["token"], "t");
	}

	#[test]
	fn wrapped_cookies_must_be_an_array() {
		let raw = json!({ "cookies": "sid=abc" });
		match normalize(&raw).unwrap_err() {
			Error::MalformedPayload { field, .. } => assert_eq!(field, "cookies"),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn wrapped_ignores_non_string_url() {
		let raw = json!({ "cookies": [], "url": 7 });
		assert_eq!(normalize(&raw).unwrap().source_url, None);
	}

	#[test]
	fn records_collect_in_enumeration_order() {
		let raw = json!({
			"user1": { "name": "sid", "value": "abc" },
			"user2": { "name": "x", "value": "y" }
		});
		let bundle = normalize(&raw).unwrap();
		assert_eq!(names(&bundle), ["sid", "x"]);
		assert!(bundle.local_storage.is_empty());
	}

	#[test]
	fn records_require_every_value_to_be_a_cookie() {
		let raw = json!({
			"user1": { "name": "sid", "value": "abc" },
			"meta": { "version": 2 }
		});
		assert!(normalize(&raw).unwrap_err().is_shape());
	}

	#[test]
	fn wrapped_wins_over_records() {
		let raw = json!({ "cookies": { "name": "n", "value": "v" } });
		assert_eq!(BundleShape::classify(&raw), Some(BundleShape::Wrapped));
		assert!(normalize(&raw).unwrap_err().is_malformed());
	}

	#[test]
	fn empty_object_is_an_empty_bundle() {
		assert_eq!(BundleShape::classify(&json!({})), Some(BundleShape::Records));
		assert!(normalize(&json!({})).unwrap().is_empty());
	}

	#[test]
	fn scalars_and_null_are_shape_errors() {
		for raw in [json!(42), Value::Null, json!("cookies"), json!(true)] {
			let err = normalize(&raw).unwrap_err();
			assert!(err.is_shape());
			assert_eq!(err.to_string(), "unrecognized session data format");
		}
	}

	#[test]
	fn normalize_str_reports_shape() {
		let normalized = normalize_str(r#"[{"name":"a","value":"b"},{"name":"c"}]"#).unwrap();
		assert_eq!(normalized.shape, BundleShape::List);
		assert_eq!(normalized.bundle.cookies.len(), 1);
		assert_eq!(normalized.cookies_dropped, 1);

		assert!(normalize_str("not json").unwrap_err().is_malformed());
	}

	#[test]
	fn saved_bundle_renormalizes_to_itself() {
		let raw = json!({
			"cookies": [{ "name": "sid", "value": "abc", "hostOnly": true }],
			"localStorage": { "k": [1, 2, 3] },
			"url": "https://example.com"
		});
		let bundle = normalize(&raw).unwrap();
		let saved = serde_json::to_value(&bundle).unwrap();
		assert_eq!(normalize(&saved).unwrap(), bundle);
	}
}
