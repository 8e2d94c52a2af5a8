//! The canonical session bundle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cookie::CookieRecord;

/// Canonical form of a captured session: cookies plus local key/value storage.
///
/// Serializes in the wrapped shape (`cookies`, `localStorage`, `url`), so a
/// saved bundle is itself a valid import payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBundle {
	/// Cookies in discovery order. Duplicate names are kept.
	#[serde(default)]
	pub cookies: Vec<CookieRecord>,

	/// localStorage entries in enumeration order.
	#[serde(default)]
	pub local_storage: Map<String, Value>,

	/// Origin the bundle was captured from. Informational only.
	#[serde(default, rename = "url", alias = "sourceUrl", skip_serializing_if = "Option::is_none")]
	pub source_url: Option<String>,
}

impl SessionBundle {
	/// Creates an empty bundle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a bundle with cookies only.
	pub fn with_cookies(cookies: Vec<CookieRecord>) -> Self {
		Self {
			cookies,
			..Default::default()
		}
	}

	/// True when the bundle carries neither cookies nor storage entries.
	pub fn is_empty(&self) -> bool {
		self.cookies.is_empty() && self.local_storage.is_empty()
	}

	/// `scheme://host[:port]` of [`source_url`](Self::source_url), if it parses.
	pub fn source_origin(&self) -> Option<String> {
		let parsed = url::Url::parse(self.source_url.as_deref()?).ok()?;
		let origin = parsed.origin();
		origin.is_tuple().then(|| origin.ascii_serialization())
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn serializes_in_wrapped_shape() {
		let mut bundle = SessionBundle::with_cookies(vec![CookieRecord::new("sid", "abc")]);
		bundle.local_storage.insert("theme".into(), json!("dark"));
		bundle.source_url = Some("https://app.example.com/login".into());

		let value = serde_json::to_value(&bundle).unwrap();
		assert_eq!(
			value,
			json!({
				"cookies": [{ "name": "sid", "value": "abc" }],
				"localStorage": { "theme": "dark" },
				"url": "https://app.example.com/login"
			})
		);
	}

	#[test]
	fn source_origin_strips_path() {
		let bundle = SessionBundle {
			source_url: Some("https://app.example.com:8443/a/b?c=d".into()),
			..Default::default()
		};
		assert_eq!(bundle.source_origin().as_deref(), Some("https://app.example.com:8443"));

		let opaque = SessionBundle {
			source_url: Some("not a url".into()),
			..Default::default()
		};
		assert_eq!(opaque.source_origin(), None);
	}

	#[test]
	fn empty_bundle_reports_empty() {
		assert!(SessionBundle::new().is_empty());
		assert!(!SessionBundle::with_cookies(vec![CookieRecord::new("a", "b")]).is_empty());
	}
}
