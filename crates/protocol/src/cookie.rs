//! Captured cookie records.
//!
//! A [`CookieRecord`] is the canonical form of one cookie found in a session
//! bundle. Captures come from many tools (browser extensions, devtools exports,
//! Playwright storage state), so the record keeps every attribute it does not
//! model in [`CookieRecord::extra`] rather than discarding it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// SameSite cookie attribute.
///
/// Controls when cookies are sent with cross-site requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
	/// Cookie is sent with same-site and cross-site requests
	#[serde(rename = "None")]
	None,
	/// Cookie is sent with same-site requests and cross-site top-level navigations
	#[serde(rename = "Lax")]
	Lax,
	/// Cookie is only sent with same-site requests
	#[serde(rename = "Strict")]
	Strict,
}

impl SameSite {
	/// Interprets the spellings used by browsers and capture tools.
	///
	/// Chrome's `chrome.cookies` API reports `"no_restriction"` for `None` and
	/// `"unspecified"` when the attribute was never set.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.to_ascii_lowercase().as_str() {
			"strict" => Some(SameSite::Strict),
			"lax" => Some(SameSite::Lax),
			"none" | "no_restriction" => Some(SameSite::None),
			_ => None,
		}
	}
}

/// Why a candidate entry could not become a [`CookieRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieRejection {
	/// The candidate was not a keyed structure.
	NotAnObject,
	/// `name` was absent or not a string.
	MissingName,
	/// `value` was absent or not a string.
	MissingValue,
}

impl fmt::Display for CookieRejection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CookieRejection::NotAnObject => write!(f, "entry is not an object"),
			CookieRejection::MissingName => write!(f, "entry has no string `name`"),
			CookieRejection::MissingValue => write!(f, "entry has no string `value`"),
		}
	}
}

/// A captured browser cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
	/// Cookie name
	pub name: String,

	/// Cookie value
	pub value: String,

	/// Domain for the cookie (may carry a leading dot)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,

	/// Path for the cookie
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,

	/// URL the cookie was captured for
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,

	/// Expiry as captured, usually an HTTP date or a stringified epoch
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires: Option<String>,

	/// Expiry as Unix timestamp in seconds
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiration_date: Option<f64>,

	/// Whether the cookie requires HTTPS
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secure: Option<bool>,

	/// Whether the cookie is HTTP-only
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http_only: Option<bool>,

	/// SameSite attribute exactly as captured
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub same_site: Option<String>,

	/// Attributes the record does not model, kept verbatim.
	#[serde(flatten, skip_serializing_if = "Map::is_empty")]
	pub extra: Map<String, Value>,
}

impl CookieRecord {
	/// Creates a cookie with only the required fields.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			domain: None,
			path: None,
			url: None,
			expires: None,
			expiration_date: None,
			secure: None,
			http_only: None,
			same_site: None,
			extra: Map::new(),
		}
	}

	/// Builds a record from an untyped JSON value.
	///
	/// `name` and `value` must be strings; they are never coerced from other
	/// types. Optional attributes of the expected type are lifted into their
	/// fields, anything else (unknown keys, or known keys with an unexpected
	/// type) lands in [`extra`](Self::extra) untouched.
	pub fn from_value(raw: &Value) -> Result<Self, CookieRejection> {
		let object = raw.as_object().ok_or(CookieRejection::NotAnObject)?;
		let name = object.get("name").and_then(Value::as_str).ok_or(CookieRejection::MissingName)?;
		let value = object.get("value").and_then(Value::as_str).ok_or(CookieRejection::MissingValue)?;

		let mut record = CookieRecord::new(name, value);
		for (key, field) in object {
			let lifted = match key.as_str() {
				"name" | "value" => true,
				"domain" => lift_str(field, &mut record.domain),
				"path" => lift_str(field, &mut record.path),
				"url" => lift_str(field, &mut record.url),
				"expires" => lift_str(field, &mut record.expires),
				"sameSite" => lift_str(field, &mut record.same_site),
				"expirationDate" => match field.as_f64() {
					Some(epoch) => {
						record.expiration_date = Some(epoch);
						true
					}
					None => false,
				},
				"secure" => lift_bool(field, &mut record.secure),
				"httpOnly" => lift_bool(field, &mut record.http_only),
				_ => false,
			};
			if !lifted {
				record.extra.insert(key.clone(), field.clone());
			}
		}

		Ok(record)
	}

	/// Returns true when both `name` and `value` are non-empty.
	pub fn is_complete(&self) -> bool {
		!self.name.is_empty() && !self.value.is_empty()
	}

	/// Interpreted SameSite policy, [`None`] when absent or unrecognised.
	pub fn same_site_policy(&self) -> Option<SameSite> {
		self.same_site.as_deref().and_then(SameSite::parse)
	}

	/// Expiry as Unix seconds.
	///
	/// Prefers `expirationDate`; falls back to `expires` when it holds a number.
	pub fn expiry_epoch(&self) -> Option<f64> {
		self.expiration_date
			.or_else(|| self.expires.as_deref().and_then(|raw| raw.trim().parse::<f64>().ok()))
	}

	/// Session cookies have no positive expiry.
	pub fn is_session(&self) -> bool {
		!self.expiry_epoch().is_some_and(|ts| ts > 0.0)
	}

	/// Sets the domain for the cookie.
	pub fn domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = Some(domain.into());
		self
	}

	/// Sets the path for the cookie.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Sets the expiration timestamp.
	pub fn expiration_date(mut self, epoch: f64) -> Self {
		self.expiration_date = Some(epoch);
		self
	}

	/// Sets whether the cookie requires HTTPS.
	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = Some(secure);
		self
	}

	/// Sets whether the cookie is HTTP-only.
	pub fn http_only(mut self, http_only: bool) -> Self {
		self.http_only = Some(http_only);
		self
	}

	/// Sets the SameSite attribute.
	pub fn same_site(mut self, same_site: impl Into<String>) -> Self {
		self.same_site = Some(same_site.into());
		self
	}
}

fn lift_str(field: &Value, slot: &mut Option<String>) -> bool {
	match field.as_str() {
		Some(s) => {
			*slot = Some(s.to_string());
			true
		}
		None => false,
	}
}

fn lift_bool(field: &Value, slot: &mut Option<bool>) -> bool {
	match field.as_bool() {
		Some(b) => {
			*slot = Some(b);
			true
		}
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn chrome_cookie_lifts_known_fields() {
		let raw = json!({
			"name": "session",
			"value": "abc",
			"domain": ".github.com",
			"path": "/",
			"expirationDate": 1700000000.5,
			"httpOnly": true,
			"secure": true,
			"sameSite": "no_restriction",
			"hostOnly": false,
			"storeId": "0"
		});

		let cookie = CookieRecord::from_value(&raw).unwrap();
		assert_eq!(cookie.domain.as_deref(), Some(".github.com"));
		assert_eq!(cookie.http_only, Some(true));
		assert_eq!(cookie.same_site_policy(), Some(SameSite::None));
		assert_eq!(cookie.expiry_epoch(), Some(1700000000.5));
		assert_eq!(cookie.extra.len(), 2);
		assert_eq!(cookie.extra["hostOnly"], json!(false));
	}

	#[test]
	fn mistyped_attribute_is_kept_not_coerced() {
		let raw = json!({ "name": "a", "value": "b", "secure": "yes" });
		let cookie = CookieRecord::from_value(&raw).unwrap();
		assert_eq!(cookie.secure, None);
		assert_eq!(cookie.extra["secure"], json!("yes"));

		let back = serde_json::to_value(&cookie).unwrap();
		assert_eq!(back, raw);
	}

	#[test]
	fn rejects_non_string_name_or_value() {
		assert_eq!(CookieRecord::from_value(&json!(7)), Err(CookieRejection::NotAnObject));
		assert_eq!(CookieRecord::from_value(&json!({ "value": "x" })), Err(CookieRejection::MissingName));
		assert_eq!(
			CookieRecord::from_value(&json!({ "name": "x", "value": 1 })),
			Err(CookieRejection::MissingValue)
		);
	}

	#[test]
	fn expiry_falls_back_to_numeric_expires() {
		let mut cookie = CookieRecord::new("a", "b");
		assert!(cookie.is_session());

		cookie.expires = Some("1700000000".into());
		assert_eq!(cookie.expiry_epoch(), Some(1700000000.0));
		assert!(!cookie.is_session());

		cookie.expires = Some("Wed, 21 Oct 2015 07:28:00 GMT".into());
		assert_eq!(cookie.expiry_epoch(), None);

		let negative = CookieRecord::new("a", "b").expiration_date(-1.0);
		assert!(negative.is_session());
	}

	#[test]
	fn serializes_camel_case() {
		let cookie = CookieRecord::new("sid", "abc").http_only(true).same_site("Lax");
		let json = serde_json::to_string(&cookie).unwrap();
		assert!(json.contains("\"httpOnly\":true"));
		assert!(json.contains("\"sameSite\":\"Lax\""));
		assert!(!json.contains("domain"));
	}
}
