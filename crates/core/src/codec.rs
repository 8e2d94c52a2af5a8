//! Value encoding for storage writes.
//!
//! Stores hold strings only. Strings are written verbatim, other primitives
//! as their canonical text, and structured values as compact JSON so they can
//! be parsed back.

use serde_json::{Number, Value};

/// Above this, integral floats are no longer written out digit by digit.
const MAX_PLAIN_INTEGRAL: f64 = 1e21;

/// Encodes a storage value for writing.
pub fn encode_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => "null".to_string(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => number_text(n),
		// Serializing a Value cannot fail.
		Value::Array(_) | Value::Object(_) => value.to_string(),
	}
}

/// Integral floats drop their fraction (`1.0` is `1`, `-0.0` is `0`); every
/// other number keeps its JSON text.
fn number_text(n: &Number) -> String {
	match n.as_f64() {
		Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
		Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_PLAIN_INTEGRAL => format!("{f}"),
		_ => n.to_string(),
	}
}

/// Reverses [`encode_value`] as far as the text allows.
///
/// Text that parses as JSON yields the parsed value; anything else is taken
/// as a plain string. A stored string such as `"42"` therefore reads back as
/// the number `42`, which is the same ambiguity browser storage has.
pub fn decode_value(text: &str) -> Value {
	serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
