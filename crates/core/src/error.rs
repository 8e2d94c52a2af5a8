//! Error types for session bundle import.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors surfaced by normalization and import.
///
/// Per-key storage failures are never returned through this type; they are
/// captured as [`StoreError`]s inside a [`ReplayReport`](sb_protocol::ReplayReport).
#[derive(Debug, Error)]
pub enum Error {
	/// Raw input matched none of the recognized bundle shapes.
	#[error("{0}")]
	Shape(String),

	/// A sub-field was present but could not be decoded as a unit.
	#[error("malformed {field}: {reason}")]
	MalformedPayload {
		/// Field that failed, e.g. `localStorage` or `cookies[3]`.
		field: String,
		/// Human-readable cause.
		reason: String,
	},
}

impl Error {
	/// The shape error for payloads nothing recognizes.
	pub fn unrecognized() -> Self {
		Error::Shape("unrecognized session data format".into())
	}

	pub(crate) fn malformed(field: impl Into<String>, reason: impl ToString) -> Self {
		Error::MalformedPayload {
			field: field.into(),
			reason: reason.to_string(),
		}
	}

	pub fn is_shape(&self) -> bool {
		matches!(self, Error::Shape(_))
	}

	pub fn is_malformed(&self) -> bool {
		matches!(self, Error::MalformedPayload { .. })
	}
}

/// A single key failed to persist.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Writing would push the store past its byte budget.
	#[error("quota exceeded writing '{key}' (limit {limit} bytes)")]
	QuotaExceeded { key: String, limit: usize },

	/// The backing file could not be written.
	#[error("failed to persist {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The store contents could not be encoded.
	#[error("failed to encode store: {0}")]
	Serialize(#[from] serde_json::Error),

	/// Backend-specific failure.
	#[error("{0}")]
	Backend(String),
}
