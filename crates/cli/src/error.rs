use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Command failed but its envelope has already been printed.
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error(transparent)]
	Bundle(#[from] sb::Error),

	#[error("store unavailable: {0}")]
	Store(#[from] sb::StoreError),

	#[error("failed to read {}: {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config {}: {reason}", .path.display())]
	Config { path: PathBuf, reason: String },

	#[error("key not found: {0}")]
	KeyNotFound(String),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	/// Check if this error indicates output has already been printed.
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, CliError::OutputAlreadyPrinted)
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			CliError::OutputAlreadyPrinted => (ErrorCode::InternalError, String::new(), None),
			CliError::Bundle(err @ sb::Error::Shape(_)) => (ErrorCode::ShapeError, err.to_string(), None),
			CliError::Bundle(err @ sb::Error::MalformedPayload { field, .. }) => (
				ErrorCode::MalformedPayload,
				err.to_string(),
				Some(serde_json::json!({ "field": field })),
			),
			CliError::Store(err) => (ErrorCode::InvalidInput, self.to_string(), store_details(err)),
			CliError::Read { path, .. } => (ErrorCode::IoError, self.to_string(), Some(serde_json::json!({ "path": path }))),
			CliError::Config { path, .. } => (ErrorCode::InvalidInput, self.to_string(), Some(serde_json::json!({ "path": path }))),
			CliError::KeyNotFound(key) => (ErrorCode::KeyNotFound, self.to_string(), Some(serde_json::json!({ "key": key }))),
			CliError::Json(err) => (ErrorCode::InternalError, format!("JSON error: {err}"), None),
		};

		CommandError { code, message, details }
	}
}

fn store_details(err: &sb::StoreError) -> Option<serde_json::Value> {
	match err {
		sb::StoreError::Io { path, .. } => Some(serde_json::json!({ "path": path })),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shape_error_maps_to_shape_code() {
		let err = CliError::from(sb::Error::unrecognized());
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::ShapeError);
		assert_eq!(cmd.message, "unrecognized session data format");
	}

	#[test]
	fn malformed_error_names_field() {
		let sb_err = sb::normalize(&serde_json::json!({ "cookies": [], "localStorage": "{bad" })).unwrap_err();
		let cmd = CliError::from(sb_err).to_command_error();
		assert_eq!(cmd.code, ErrorCode::MalformedPayload);
		assert_eq!(cmd.details.unwrap()["field"], "localStorage");
	}

	#[test]
	fn missing_key_maps_to_key_not_found() {
		let cmd = CliError::KeyNotFound("token".into()).to_command_error();
		assert_eq!(cmd.code, ErrorCode::KeyNotFound);
		assert_eq!(cmd.message, "key not found: token");
	}

	#[test]
	fn output_already_printed_is_detected() {
		assert!(CliError::OutputAlreadyPrinted.is_output_already_printed());
		assert!(!CliError::KeyNotFound("x".into()).is_output_already_printed());
	}
}
