//! `sb import`: normalize a bundle and replay its storage into a store file.

use sb::{FileStore, ImportOutcome, import_async, parse_payload};
use tracing::info;

use super::read_bundle;
use crate::cli::ImportArgs;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{self, CommandInputs, CommandResult, DiagnosticLevel, ErrorCode, OutputFormat, ResultBuilder};

pub async fn execute(args: &ImportArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
	let store_path = config.store_path(args.store.as_deref());
	let concurrency = config.concurrency(args.concurrency);
	let quota = config.quota(args.quota);
	info!(
		target = "sb",
		file = %args.file.display(),
		store = %store_path.display(),
		concurrency,
		?quota,
		"importing bundle"
	);

	let raw = parse_payload(&read_bundle(&args.file)?)?;
	let mut store = FileStore::open(&store_path)?;
	if let Some(bytes) = quota {
		store = store.with_quota(bytes);
	}
	let outcome = import_async(&raw, &store, concurrency).await?;

	let inputs = CommandInputs {
		file: Some(args.file.clone()),
		store: Some(store_path),
		concurrency: Some(concurrency),
		..Default::default()
	};

	let result = outcome_result(outcome, inputs)?;
	output::print_result(&result, format);

	// A partial replay already printed its envelope; only the exit code is left.
	match result.error {
		Some(error) => {
			output::print_error_stderr(&error);
			Err(CliError::OutputAlreadyPrinted)
		}
		None => Ok(()),
	}
}

/// Builds the envelope for an import.
///
/// Any failed key turns the result into a `PARTIAL_REPLAY` error carrying the
/// whole outcome as details.
fn outcome_result(outcome: ImportOutcome, inputs: CommandInputs) -> Result<CommandResult<ImportOutcome>> {
	let builder = ResultBuilder::new("import").inputs(inputs);

	if !outcome.report.is_complete() {
		let message = format!(
			"{} of {} storage keys failed to apply",
			outcome.report.failed_count(),
			outcome.report.total_attempted
		);
		let details = serde_json::to_value(&outcome)?;
		return Ok(builder.error_with_details(ErrorCode::PartialReplay, message, details).build());
	}

	let mut builder = builder;
	if outcome.cookies_skipped > 0 {
		builder = builder.diagnostic_with_source(
			DiagnosticLevel::Warning,
			format!("{} cookies were not replayed", outcome.cookies_skipped),
			"cookies",
		);
	}
	if outcome.cookies_dropped > 0 {
		builder = builder.diagnostic_with_source(
			DiagnosticLevel::Warning,
			format!("{} cookie entries had no usable name or value and were dropped", outcome.cookies_dropped),
			"cookies",
		);
	}
	Ok(builder.data(outcome).build())
}
