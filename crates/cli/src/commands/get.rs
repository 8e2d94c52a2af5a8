//! `sb get`: read one key back from a store file.

use sb::{FileStore, KeyValueStore, decode_value};
use tracing::debug;

use crate::cli::GetArgs;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{self, CommandInputs, GetData, OutputFormat, ResultBuilder};

pub fn execute(args: &GetArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
	let store_path = config.store_path(args.store.as_deref());
	debug!(target = "sb", key = %args.key, store = %store_path.display(), "reading key");

	let store = FileStore::open(&store_path)?;
	let raw = store.get(&args.key).ok_or_else(|| CliError::KeyNotFound(args.key.clone()))?;

	let result = ResultBuilder::new("get")
		.inputs(CommandInputs {
			store: Some(store_path),
			key: Some(args.key.clone()),
			..Default::default()
		})
		.data(GetData {
			key: args.key.clone(),
			value: decode_value(&raw),
			raw,
		})
		.build();

	output::print_result(&result, format);
	Ok(())
}
