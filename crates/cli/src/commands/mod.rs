mod get;
mod import;
mod inspect;

use std::io::Read;
use std::path::Path;

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let config = CliConfig::load(cli.config.as_deref())?;

	match cli.command {
		Commands::Inspect(args) => inspect::execute(&args, format),
		Commands::Import(args) => import::execute(&args, &config, format).await,
		Commands::Get(args) => get::execute(&args, &config, format),
	}
}

/// Reads bundle text from a file, or stdin when the path is `-`.
fn read_bundle(path: &Path) -> Result<String> {
	if path.as_os_str() == "-" {
		let mut text = String::new();
		std::io::stdin().read_to_string(&mut text).map_err(|source| CliError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		return Ok(text);
	}

	std::fs::read_to_string(path).map_err(|source| CliError::Read {
		path: path.to_path_buf(),
		source,
	})
}
