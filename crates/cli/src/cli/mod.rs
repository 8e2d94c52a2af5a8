use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "sb")]
#[command(about = "Inspect and import captured browser session bundles")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Config file (defaults to ~/.config/sb/config.json)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Normalize a bundle and summarize it without writing anything
	Inspect(InspectArgs),

	/// Normalize a bundle and replay its localStorage into a store file
	Import(ImportArgs),

	/// Read one key back from a store file
	Get(GetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
	/// Bundle file, or `-` for stdin
	#[arg(value_name = "FILE")]
	pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
	/// Bundle file, or `-` for stdin
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// Store file to write into
	#[arg(long, value_name = "PATH")]
	pub store: Option<PathBuf>,

	/// Maximum writes in flight
	#[arg(long, value_name = "N")]
	pub concurrency: Option<usize>,

	/// Reject writes once stored keys and values exceed this many bytes
	#[arg(long, value_name = "BYTES")]
	pub quota: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
	/// Storage key to read
	#[arg(value_name = "KEY")]
	pub key: String,

	/// Store file to read from
	#[arg(long, value_name = "PATH")]
	pub store: Option<PathBuf>,
}
