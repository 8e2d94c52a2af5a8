use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn parse_import_command() {
	let args = vec!["sb", "import", "bundle.json", "--store", "/tmp/store.json", "--concurrency", "8", "--quota", "4096"];
	let cli = Cli::try_parse_from(args).unwrap();

	match cli.command {
		Commands::Import(args) => {
			assert_eq!(args.file, PathBuf::from("bundle.json"));
			assert_eq!(args.store, Some(PathBuf::from("/tmp/store.json")));
			assert_eq!(args.concurrency, Some(8));
			assert_eq!(args.quota, Some(4096));
		}
		_ => panic!("Expected Import command"),
	}
}

#[test]
fn parse_import_defaults() {
	let cli = Cli::try_parse_from(["sb", "import", "-"]).unwrap();

	match cli.command {
		Commands::Import(args) => {
			assert_eq!(args.file, PathBuf::from("-"));
			assert_eq!(args.store, None);
			assert_eq!(args.concurrency, None);
			assert_eq!(args.quota, None);
		}
		_ => panic!("Expected Import command"),
	}
	assert_eq!(cli.format, OutputFormat::Toon);
	assert_eq!(cli.verbose, 0);
}

#[test]
fn parse_global_flags_after_subcommand() {
	let cli = Cli::try_parse_from(["sb", "inspect", "b.json", "-f", "json", "-vv", "--config", "c.json"]).unwrap();

	assert_eq!(cli.format, OutputFormat::Json);
	assert_eq!(cli.verbose, 2);
	assert_eq!(cli.config, Some(PathBuf::from("c.json")));
	assert!(matches!(cli.command, Commands::Inspect(_)));
}

#[test]
fn parse_get_command() {
	let cli = Cli::try_parse_from(["sb", "get", "token", "--store", "s.json"]).unwrap();

	match cli.command {
		Commands::Get(args) => {
			assert_eq!(args.key, "token");
			assert_eq!(args.store, Some(PathBuf::from("s.json")));
		}
		_ => panic!("Expected Get command"),
	}
}

#[test]
fn get_requires_key() {
	assert!(Cli::try_parse_from(["sb", "get"]).is_err());
}
