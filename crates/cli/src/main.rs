use clap::Parser;
use sb_cli::cli::Cli;
use sb_cli::error::CliError;
use sb_cli::output::{self, OutputFormat, ResultBuilder};
use sb_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;

	if let Err(err) = commands::dispatch(cli, format).await {
		// Partial replays print their own envelope before failing.
		if !err.is_output_already_printed() {
			handle_error(err, format);
		}
		std::process::exit(1);
	}
}

fn handle_error(err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	output::print_error_stderr(&cmd_error);

	if format != OutputFormat::Text {
		let builder = ResultBuilder::new("unknown");
		let builder = match cmd_error.details {
			Some(details) => builder.error_with_details(cmd_error.code, cmd_error.message, details),
			None => builder.error(cmd_error.code, cmd_error.message),
		};
		let result: output::CommandResult<()> = builder.build();
		output::print_result(&result, format);
	}
}
