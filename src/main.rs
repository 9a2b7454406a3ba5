//! Shopfront CLI

use std::{io, process::ExitCode};

use clap::Parser;
use shopfront::{
    cli::{Cli, run},
    logging::init_subscriber,
};
use tracing::error;

#[expect(clippy::print_stderr, reason = "Errors are reported to the user on stderr")]
pub fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = init_subscriber(&cli.logging) {
        eprintln!("failed to initialise logging: {err}");

        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();

    match run(cli, stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{err}");

            ExitCode::FAILURE
        }
    }
}
