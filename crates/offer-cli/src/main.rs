#![warn(clippy::all, clippy::pedantic)]

use std::process::ExitCode;

use clap::Parser;
use offer_cli::cli::Cli;
use offer_cli::settings::Settings;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging_init();

    let cli = Cli::parse();

    let result = match Settings::load() {
        Ok(settings) => offer_cli::run(cli, &settings).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn logging_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
