use anyhow::Error;
use clap::Parser;
use log::error;

use crate::cli::Cli;

mod cli;
mod client;
mod config;
mod error;
mod file;
mod message;
mod transport;

// Usage: filetea [-l <url>] [-v|-vv] <file>

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .init();

    // Blocking calls can't be cancelled, so an interrupt just ends the process.
    if let Err(err) = ctrlc::set_handler(|| std::process::exit(0)) {
        error!("failed to set Ctrl-C handler: {}", err);
    }

    cli.execute()
}
