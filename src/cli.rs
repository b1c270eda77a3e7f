use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

use crate::{
    client::RelayClient,
    config::{Markers, RelayConfig, DEFAULT_URL, URL_ENV},
    file::FileDescriptor,
};

#[derive(Parser, Debug)]
#[command(name = "filetea", version)]
#[command(about = "Easy file transfer using the FileTea service", long_about = None)]
pub struct Cli {
    /// File to send
    pub file: PathBuf,

    /// FileTea server url
    #[arg(short = 'l', long, env = URL_ENV, default_value = DEFAULT_URL)]
    pub url: String,

    /// Be verbose (-vv to increase verbosity)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Character prefixed to request payloads
    #[arg(long, default_value_t = 'X', hide = true)]
    pub request_marker: char,

    /// Character the register reply must start with
    #[arg(long, default_value_t = '@', hide = true)]
    pub reply_marker: char,

    /// Character poll events must start with (any if unset)
    #[arg(long, hide = true)]
    pub event_marker: Option<char>,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    pub fn markers(&self) -> Markers {
        Markers {
            request: self.request_marker,
            reply: self.reply_marker,
            event: self.event_marker,
        }
    }

    pub fn execute(self) -> anyhow::Result<()> {
        let file = FileDescriptor::inspect(&self.file)?;
        let config = RelayConfig::new(&self.url, self.markers())?;

        let client = RelayClient::connect(config)?;
        let share = client
            .share(&file)
            .context("could not register file with the relay")?;

        info!("URL for file {}: {}", self.file.display(), share.url);
        println!("URL: {}", share.url);
        println!("Press CTRL+C to stop sharing...");

        client.serve(&share, &file)?;
        Ok(())
    }
}
