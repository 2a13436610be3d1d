use clap::Parser;
use log::info;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::library::Id3TagReader;
use crate::progress::Console;
use crate::prompt::{AssumeYes, Confirm, TerminalConfirm};
use crate::subsonic::SubsonicClient;
use crate::sync::{Outcome, SyncDriver};

mod settings;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if !cli.delete_user_ratings && cli.directory.is_none() {
        return Err(Error::MissingDirectory);
    }
    let settings = settings::load_settings(cli.config.as_deref())?;

    let client = SubsonicClient::new(&settings.server)?;
    info!("using Subsonic server at {}", settings.server.url);

    let confirm: &dyn Confirm = if cli.yes { &AssumeYes } else { &TerminalConfirm };
    let console = Console::terminal();
    let mut driver = SyncDriver::new(&client, &Id3TagReader, confirm, console.clone());

    let outcome = if cli.delete_user_ratings {
        driver.delete_ratings(cli.skip_subsonic)?
    } else {
        let dir = cli.directory.as_deref().ok_or(Error::MissingDirectory)?;
        driver.sync(dir, &settings.library, cli.skip_subsonic)?
    };

    match outcome {
        Outcome::Declined => info!("declined, nothing changed"),
        Outcome::NoFiles { dir } => info!("nothing to do in {}", dir.display()),
        Outcome::Synced(report) => {
            for line in report.summary() {
                console.say(line);
            }
        }
        Outcome::Deleted(report) => info!("cleared {} rating(s)", report.cleared),
    }

    Ok(())
}
