use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(
    version,
    about = "Copy MP3 ID3 ratings to a Subsonic server, or delete Subsonic user ratings",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// The directory containing your MP3s (subfolders are included)
    pub directory: Option<PathBuf>,

    /// Skip the Subsonic rating update (simulation mode)
    #[clap(short, long)]
    pub skip_subsonic: bool,

    /// Delete user ratings from the Subsonic server
    #[clap(short, long)]
    pub delete_user_ratings: bool,

    /// Answer "yes" to the confirmation prompt
    #[clap(short, long)]
    pub yes: bool,

    /// Config file (default: $SUBRATE_CONFIG_PATH, then ~/.config/subrate/config.toml)
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}
