use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to load config: {source}"))]
    Config { source: ::config::ConfigError },
    #[snafu(display("invalid config: {message}"))]
    InvalidSettings { message: String },
    #[snafu(display("no directory given, pass the folder containing your MP3s"))]
    MissingDirectory,
    #[snafu(display("request to {endpoint} failed: {source}"))]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    #[snafu(display("server rejected {endpoint} (code {code}): {message}"))]
    Api {
        endpoint: String,
        code: i64,
        message: String,
    },
    #[snafu(display("failed to decode {endpoint} response: {message}"))]
    Decode { endpoint: String, message: String },
    #[snafu(display("failed to read tags from {}: {source}", path.display()))]
    ReadTags {
        path: PathBuf,
        source: lofty::error::LoftyError,
    },
    #[snafu(display("failed to open {}: {source}", path.display()))]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to read answer: {source}"))]
    Prompt { source: dialoguer::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
