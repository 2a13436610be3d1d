use std::process;

mod cli;
mod config;
mod error;
mod library;
mod progress;
mod prompt;
mod rating;
mod runtime;
mod subsonic;
mod sync;

fn main() {
    pretty_env_logger::init();

    if let Err(err) = runtime::run() {
        eprintln!("subrate: {err}");
        process::exit(1);
    }
}
