use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::delete::{DeleteReport, clear_ratings};
use super::index::build_index;
use super::matcher::{LocalRating, Matched, Pairing, join};
use crate::config::LibrarySettings;
use crate::error::Result;
use crate::library::{PathKey, TagReader, scan};
use crate::progress::{Console, padded_count};
use crate::prompt::Confirm;
use crate::rating::to_stars;
use crate::subsonic::MusicServer;

const SYNC_NOTICE: &str = "\
Reads the ID3 rating of every MP3 below the given directory and writes it
into the 5-star user rating of the matching song on the Subsonic server.

Existing ratings of matched songs on the server will be REPLACED.
Large libraries take a while, every song is fetched and rated one by one.";

const DELETE_NOTICE: &str = "\
Deletes EVERY user rating on the Subsonic server. This cannot be undone.";

const PROCEED: &str = "Do you want to proceed?";

const NO_MATCH: &str = "\t\t(no match on server)";

/// Where a run currently is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Init,
    Confirm,
    ScanLocal,
    IndexRemote,
    UpdateLoop,
    Done,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The confirmation was not answered with "yes". Nothing happened.
    Declined,
    /// The directory holds no matching files. The server was never contacted.
    NoFiles { dir: PathBuf },
    Synced(SyncReport),
    Deleted(DeleteReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files found by the scan.
    pub files: usize,
    pub simulated: bool,
    /// Ratings that found their song, in scan order. Applied unless `simulated`.
    pub ratings: Vec<Matched>,
    /// Number of `setRating` calls made.
    pub updated: usize,
    /// Files without a rating frame.
    pub unrated: usize,
    /// Rated files whose key is not on the server.
    pub unmatched: Vec<LocalRating>,
    /// Rated files missing album, track or title.
    pub incomplete: Vec<PathBuf>,
    /// Files whose tags could not be read.
    pub unreadable: Vec<PathBuf>,
}

impl SyncReport {
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.simulated {
            lines.push(format!(
                ">> Simulation: would have updated {} rating(s) in Subsonic",
                self.ratings.len()
            ));
        } else {
            lines.push(format!(">> Updated {} rating(s) in Subsonic", self.updated));
        }
        if !self.unmatched.is_empty() {
            lines.push(format!(
                ">> {} rated file(s) have no matching song on the server",
                self.unmatched.len()
            ));
        }
        if !self.incomplete.is_empty() {
            lines.push(format!(
                ">> {} rated file(s) lack an album, track or title tag",
                self.incomplete.len()
            ));
        }
        if !self.unreadable.is_empty() {
            lines.push(format!(
                ">> {} file(s) could not be read",
                self.unreadable.len()
            ));
        }
        lines
    }
}

/// Runs a rating sync or a rating wipe against one server.
pub struct SyncDriver<'a> {
    server: &'a dyn MusicServer,
    tags: &'a dyn TagReader,
    confirm: &'a dyn Confirm,
    console: Console,
    stage: Stage,
}

impl<'a> SyncDriver<'a> {
    pub fn new(
        server: &'a dyn MusicServer,
        tags: &'a dyn TagReader,
        confirm: &'a dyn Confirm,
        console: Console,
    ) -> Self {
        Self {
            server,
            tags,
            confirm,
            console,
            stage: Stage::Init,
        }
    }

    #[cfg(test)]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        debug!("{:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Copy the ratings of the files under `dir` to the server.
    ///
    /// With `simulate` set the server is still read, but no rating is written.
    pub fn sync(
        &mut self,
        dir: &Path,
        library: &LibrarySettings,
        simulate: bool,
    ) -> Result<Outcome> {
        self.enter(Stage::Confirm);
        self.console.say(SYNC_NOTICE);
        if !self.confirm.confirm(PROCEED)? {
            self.enter(Stage::Done);
            return Ok(Outcome::Declined);
        }

        self.enter(Stage::ScanLocal);
        let extension = library.normalized_extension();
        let spinner = self.console.spinner("Counting MP3 files: 0");
        let files = scan(dir, library, |n| {
            spinner.set_message(format!("Counting MP3 files: {n}"))
        });
        spinner.finish_and_clear();

        if files.is_empty() {
            self.console
                .say(format!("Couldn't find any MP3 files in {}", dir.display()));
            self.enter(Stage::Done);
            return Ok(Outcome::NoFiles {
                dir: dir.to_path_buf(),
            });
        }
        info!("found {} file(s) in {}", files.len(), dir.display());

        self.enter(Stage::IndexRemote);
        let remote = build_index(self.server, &self.console)?;

        self.enter(Stage::UpdateLoop);
        let mut report = SyncReport {
            files: files.len(),
            simulated: simulate,
            ..SyncReport::default()
        };
        let local = self.read_ratings(&files, &extension, &mut report);
        let pairs = join(local, &remote);

        let total = pairs.len();
        let bar = self
            .console
            .bar(total as u64, if simulate { "simulating" } else { "rating" });
        for (n, pairing) in pairs.into_iter().enumerate() {
            let local = pairing.local();
            let mut line = format!(
                "Song: {}\t\tNew Rating: {}\t\tMP3: {}",
                padded_count(n + 1, total),
                local.stars,
                local.key
            );
            if matches!(pairing, Pairing::Unmatched(_)) {
                line.push_str(NO_MATCH);
            }
            self.console.line(&bar, line);

            match pairing {
                Pairing::Matched(matched) => {
                    if !simulate {
                        self.server
                            .set_rating(&matched.song_id, matched.local.stars)?;
                        report.updated += 1;
                    }
                    report.ratings.push(matched);
                }
                Pairing::Unmatched(missing) => {
                    warn!(
                        "no song on the server matches {} ({})",
                        missing.key,
                        missing.path.display()
                    );
                    report.unmatched.push(missing);
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        self.enter(Stage::Done);
        Ok(Outcome::Synced(report))
    }

    /// Reset every user rating on the server. Never simulated.
    pub fn delete_ratings(&mut self, simulate_requested: bool) -> Result<Outcome> {
        self.enter(Stage::Confirm);
        self.console.say(DELETE_NOTICE);
        if simulate_requested {
            self.console
                .say("Simulation mode (-s) is ignored, ratings will be deleted on the server!");
        }
        if !self.confirm.confirm(PROCEED)? {
            self.enter(Stage::Done);
            return Ok(Outcome::Declined);
        }

        self.enter(Stage::UpdateLoop);
        let report = clear_ratings(self.server, &self.console)?;
        self.console.say(format!(
            ">> Finished deleting user ratings ({} cleared).",
            report.cleared
        ));

        self.enter(Stage::Done);
        Ok(Outcome::Deleted(report))
    }

    fn read_ratings(
        &self,
        files: &[PathBuf],
        extension: &str,
        report: &mut SyncReport,
    ) -> Vec<LocalRating> {
        let bar = self.console.bar(files.len() as u64, "reading tags");
        let mut local = Vec::new();

        for path in files {
            bar.inc(1);
            let tags = match self.tags.read(path) {
                Ok(tags) => tags,
                Err(e) => {
                    warn!("skipping {e}");
                    report.unreadable.push(path.clone());
                    continue;
                }
            };

            let Some(raw) = tags.rating else {
                report.unrated += 1;
                continue;
            };

            match PathKey::from_tags(&tags, extension) {
                Some(key) => local.push(LocalRating {
                    path: path.clone(),
                    key,
                    stars: to_stars(raw),
                }),
                None => {
                    warn!(
                        "skipping {}: album, track or title tag missing",
                        path.display()
                    );
                    report.incomplete.push(path.clone());
                }
            }
        }

        bar.finish_and_clear();
        local
    }
}
