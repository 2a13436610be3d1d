use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::delete::clear_ratings;
use super::driver::{Outcome, Stage, SyncDriver, SyncReport};
use super::index::{RemoteIndex, build_index};
use super::matcher::{LocalRating, Matched, Pairing, join};
use crate::config::LibrarySettings;
use crate::error::{Error, Result};
use crate::library::{PathKey, TagReader, TrackTags};
use crate::progress::Console;
use crate::prompt::Confirm;
use crate::rating::{Stars, to_stars};
use crate::subsonic::{Album, AlbumRef, Artist, ArtistRef, Index, MusicServer, Song};

#[derive(Default)]
struct FakeServer {
    indexes: Vec<Index>,
    artists: HashMap<String, Artist>,
    albums: HashMap<String, Album>,
    reads: Cell<usize>,
    rated: RefCell<Vec<(String, Stars)>>,
    reject_ratings: bool,
}

impl FakeServer {
    /// Add one album with `songs`, filed under index `letter`.
    fn with_album(mut self, letter: &str, album_id: &str, songs: Vec<Song>) -> Self {
        let artist_id = format!("artist-{album_id}");
        let artist_ref = ArtistRef {
            id: artist_id.clone(),
            name: artist_id.clone(),
        };
        match self.indexes.iter_mut().find(|i| i.name == letter) {
            Some(index) => index.artist.push(artist_ref),
            None => self.indexes.push(Index {
                name: letter.to_string(),
                artist: vec![artist_ref],
            }),
        }
        self.artists.insert(
            artist_id.clone(),
            Artist {
                id: artist_id,
                name: String::new(),
                album: vec![AlbumRef {
                    id: album_id.to_string(),
                    name: String::new(),
                }],
            },
        );
        self.albums.insert(
            album_id.to_string(),
            Album {
                id: album_id.to_string(),
                name: String::new(),
                song: songs,
            },
        );
        self
    }

    fn rated(&self) -> Vec<(String, u8)> {
        self.rated
            .borrow()
            .iter()
            .map(|(id, stars)| (id.clone(), stars.get()))
            .collect()
    }
}

impl MusicServer for FakeServer {
    fn indexes(&self) -> Result<Vec<Index>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.indexes.clone())
    }

    fn artist(&self, id: &str) -> Result<Artist> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.artists[id].clone())
    }

    fn album(&self, id: &str) -> Result<Album> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.albums[id].clone())
    }

    fn set_rating(&self, id: &str, rating: Stars) -> Result<()> {
        if self.reject_ratings {
            return Err(Error::Api {
                endpoint: "setRating".to_string(),
                code: 50,
                message: "not authorized".to_string(),
            });
        }
        self.rated.borrow_mut().push((id.to_string(), rating));
        Ok(())
    }
}

/// Tags keyed by path. Paths without an entry fail to read.
#[derive(Default)]
struct FakeTags(HashMap<PathBuf, TrackTags>);

impl TagReader for FakeTags {
    fn read(&self, path: &Path) -> Result<TrackTags> {
        self.0.get(path).cloned().ok_or_else(|| Error::OpenFile {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "not an mp3"),
        })
    }
}

struct Scripted {
    answer: bool,
    asked: Cell<usize>,
}

impl Scripted {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Cell::new(0),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&self, _question: &str) -> Result<bool> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer)
    }
}

fn song(id: &str, path: Option<&str>, user_rating: Option<u8>) -> Song {
    Song {
        id: id.to_string(),
        title: String::new(),
        album: String::new(),
        path: path.map(str::to_string),
        user_rating,
    }
}

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"not a real mp3").unwrap();
    path
}

fn rated(rating: u8, title: &str, track: &str, album: &str) -> TrackTags {
    TrackTags::from_frames(Some(rating), Some(title), Some(track), Some(album))
}

fn synced(outcome: Outcome) -> SyncReport {
    match outcome {
        Outcome::Synced(report) => report,
        other => panic!("expected a sync report, got {other:?}"),
    }
}

fn greatest_hits_server() -> FakeServer {
    FakeServer::default().with_album(
        "V",
        "al-1",
        vec![song(
            "s-42",
            Some("Various/Greatest Hits/03 - Song_Two.mp3"),
            None,
        )],
    )
}

#[test]
fn rated_file_updates_its_song() {
    let dir = tempdir().unwrap();
    let file = touch(dir.path(), "Greatest Hits/whatever.mp3");
    let tags = FakeTags(HashMap::from([(file, rated(200, "Song/Two", "3/12", "Greatest Hits"))]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let report = synced(
        driver
            .sync(dir.path(), &LibrarySettings::default(), false)
            .unwrap(),
    );

    assert_eq!(driver.stage(), Stage::Done);
    assert_eq!(report.files, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.ratings.len(), 1);
    assert_eq!(
        report.ratings[0].local.key.as_str(),
        "Greatest Hits/03 - Song_Two.mp3"
    );
    assert_eq!(report.ratings[0].local.stars.get(), 4);
    assert_eq!(server.rated(), vec![("s-42".to_string(), 4)]);
}

#[test]
fn simulation_reports_ratings_without_writing() {
    let dir = tempdir().unwrap();
    let file = touch(dir.path(), "a/song.mp3");
    let tags = FakeTags(HashMap::from([(file, rated(200, "Song/Two", "3/12", "Greatest Hits"))]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let report = synced(
        driver
            .sync(dir.path(), &LibrarySettings::default(), true)
            .unwrap(),
    );

    assert!(report.simulated);
    assert_eq!(report.updated, 0);
    assert_eq!(report.ratings.len(), 1);
    assert_eq!(report.ratings[0].local.stars.get(), 4);
    assert_eq!(report.ratings[0].song_id, "s-42");
    assert!(server.rated().is_empty());
}

#[test]
fn simulation_prints_every_rated_file_including_misses() {
    let dir = tempdir().unwrap();
    let file = touch(dir.path(), "a/song.mp3");
    let tags = FakeTags(HashMap::from([(file, rated(128, "Elsewhere", "1", "Greatest Hits"))]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);
    let console = Console::recording();

    let mut driver = SyncDriver::new(&server, &tags, &confirm, console.clone());
    let report = synced(
        driver
            .sync(dir.path(), &LibrarySettings::default(), true)
            .unwrap(),
    );

    assert!(report.ratings.is_empty());
    assert_eq!(report.unmatched.len(), 1);
    let printed = console.recorded();
    let line = printed
        .iter()
        .find(|line| line.starts_with("Song: 1/1"))
        .expect("a line for the rated file");
    assert!(line.contains("New Rating: 3"));
    assert!(line.contains("MP3: Greatest Hits/01 - Elsewhere.mp3"));
    assert!(line.ends_with("(no match on server)"));
}

#[test]
fn matched_and_unmatched_lines_share_one_counter() {
    let dir = tempdir().unwrap();
    let hit = touch(dir.path(), "1.mp3");
    let miss = touch(dir.path(), "2.mp3");
    let tags = FakeTags(HashMap::from([
        (hit, rated(255, "Song/Two", "3", "Greatest Hits")),
        (miss, rated(64, "Elsewhere", "1", "Greatest Hits")),
    ]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);
    let console = Console::recording();

    let mut driver = SyncDriver::new(&server, &tags, &confirm, console.clone());
    driver
        .sync(dir.path(), &LibrarySettings::default(), false)
        .unwrap();

    let songs: Vec<String> = console
        .recorded()
        .into_iter()
        .filter(|line| line.starts_with("Song: "))
        .collect();
    assert_eq!(songs.len(), 2);
    assert!(songs.iter().any(|l| l.starts_with("Song: 1/2")));
    assert!(songs.iter().any(|l| l.starts_with("Song: 2/2")));
    assert_eq!(
        songs.iter().filter(|l| l.ends_with("(no match on server)")).count(),
        1
    );
    assert_eq!(server.rated(), vec![("s-42".to_string(), 5)]);
}

#[test]
fn empty_directory_ends_without_network() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("cover.jpg"), b"jpeg").unwrap();
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);
    let tags = FakeTags::default();

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let outcome = driver
        .sync(dir.path(), &LibrarySettings::default(), false)
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::NoFiles {
            dir: dir.path().to_path_buf()
        }
    );
    assert_eq!(driver.stage(), Stage::Done);
    assert_eq!(server.reads.get(), 0);
    assert!(server.rated().is_empty());
}

#[test]
fn declining_does_nothing() {
    let dir = tempdir().unwrap();
    let file = touch(dir.path(), "a/song.mp3");
    let tags = FakeTags(HashMap::from([(file, rated(255, "T", "1", "A"))]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(false);

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let outcome = driver
        .sync(dir.path(), &LibrarySettings::default(), false)
        .unwrap();

    assert_eq!(outcome, Outcome::Declined);
    assert_eq!(confirm.asked.get(), 1);
    assert_eq!(driver.stage(), Stage::Done);
    assert_eq!(server.reads.get(), 0);
    assert!(server.rated().is_empty());
}

#[test]
fn unmatched_and_incomplete_files_are_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let hit = touch(dir.path(), "1.mp3");
    let miss = touch(dir.path(), "2.mp3");
    let no_album = touch(dir.path(), "3.mp3");
    let unrated = touch(dir.path(), "4.mp3");
    let broken = touch(dir.path(), "5.mp3");

    let tags = FakeTags(HashMap::from([
        (hit, rated(1, "Song/Two", "03", "Greatest Hits")),
        (miss.clone(), rated(128, "Elsewhere", "1", "Greatest Hits")),
        (
            no_album.clone(),
            TrackTags::from_frames(Some(64), Some("T"), Some("1"), None),
        ),
        (unrated, TrackTags::from_frames(None, Some("T"), Some("1"), Some("A"))),
    ]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let report = synced(
        driver
            .sync(dir.path(), &LibrarySettings::default(), false)
            .unwrap(),
    );

    assert_eq!(report.files, 5);
    assert_eq!(report.updated, 1);
    assert_eq!(server.rated(), vec![("s-42".to_string(), 1)]);
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].path, miss);
    assert_eq!(report.unmatched[0].key.as_str(), "Greatest Hits/01 - Elsewhere.mp3");
    assert_eq!(report.incomplete, vec![no_album]);
    assert_eq!(report.unrated, 1);
    assert_eq!(report.unreadable, vec![broken]);
}

#[test]
fn server_failure_aborts_the_run() {
    let dir = tempdir().unwrap();
    let file = touch(dir.path(), "a.mp3");
    let tags = FakeTags(HashMap::from([(file, rated(200, "Song/Two", "3", "Greatest Hits"))]));
    let server = FakeServer {
        reject_ratings: true,
        ..greatest_hits_server()
    };
    let confirm = Scripted::answering(true);

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let err = driver
        .sync(dir.path(), &LibrarySettings::default(), false)
        .unwrap_err();

    assert!(matches!(err, Error::Api { code: 50, .. }));
    assert_eq!(driver.stage(), Stage::UpdateLoop);
}

#[test]
fn unrated_zero_is_pushed_as_zero() {
    let dir = tempdir().unwrap();
    let file = touch(dir.path(), "a.mp3");
    let tags = FakeTags(HashMap::from([(file, rated(0, "Song_Two", "3", "Greatest Hits"))]));
    let server = greatest_hits_server();
    let confirm = Scripted::answering(true);

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let report = synced(
        driver
            .sync(dir.path(), &LibrarySettings::default(), false)
            .unwrap(),
    );

    assert_eq!(report.updated, 1);
    assert_eq!(server.rated(), vec![("s-42".to_string(), 0)]);
}

fn rated_library() -> FakeServer {
    FakeServer::default()
        .with_album(
            "A",
            "al-1",
            vec![
                song("s-1", Some("A/x/1.mp3"), Some(3)),
                song("s-2", Some("A/x/2.mp3"), Some(0)),
                song("s-3", Some("A/x/3.mp3"), None),
            ],
        )
        .with_album("B", "al-2", vec![song("s-4", None, Some(5))])
}

#[test]
fn delete_resets_only_rated_songs() {
    let server = rated_library();

    let report = clear_ratings(&server, &Console::recording()).unwrap();

    assert_eq!(report.cleared, 2);
    assert_eq!(
        report.previous,
        HashMap::from([("s-1".to_string(), 3), ("s-4".to_string(), 5)])
    );
    assert_eq!(
        server.rated(),
        vec![("s-1".to_string(), 0), ("s-4".to_string(), 0)]
    );
}

#[test]
fn delete_mode_asks_first_and_ignores_simulation() {
    let server = rated_library();
    let confirm = Scripted::answering(true);
    let tags = FakeTags::default();

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    let outcome = driver.delete_ratings(true).unwrap();

    assert_eq!(confirm.asked.get(), 1);
    match outcome {
        Outcome::Deleted(report) => assert_eq!(report.cleared, 2),
        other => panic!("expected a delete report, got {other:?}"),
    }
    assert_eq!(server.rated().len(), 2);
}

#[test]
fn declined_delete_touches_nothing() {
    let server = rated_library();
    let confirm = Scripted::answering(false);
    let tags = FakeTags::default();

    let mut driver = SyncDriver::new(&server, &tags, &confirm, Console::recording());
    assert_eq!(driver.delete_ratings(false).unwrap(), Outcome::Declined);
    assert_eq!(server.reads.get(), 0);
    assert!(server.rated().is_empty());
}

#[test]
fn index_keys_songs_by_last_two_segments() {
    let server = FakeServer::default()
        .with_album(
            "A",
            "al-1",
            vec![
                song("s-1", Some("Artist/Album/01 - One.mp3"), None),
                song("s-2", None, None),
            ],
        )
        .with_album("A", "al-2", vec![song("s-3", Some("Other/Album/01 - One.mp3"), None)]);

    let index = build_index(&server, &Console::recording()).unwrap();

    assert_eq!(index.len(), 1);
    // Same key from a later album wins.
    assert_eq!(
        index.get(&PathKey::from_remote_path("Album/01 - One.mp3")),
        Some("s-3")
    );
    assert_eq!(server.indexes.len(), 1);
}

#[test]
fn join_pairs_every_rating_in_order() {
    let remote: RemoteIndex = [
        (PathKey::from_remote_path("A/1.mp3"), "one".to_string()),
        (PathKey::from_remote_path("A/3.mp3"), "three".to_string()),
    ]
    .into_iter()
    .collect();

    let local = |name: &str| LocalRating {
        path: PathBuf::from(name),
        key: PathKey::from_remote_path(&format!("A/{name}")),
        stars: to_stars(255),
    };

    let pairs = join(vec![local("3.mp3"), local("2.mp3"), local("1.mp3")], &remote);

    assert_eq!(
        pairs,
        vec![
            Pairing::Matched(Matched {
                local: local("3.mp3"),
                song_id: "three".to_string(),
            }),
            Pairing::Unmatched(local("2.mp3")),
            Pairing::Matched(Matched {
                local: local("1.mp3"),
                song_id: "one".to_string(),
            }),
        ]
    );
}

#[test]
fn summary_mentions_skipped_files() {
    let report = SyncReport {
        updated: 3,
        unmatched: vec![LocalRating {
            path: PathBuf::from("x.mp3"),
            key: PathKey::from_remote_path("A/x.mp3"),
            stars: Stars::NONE,
        }],
        unreadable: vec![PathBuf::from("y.mp3")],
        ..SyncReport::default()
    };

    assert_eq!(
        report.summary(),
        vec![
            ">> Updated 3 rating(s) in Subsonic".to_string(),
            ">> 1 rated file(s) have no matching song on the server".to_string(),
            ">> 1 file(s) could not be read".to_string(),
        ]
    );

    let simulated = SyncReport {
        simulated: true,
        ..SyncReport::default()
    };
    assert_eq!(
        simulated.summary(),
        vec![">> Simulation: would have updated 0 rating(s) in Subsonic".to_string()]
    );
}
