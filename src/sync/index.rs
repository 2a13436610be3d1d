use std::collections::HashMap;

use log::{debug, info};

use crate::error::Result;
use crate::library::PathKey;
use crate::progress::Console;
use crate::subsonic::{MusicServer, Song};

/// Server songs keyed by the last two segments of their path.
#[derive(Debug, Clone, Default)]
pub struct RemoteIndex {
    by_key: HashMap<PathKey, String>,
}

impl RemoteIndex {
    /// Add a song; later songs with the same key replace earlier ones.
    pub fn insert(&mut self, key: PathKey, song_id: String) {
        if let Some(previous) = self.by_key.insert(key.clone(), song_id) {
            debug!("{key} is shared by several songs, dropping {previous}");
        }
    }

    pub fn get(&self, key: &PathKey) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }
}

impl FromIterator<(PathKey, String)> for RemoteIndex {
    fn from_iter<I: IntoIterator<Item = (PathKey, String)>>(iter: I) -> Self {
        let mut index = RemoteIndex::default();
        for (key, id) in iter {
            index.insert(key, id);
        }
        index
    }
}

/// Walk indexes → artists → albums → songs, calling `on_song` for each song.
///
/// `on_index` receives each index name before its artists are fetched. The
/// first failing call ends the walk.
pub fn for_each_song<S>(
    server: &S,
    mut on_index: impl FnMut(&str),
    mut on_song: impl FnMut(&Song) -> Result<()>,
) -> Result<()>
where
    S: MusicServer + ?Sized,
{
    for index in server.indexes()? {
        on_index(&index.name);
        for artist in &index.artist {
            let artist = server.artist(&artist.id)?;
            for album in &artist.album {
                let album = server.album(&album.id)?;
                for song in &album.song {
                    on_song(song)?;
                }
            }
        }
    }
    Ok(())
}

/// Fetch the whole library and key every song that has a path.
pub fn build_index<S>(server: &S, console: &Console) -> Result<RemoteIndex>
where
    S: MusicServer + ?Sized,
{
    let spinner = console.spinner("Getting all indexes from Subsonic server...");
    let mut index = RemoteIndex::default();
    let mut without_path = 0usize;

    for_each_song(
        server,
        |name| spinner.set_message(format!("Reading songs from artists starting with {name}...")),
        |song| {
            match &song.path {
                Some(path) => index.insert(PathKey::from_remote_path(path), song.id.clone()),
                None => without_path += 1,
            }
            Ok(())
        },
    )?;

    spinner.finish_and_clear();
    if without_path > 0 {
        debug!("{without_path} song(s) on the server carry no path");
    }
    info!("indexed {} song path(s) on the server", index.len());
    Ok(index)
}
