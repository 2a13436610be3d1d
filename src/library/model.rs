use std::fmt;

/// The four ID3 fields needed to rate a file and find it on the server.
///
/// Every field is independently absent when its frame is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    /// Raw `POPM` rating byte (0 = unrated).
    pub rating: Option<u8>,
    /// `TIT2`, with `/` already replaced by `_`.
    pub title: Option<String>,
    /// `TRCK` reduced to the zero-padded track number.
    pub track: Option<String>,
    /// `TALB`, verbatim.
    pub album: Option<String>,
}

/// Join key shared by local files and server songs: `album-folder/filename`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(String);

impl PathKey {
    /// Key for a server-reported path: its last two `/`-separated segments.
    pub fn from_remote_path(path: &str) -> Self {
        let mut tail: Vec<&str> = path.rsplit('/').take(2).collect();
        tail.reverse();
        Self(tail.join("/"))
    }

    /// Key synthesized from tags: `"{album}/{track} - {title}.{extension}"`.
    ///
    /// Returns `None` when any of album, track or title is missing.
    pub fn from_tags(tags: &TrackTags, extension: &str) -> Option<Self> {
        let album = tags.album.as_deref()?;
        let track = tags.track.as_deref()?;
        let title = tags.title.as_deref()?;
        Some(Self(format!("{album}/{track} - {title}.{extension}")))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
