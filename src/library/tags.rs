use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::id3::v2::{Frame, FrameId, Id3v2Tag};
use lofty::mpeg::MpegFile;
use snafu::prelude::*;

use super::model::TrackTags;
use crate::error::{OpenFileSnafu, ReadTagsSnafu, Result};

const POPULARIMETER: FrameId<'static> = FrameId::Valid(Cow::Borrowed("POPM"));
const TITLE: FrameId<'static> = FrameId::Valid(Cow::Borrowed("TIT2"));
const TRACK_NUMBER: FrameId<'static> = FrameId::Valid(Cow::Borrowed("TRCK"));
const ALBUM: FrameId<'static> = FrameId::Valid(Cow::Borrowed("TALB"));

/// Source of per-file tag data.
pub trait TagReader {
    fn read(&self, path: &Path) -> Result<TrackTags>;
}

/// Reads ID3v2 frames from MPEG files through lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3TagReader;

impl TagReader for Id3TagReader {
    fn read(&self, path: &Path) -> Result<TrackTags> {
        let mut file = File::open(path).context(OpenFileSnafu { path })?;
        let mpeg =
            MpegFile::read_from(&mut file, ParseOptions::new()).context(ReadTagsSnafu { path })?;

        Ok(mpeg.id3v2().map(tags_from_id3v2).unwrap_or_default())
    }
}

fn tags_from_id3v2(tag: &Id3v2Tag) -> TrackTags {
    let rating = match tag.get(&POPULARIMETER) {
        Some(Frame::Popularimeter(popm)) => Some(popm.rating),
        _ => None,
    };

    TrackTags::from_frames(
        rating,
        tag.get_text(&TITLE),
        tag.get_text(&TRACK_NUMBER),
        tag.get_text(&ALBUM),
    )
}

impl TrackTags {
    /// Build from raw frame values, normalizing title and track number.
    pub fn from_frames(
        rating: Option<u8>,
        title: Option<&str>,
        track: Option<&str>,
        album: Option<&str>,
    ) -> Self {
        Self {
            rating,
            title: title.map(clean_title),
            track: track.map(track_number),
            album: album.map(str::to_string),
        }
    }
}

/// Replace every `/` so the title can stand in for a file name.
pub fn clean_title(title: &str) -> String {
    title.replace('/', "_")
}

/// Reduce a `TRCK` value like `"3/12"` to a two-digit track number (`"03"`).
///
/// Longer numbers are kept as-is.
pub fn track_number(raw: &str) -> String {
    let number = raw.split('/').next().unwrap_or_default().trim();
    format!("{number:0>2}")
}
