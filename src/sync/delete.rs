use std::collections::HashMap;

use log::debug;

use super::index::for_each_song;
use crate::error::Result;
use crate::progress::Console;
use crate::rating::Stars;
use crate::subsonic::MusicServer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Number of songs whose rating was reset.
    pub cleared: usize,
    /// Rating each cleared song had before, by song id. Kept for this run only.
    pub previous: HashMap<String, u8>,
}

/// Reset every positive user rating on the server to zero.
///
/// Songs without a rating, or already at zero, are left alone.
pub fn clear_ratings<S>(server: &S, console: &Console) -> Result<DeleteReport>
where
    S: MusicServer + ?Sized,
{
    let spinner = console.spinner("Deleted user ratings: 0");
    let mut report = DeleteReport::default();

    for_each_song(
        server,
        |name| debug!("clearing ratings under index {name}"),
        |song| {
            let Some(rating) = song.user_rating.filter(|r| *r > 0) else {
                return Ok(());
            };

            debug!("clearing {rating} on {} ({} / {})", song.id, song.album, song.title);
            report.previous.insert(song.id.clone(), rating);
            server.set_rating(&song.id, Stars::NONE)?;
            report.cleared += 1;
            spinner.set_message(format!("Deleted user ratings: {}", report.cleared));
            Ok(())
        },
    )?;

    spinner.finish_and_clear();
    Ok(report)
}
