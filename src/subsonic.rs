//! Subsonic server access.
//!
//! Everything the sync needs from a server is behind [`MusicServer`], so the
//! driver can run against [`SubsonicClient`] or an in-memory double.

mod client;
mod model;

pub use client::SubsonicClient;
pub use model::{Album, Artist, Index, Song};
#[cfg(test)]
pub use model::{AlbumRef, ArtistRef};

use crate::error::Result;
use crate::rating::Stars;

/// The browse and rate calls of the Subsonic API used by the sync.
///
/// Every call blocks until the server answers. A failure is returned as is;
/// callers decide whether to abort.
pub trait MusicServer {
    /// All index letters with their artists (`getIndexes`).
    fn indexes(&self) -> Result<Vec<Index>>;
    /// One artist with its albums (`getArtist`).
    fn artist(&self, id: &str) -> Result<Artist>;
    /// One album with its songs (`getAlbum`).
    fn album(&self, id: &str) -> Result<Album>;
    /// Set the user rating of a song (`setRating`). `Stars::NONE` clears it.
    fn set_rating(&self, id: &str, rating: Stars) -> Result<()>;
}
