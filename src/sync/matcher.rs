use std::path::PathBuf;

use super::index::RemoteIndex;
use crate::library::PathKey;
use crate::rating::Stars;

/// A local file that carries a rating and enough tags to build its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRating {
    pub path: PathBuf,
    pub key: PathKey,
    pub stars: Stars,
}

/// A local rating paired with the server song it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    pub local: LocalRating,
    pub song_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pairing {
    Matched(Matched),
    /// No server song has this key.
    Unmatched(LocalRating),
}

impl Pairing {
    pub fn local(&self) -> &LocalRating {
        match self {
            Pairing::Matched(matched) => &matched.local,
            Pairing::Unmatched(local) => local,
        }
    }
}

/// Pair every local rating with a server song by key, one entry per rating,
/// in input order.
pub fn join(local: Vec<LocalRating>, remote: &RemoteIndex) -> Vec<Pairing> {
    local
        .into_iter()
        .map(|rating| match remote.get(&rating.key) {
            Some(id) => Pairing::Matched(Matched {
                song_id: id.to_string(),
                local: rating,
            }),
            None => Pairing::Unmatched(rating),
        })
        .collect()
}
