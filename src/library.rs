//! Local side of the sync: finding files and reading their tags.

mod model;
mod scan;
mod tags;

pub use model::PathKey;
#[cfg(test)]
pub use model::TrackTags;
pub use scan::scan;
pub use tags::{Id3TagReader, TagReader};
