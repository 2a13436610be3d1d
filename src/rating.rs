//! Conversion between the ID3 popularimeter scale and Subsonic stars.
//!
//! `POPM` stores a byte where `0` means "unrated" and `1..=255` spans
//! worst to best. Subsonic expects `0..=5`, where `0` clears the rating.

use std::fmt;

/// A Subsonic user rating, always within `0..=5`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stars(u8);

impl Stars {
    pub const NONE: Stars = Stars(0);

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a popularimeter byte onto five stars.
///
/// `0` stays unrated, `1..=255` is spread linearly over `1..=5` and rounded
/// half away from zero.
pub fn to_stars(popm: u8) -> Stars {
    if popm == 0 {
        return Stars::NONE;
    }
    let scaled = 1.0 + f64::from(popm - 1) * 4.0 / 254.0;
    Stars(scaled.round() as u8)
}
