//! Matching local ratings to server songs and pushing them.
//!
//! The run is split in small steps so each can be tested on its own:
//! `index` builds the server side key space, `matcher` joins it with the
//! local ratings, `driver` sequences a run and `delete` wipes ratings.

mod delete;
mod driver;
mod index;
mod matcher;

pub use driver::{Outcome, SyncDriver};

#[cfg(test)]
mod tests;
