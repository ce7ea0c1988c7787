//! Ordered playlist with a movable cursor.
//!
//! The playlist is a doubly linked list whose nodes live in an arena keyed
//! by `TrackId`. Links are ids, never references, so unlinking a node cannot
//! leave anything dangling.

mod arena;
mod id;

pub use arena::{Iter, Playlist};
pub use id::{ParseTrackIdError, TrackId};

#[cfg(test)]
mod tests;
