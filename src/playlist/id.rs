use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Opaque handle for one playlist entry.
///
/// Ids are handed out by the playlist on `add` and never reused, so two
/// entries for the same file are still distinguishable. They render as `#N`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u64);

impl TrackId {
    pub(super) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a track id: {0:?} (expected #N)")]
pub struct ParseTrackIdError(String);

impl FromStr for TrackId {
    type Err = ParseTrackIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix('#')
            .and_then(|n| n.parse::<u64>().ok())
            .map(TrackId)
            .ok_or_else(|| ParseTrackIdError(s.to_string()))
    }
}
