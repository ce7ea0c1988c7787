use thiserror::Error;

use crate::audio::{EngineError, MetadataError};
use crate::playlist::TrackId;

/// Recoverable playback errors. Every variant is meant to be shown to the
/// user as a notice; none of them leaves the controller in a bad state.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("the playlist is empty")]
    EmptyPlaylist,

    #[error("no track {0} in the playlist")]
    NotFound(TrackId),

    #[error("no track named {0:?} in the playlist")]
    NameNotFound(String),

    #[error("already at the last track")]
    NoNextTrack,

    #[error("already at the first track")]
    NoPreviousTrack,

    #[error("nothing is loaded")]
    NothingLoaded,

    #[error("could not load {name}: {source}")]
    TrackLoadFailed {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error("duration of {name} is unavailable: {source}")]
    DurationUnavailable {
        name: String,
        #[source]
        source: MetadataError,
    },

    #[error("playback engine error: {0}")]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
