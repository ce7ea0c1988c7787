//! Error types reported by the audio engine and the metadata reader.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by an [`AudioEngine`](super::AudioEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("no track loaded")]
    NotLoaded,
}

/// Failures raised by a [`MetadataReader`](super::MetadataReader).
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("{} reports no duration", .path.display())]
    NoDuration { path: PathBuf },
}
