use std::path::Path;

use super::types::{EngineError, MetadataError};

/// Decode + output service driven by the playback controller.
///
/// Calls are expected to return quickly; the controller issues them while
/// holding its session lock. Position is reported in seconds from the start
/// of the loaded track.
pub trait AudioEngine: Send {
    /// Replace whatever is loaded with `path`, paused at position zero.
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;
    /// Start the loaded track.
    fn play(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Stop and unload.
    fn stop(&mut self);
    /// `volume` is already clamped to `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);
    fn seek(&mut self, seconds: f64) -> Result<(), EngineError>;
    fn position_seconds(&self) -> f64;
    /// `true` while the loaded track still has audio left to play.
    fn is_busy(&self) -> bool;
}

/// Reads the total duration of a media file.
pub trait MetadataReader: Send {
    fn duration_seconds(&self, path: &Path) -> Result<f64, MetadataError>;
}
