//! Playback controller, its session state and the progress monitor.
//!
//! `PlaybackController` is the command surface a front end binds to. It owns
//! the playlist and the audio engine behind one lock. While a track plays, a
//! `ProgressMonitor` thread samples the engine position and publishes
//! `PlayerEvent`s to every subscriber.

mod controller;
mod error;
mod monitor;
mod types;

pub use controller::PlaybackController;
pub use error::PlayerError;
pub use types::{PlaybackState, PlayerEvent, PlayerOptions, PlaylistEntry, Progress, Snapshot};

#[cfg(test)]
pub(crate) mod testing;
