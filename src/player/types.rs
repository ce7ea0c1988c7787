use std::path::PathBuf;
use std::time::Duration;

use crate::playlist::TrackId;

/// The playback state of the controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// One progress sample for the loaded track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub track: TrackId,
    /// Seconds since the start of the track.
    pub elapsed: f64,
    /// Seconds left, when the duration is known.
    pub remaining: Option<f64>,
    /// Elapsed as a fraction of the duration in `[0.0, 1.0]`, when known.
    pub position: Option<f64>,
}

impl Progress {
    pub(crate) fn new(track: TrackId, elapsed: f64, duration: Option<f64>) -> Self {
        let elapsed = elapsed.max(0.0);
        match duration {
            Some(total) if total > 0.0 => {
                let elapsed = elapsed.min(total);
                Self {
                    track,
                    elapsed,
                    remaining: Some(total - elapsed),
                    position: Some(elapsed / total),
                }
            }
            _ => Self {
                track,
                elapsed,
                remaining: None,
                position: None,
            },
        }
    }

    pub fn total(&self) -> Option<f64> {
        self.remaining.map(|r| self.elapsed + r)
    }
}

/// Events published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Progress(Progress),
    StateChanged(PlaybackState),
    /// The loaded track changed; `None` once playback stops.
    TrackChanged(Option<TrackId>),
    /// Entries were added or removed.
    PlaylistChanged,
    /// A recoverable problem nobody is waiting on a `Result` for.
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: TrackId,
    pub name: String,
    pub path: PathBuf,
}

/// Read-only view of the controller for a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tracks: Vec<PlaylistEntry>,
    pub current: Option<TrackId>,
    pub state: PlaybackState,
    pub volume: f64,
    pub elapsed: Option<f64>,
    pub duration: Option<f64>,
}

impl Snapshot {
    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        let id = self.current?;
        self.tracks.iter().find(|e| e.id == id)
    }
}

/// Tunables for [`PlaybackController`](super::PlaybackController).
#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    /// Interval between progress samples.
    pub tick: Duration,
    pub initial_volume: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            initial_volume: 0.5,
        }
    }
}
