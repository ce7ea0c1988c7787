use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, MetadataReader};
use crate::library::Track;
use crate::playlist::{Playlist, TrackId};

use super::error::{PlayerError, Result};
use super::monitor::ProgressMonitor;
use super::types::{PlaybackState, PlayerEvent, PlayerOptions, PlaylistEntry, Progress, Snapshot};

/// The loaded track. Exists only between a successful load and the next stop.
#[derive(Debug, Clone, Copy)]
struct Session {
    track: TrackId,
    generation: u64,
    duration: Option<f64>,
    paused: bool,
}

/// Outcome of one monitor tick.
pub(super) enum Sample {
    Continue,
    /// The track reached its end; the caller should auto-advance.
    Finished,
    /// The session this monitor was started for is gone.
    Stale,
}

/// Everything the control path and the monitor share, behind one mutex.
pub(super) struct Core {
    this: Weak<Mutex<Core>>,
    playlist: Playlist,
    engine: Box<dyn AudioEngine>,
    metadata: Box<dyn MetadataReader>,
    session: Option<Session>,
    generation: u64,
    volume: f64,
    tick: Duration,
    monitor: Option<ProgressMonitor>,
    subscribers: Vec<Sender<PlayerEvent>>,
}

pub(super) fn lock(core: &Mutex<Core>) -> MutexGuard<'_, Core> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

fn clamp_volume(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

impl Core {
    fn state(&self) -> PlaybackState {
        match self.session {
            None => PlaybackState::Idle,
            Some(Session { paused: true, .. }) => PlaybackState::Paused,
            Some(_) => PlaybackState::Playing,
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn start_monitor(&mut self, generation: u64) {
        self.cancel_monitor();
        self.monitor = Some(ProgressMonitor::spawn(
            self.this.clone(),
            generation,
            self.tick,
        ));
    }

    fn cancel_monitor(&mut self) {
        if let Some(m) = self.monitor.take() {
            m.cancel();
        }
    }

    /// Stop the engine and drop the session. Returns `false` if nothing was loaded.
    fn end_session(&mut self) -> bool {
        self.cancel_monitor();
        let Some(session) = self.session.take() else {
            return false;
        };
        self.engine.stop();
        debug!(track = %session.track, generation = session.generation, "session ended");
        self.emit(PlayerEvent::TrackChanged(None));
        self.emit(PlayerEvent::StateChanged(PlaybackState::Idle));
        true
    }

    /// Load the cursor's track and start it, replacing any current session.
    fn load_current(&mut self) -> Result<()> {
        let (Some(id), Some(track)) = (self.playlist.current(), self.playlist.current_track())
        else {
            return Err(PlayerError::EmptyPlaylist);
        };
        let track = track.clone();

        self.end_session();

        if let Err(source) = self.engine.load(&track.path) {
            warn!(track = %track.name, error = %source, "engine rejected track");
            return Err(PlayerError::TrackLoadFailed {
                name: track.name,
                source,
            });
        }
        self.engine.set_volume(self.volume as f32);

        let duration = match self.metadata.duration_seconds(&track.path) {
            Ok(d) => Some(d),
            Err(source) => {
                let err = PlayerError::DurationUnavailable {
                    name: track.name.clone(),
                    source,
                };
                warn!(%err, "progress limited to elapsed time");
                self.emit(PlayerEvent::Notice(err.to_string()));
                None
            }
        };

        if let Err(source) = self.engine.play() {
            self.engine.stop();
            warn!(track = %track.name, error = %source, "engine failed to start track");
            return Err(PlayerError::TrackLoadFailed {
                name: track.name,
                source,
            });
        }

        self.generation += 1;
        let generation = self.generation;
        self.session = Some(Session {
            track: id,
            generation,
            duration,
            paused: false,
        });
        self.start_monitor(generation);

        info!(track = %track.name, id = %id, ?duration, "playing");
        self.emit(PlayerEvent::TrackChanged(Some(id)));
        self.emit(PlayerEvent::StateChanged(PlaybackState::Playing));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return self.load_current();
        };
        if !session.paused {
            return Ok(());
        }
        session.paused = false;
        let generation = session.generation;

        self.engine.resume();
        self.start_monitor(generation);
        debug!(generation, "resumed");
        self.emit(PlayerEvent::StateChanged(PlaybackState::Playing));
        Ok(())
    }

    fn pause(&mut self) {
        let Some(session) = self.session.as_mut().filter(|s| !s.paused) else {
            return;
        };
        session.paused = true;
        let generation = session.generation;

        self.cancel_monitor();
        self.engine.pause();
        debug!(generation, "paused");
        self.emit(PlayerEvent::StateChanged(PlaybackState::Paused));
    }

    fn skip(&mut self, forward: bool) -> Result<TrackId> {
        let moved = if forward {
            self.playlist.advance()
        } else {
            self.playlist.retreat()
        };
        let Some(id) = moved else {
            return Err(if forward {
                PlayerError::NoNextTrack
            } else {
                PlayerError::NoPreviousTrack
            });
        };

        self.end_session();
        self.load_current()?;
        Ok(id)
    }

    fn select(&mut self, id: TrackId) -> Result<()> {
        if !self.playlist.select(id) {
            return Err(PlayerError::NotFound(id));
        }
        self.end_session();
        self.load_current()
    }

    fn seek(&mut self, seconds: f64) -> Result<f64> {
        let Some(Session {
            track, duration, ..
        }) = self.session
        else {
            return Err(PlayerError::NothingLoaded);
        };

        let mut target = if seconds.is_nan() { 0.0 } else { seconds.max(0.0) };
        if let Some(total) = duration {
            target = target.min(total);
        }

        self.engine.seek(target)?;
        debug!(requested = seconds, target, "seek");
        self.emit(PlayerEvent::Progress(Progress::new(track, target, duration)));
        Ok(target)
    }

    fn delete(&mut self, id: TrackId) -> Result<Track> {
        if self.session.is_some_and(|s| s.track == id) {
            info!(id = %id, "deleting the loaded track, stopping playback");
            self.end_session();
        }
        let track = self.playlist.delete(id).ok_or(PlayerError::NotFound(id))?;
        self.emit(PlayerEvent::PlaylistChanged);
        Ok(track)
    }

    /// Publish one progress sample for `generation`, if it is still current.
    pub(super) fn sample(&mut self, generation: u64) -> Sample {
        let Some(session) = self.session.filter(|s| s.generation == generation && !s.paused)
        else {
            return Sample::Stale;
        };

        let elapsed = self.engine.position_seconds();
        let busy = self.engine.is_busy();
        let progress = Progress::new(session.track, elapsed, session.duration);
        self.emit(PlayerEvent::Progress(progress));

        let reached_end = session.duration.is_some_and(|total| elapsed >= total);
        if reached_end || !busy {
            Sample::Finished
        } else {
            Sample::Continue
        }
    }

    /// Auto-advance after the track of `generation` finished.
    pub(super) fn finish_track(&mut self, generation: u64) {
        if !self.session.is_some_and(|s| s.generation == generation) {
            return;
        }
        match self.skip(true) {
            Ok(id) => debug!(next = %id, "auto-advanced"),
            Err(PlayerError::NoNextTrack) => {
                info!("end of playlist");
                self.end_session();
            }
            Err(err) => {
                warn!(%err, "auto-advance failed");
                self.emit(PlayerEvent::Notice(err.to_string()));
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            tracks: self
                .playlist
                .iter()
                .map(|(id, t)| PlaylistEntry {
                    id,
                    name: t.name.clone(),
                    path: t.path.clone(),
                })
                .collect(),
            current: self.playlist.current(),
            state: self.state(),
            volume: self.volume,
            elapsed: self.session.map(|_| self.engine.position_seconds()),
            duration: self.session.and_then(|s| s.duration),
        }
    }
}

/// Command surface for a front end.
///
/// Every method takes the controller lock for its whole duration, so
/// commands are strictly serialized with each other and with progress
/// sampling. None of them block for longer than an engine call.
pub struct PlaybackController {
    core: Arc<Mutex<Core>>,
}

impl PlaybackController {
    pub fn new(
        engine: impl AudioEngine + 'static,
        metadata: impl MetadataReader + 'static,
        options: PlayerOptions,
    ) -> Self {
        let volume = clamp_volume(options.initial_volume);
        let core = Arc::new_cyclic(|this| {
            Mutex::new(Core {
                this: this.clone(),
                playlist: Playlist::new(),
                engine: Box::new(engine),
                metadata: Box::new(metadata),
                session: None,
                generation: 0,
                volume,
                tick: options.tick,
                monitor: None,
                subscribers: Vec::new(),
            })
        });
        lock(&core).engine.set_volume(volume as f32);
        Self { core }
    }

    fn lock(&self) -> MutexGuard<'_, Core> {
        lock(&self.core)
    }

    /// Append the file at `path`. Same path twice gives two entries.
    pub fn add_track(&self, path: impl Into<PathBuf>) -> TrackId {
        self.add(Track::from_path(path))
    }

    pub fn add(&self, track: Track) -> TrackId {
        let mut core = self.lock();
        debug!(track = %track.name, "added");
        let id = core.playlist.add(track);
        core.emit(PlayerEvent::PlaylistChanged);
        id
    }

    /// Remove an entry. Removing the loaded track stops playback first.
    pub fn delete_track(&self, id: TrackId) -> Result<Track> {
        self.lock().delete(id)
    }

    /// Select `id` and play it from the start.
    pub fn select_track(&self, id: TrackId) -> Result<()> {
        self.lock().select(id)
    }

    /// First entry named `name`, scanning from the head.
    pub fn find_by_name(&self, name: &str) -> Result<TrackId> {
        self.lock()
            .playlist
            .find_by_name(name)
            .ok_or_else(|| PlayerError::NameNotFound(name.to_string()))
    }

    /// Start the cursor's track, or resume if paused. No-op while playing.
    pub fn play(&self) -> Result<()> {
        self.lock().play()
    }

    /// Pause if playing. No-op otherwise.
    pub fn pause(&self) {
        self.lock().pause();
    }

    pub fn toggle(&self) -> Result<()> {
        let mut core = self.lock();
        match core.state() {
            PlaybackState::Playing => {
                core.pause();
                Ok(())
            }
            PlaybackState::Paused | PlaybackState::Idle => core.play(),
        }
    }

    /// Unload the current track. No-op when idle.
    pub fn stop(&self) {
        self.lock().end_session();
    }

    /// Move to the next entry and play it from the start.
    pub fn next(&self) -> Result<TrackId> {
        self.lock().skip(true)
    }

    /// Move to the previous entry and play it from the start.
    pub fn previous(&self) -> Result<TrackId> {
        self.lock().skip(false)
    }

    /// Jump to `seconds`, clamped to the track. Returns the position used.
    pub fn seek(&self, seconds: f64) -> Result<f64> {
        self.lock().seek(seconds)
    }

    /// Seek relative to the current position.
    pub fn seek_by(&self, delta: f64) -> Result<f64> {
        let mut core = self.lock();
        if core.session.is_none() {
            return Err(PlayerError::NothingLoaded);
        }
        let target = core.engine.position_seconds() + delta;
        core.seek(target)
    }

    /// Set the volume, clamped to `[0.0, 1.0]`. Returns the value applied.
    pub fn set_volume(&self, level: f64) -> f64 {
        let level = clamp_volume(level);
        let mut core = self.lock();
        core.volume = level;
        core.engine.set_volume(level as f32);
        level
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state()
    }

    pub fn current(&self) -> Option<TrackId> {
        self.lock().playlist.current()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Stop playback and wait for the progress monitor to exit.
    pub fn shutdown(&self) {
        let monitor = {
            let mut core = self.lock();
            let monitor = core.monitor.take();
            core.end_session();
            monitor
        };
        if let Some(m) = monitor {
            m.join();
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
