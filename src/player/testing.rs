//! Scripted engine and metadata reader for controller tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::audio::{AudioEngine, EngineError, MetadataError, MetadataReader};

#[derive(Debug, Default)]
pub(crate) struct FakeEngineState {
    pub loads: Vec<PathBuf>,
    pub loaded: Option<PathBuf>,
    pub playing: bool,
    pub position: f64,
    /// When set, `is_busy` reports `false` even with a track loaded.
    pub drained: bool,
    pub volume: f32,
    pub seeks: Vec<f64>,
    pub resumes: usize,
    pub reject: HashSet<PathBuf>,
}

/// Shared view into a [`FakeEngine`] that tests keep after handing the
/// engine to a controller.
#[derive(Clone, Default)]
pub(crate) struct FakeHandle(Arc<Mutex<FakeEngineState>>);

impl FakeHandle {
    pub fn state(&self) -> MutexGuard<'_, FakeEngineState> {
        self.0.lock().unwrap()
    }

    pub fn set_position(&self, secs: f64) {
        self.state().position = secs;
    }

    pub fn load_count(&self) -> usize {
        self.state().loads.len()
    }

    pub fn reject(&self, path: impl Into<PathBuf>) {
        self.state().reject.insert(path.into());
    }
}

pub(crate) struct FakeEngine(FakeHandle);

impl FakeEngine {
    pub fn new() -> (Self, FakeHandle) {
        let handle = FakeHandle::default();
        (Self(handle.clone()), handle)
    }
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut s = self.0.state();
        s.loads.push(path.to_path_buf());
        if s.reject.contains(path) {
            s.loaded = None;
            return Err(EngineError::Decode {
                path: path.to_path_buf(),
                reason: "unsupported".to_string(),
            });
        }
        s.loaded = Some(path.to_path_buf());
        s.playing = false;
        s.position = 0.0;
        s.drained = false;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let mut s = self.0.state();
        if s.loaded.is_none() {
            return Err(EngineError::NotLoaded);
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.state().playing = false;
    }

    fn resume(&mut self) {
        let mut s = self.0.state();
        s.playing = true;
        s.resumes += 1;
    }

    fn stop(&mut self) {
        let mut s = self.0.state();
        s.loaded = None;
        s.playing = false;
        s.position = 0.0;
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.state().volume = volume;
    }

    fn seek(&mut self, seconds: f64) -> Result<(), EngineError> {
        let mut s = self.0.state();
        if s.loaded.is_none() {
            return Err(EngineError::NotLoaded);
        }
        s.seeks.push(seconds);
        s.position = seconds;
        Ok(())
    }

    fn position_seconds(&self) -> f64 {
        self.0.state().position
    }

    fn is_busy(&self) -> bool {
        let s = self.0.state();
        s.loaded.is_some() && !s.drained
    }
}

/// Durations keyed by path; unknown paths have no duration.
#[derive(Default)]
pub(crate) struct FakeMetadata(HashMap<PathBuf, f64>);

impl FakeMetadata {
    pub fn with(mut self, path: impl Into<PathBuf>, secs: f64) -> Self {
        self.0.insert(path.into(), secs);
        self
    }
}

impl MetadataReader for FakeMetadata {
    fn duration_seconds(&self, path: &Path) -> Result<f64, MetadataError> {
        self.0
            .get(path)
            .copied()
            .ok_or_else(|| MetadataError::NoDuration {
                path: path.to_path_buf(),
            })
    }
}

/// Poll `cond` until it holds or two seconds pass.
pub(crate) fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
