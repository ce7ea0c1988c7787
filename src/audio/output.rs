use std::path::Path;
use std::time::Duration;

use rodio::Sink;
use rodio::mixer::Mixer;
use tracing::debug;

use super::engine::AudioEngine;
use super::sink::create_sink;
use super::thread::OutputThread;
use super::types::EngineError;

/// [`AudioEngine`] that plays files through a `rodio` mixer.
///
/// One sink holds the loaded track; loading replaces it.
pub struct RodioEngine {
    mixer: Mixer,
    sink: Option<Sink>,
    volume: f32,
    // Dropped last so the stream outlives the sink.
    _output: Option<OutputThread>,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, EngineError> {
        let (output, mixer) = OutputThread::spawn()?;
        Ok(Self {
            mixer,
            sink: None,
            volume: 1.0,
            _output: Some(output),
        })
    }

    /// Play into an existing mixer. Nothing is heard unless the mixer's
    /// source is consumed by an output, and `seek` on a loaded track blocks
    /// until it is.
    #[cfg(test)]
    pub(crate) fn with_mixer(mixer: Mixer) -> Self {
        Self {
            mixer,
            sink: None,
            volume: 1.0,
            _output: None,
        }
    }

    fn sink(&self) -> Result<&Sink, EngineError> {
        self.sink.as_ref().ok_or(EngineError::NotLoaded)
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        self.stop();
        let sink = create_sink(&self.mixer, path, self.volume)?;
        debug!(path = %path.display(), "loaded");
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.sink()?.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = &self.sink {
            s.set_volume(volume);
        }
    }

    fn seek(&mut self, seconds: f64) -> Result<(), EngineError> {
        let target = Duration::try_from_secs_f64(seconds.max(0.0))
            .map_err(|e| EngineError::Seek(e.to_string()))?;
        self.sink()?
            .try_seek(target)
            .map_err(|e| EngineError::Seek(e.to_string()))
    }

    fn position_seconds(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |s| s.get_pos().as_secs_f64())
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
