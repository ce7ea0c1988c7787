//! Helper that opens and decodes a file into a paused `rodio` sink.

use std::fs::File;
use std::path::Path;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink};

use super::types::EngineError;

/// Create a paused `Sink` on `mixer` with the decoded contents of `path`.
pub(super) fn create_sink(mixer: &Mixer, path: &Path, volume: f32) -> Result<Sink, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // `try_from(File)` records the byte length so the decoder can seek.
    let source = Decoder::try_from(file).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(mixer);
    sink.pause();
    sink.set_volume(volume);
    sink.append(source);
    Ok(sink)
}
