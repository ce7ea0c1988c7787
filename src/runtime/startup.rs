use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{LibrarySettings, LogSettings, Settings};
use crate::library;
use crate::player::{PlaybackController, PlayerOptions};

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn player_options(settings: &Settings) -> PlayerOptions {
    PlayerOptions {
        tick: Duration::from_millis(settings.progress.tick_ms.max(1)),
        initial_volume: settings.audio.initial_volume,
    }
}

/// Expand each path and append the results. Returns the number of tracks added.
pub fn add_paths<P: AsRef<Path>>(
    player: &PlaybackController,
    paths: &[P],
    library: &LibrarySettings,
) -> usize {
    let mut added = 0;
    for path in paths {
        let path = path.as_ref();
        let tracks = library::expand(path, library);
        if tracks.is_empty() {
            warn!(path = %path.display(), "no playable files");
            continue;
        }
        added += tracks.len();
        for track in tracks {
            player.add(track);
        }
    }
    info!(added, "playlist loaded");
    added
}
