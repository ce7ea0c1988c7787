use std::path::Path;

/// Build the display name for a track from its path.
///
/// This is the file name (extension included) when there is one, and the
/// whole path otherwise, so `/music/a.mp3` and `/other/a.mp3` both render as
/// `a.mp3`. Names are for display and lookup convenience only; identity is
/// carried by the playlist's `TrackId`.
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) if !name.is_empty() => name.to_string_lossy().into_owned(),
        _ => path.display().to_string(),
    }
}
