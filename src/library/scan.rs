use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

/// Lower-cased extensions from the settings, without leading dots.
struct ExtensionFilter(Vec<String>);

impl ExtensionFilter {
    fn new(settings: &LibrarySettings) -> Self {
        Self(
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return false;
        };
        self.0.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Turn a user-supplied path into tracks.
///
/// A file is taken as-is (the engine decides whether it can play it). A
/// directory is walked and every audio file beneath it is returned, ordered
/// case-insensitively by path so repeated adds are stable. Missing paths yield
/// nothing.
pub fn expand(path: &Path, settings: &LibrarySettings) -> Vec<Track> {
    if path.is_file() {
        return vec![Track::from_path(path)];
    }
    if !path.is_dir() {
        warn!(path = %path.display(), "path does not exist, skipping");
        return Vec::new();
    }

    let audio = ExtensionFilter::new(settings);
    let mut walker = WalkDir::new(path).follow_links(settings.follow_links);
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| audio.matches(e.path()))
        .map(|e| Track::from_path(e.into_path()))
        .collect();

    tracks.sort_by_key(|t| t.path.to_string_lossy().to_lowercase());
    debug!(dir = %path.display(), found = tracks.len(), "expanded directory");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extension_filter_normalizes_configured_extensions() {
        let settings = LibrarySettings {
            extensions: vec![".MP3".into(), " flac ".into(), "".into()],
            ..LibrarySettings::default()
        };
        let audio = ExtensionFilter::new(&settings);
        assert_eq!(audio.0, vec!["mp3".to_string(), "flac".to_string()]);
        assert!(audio.matches(Path::new("/tmp/a.mp3")));
        assert!(audio.matches(Path::new("/tmp/a.Flac")));
        assert!(!audio.matches(Path::new("/tmp/a.ogg")));
        assert!(!audio.matches(Path::new("/tmp/mp3")));
    }

    #[test]
    fn expand_directory_filters_non_audio_and_sorts_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = expand(dir.path(), &LibrarySettings::default());
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A.ogg", "b.MP3"]);
    }

    #[test]
    fn expand_single_file_skips_extension_filter() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("notes.txt");
        fs::write(&p, b"whatever").unwrap();

        let tracks = expand(&p, &LibrarySettings::default());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].path, p);
    }

    #[test]
    fn expand_missing_path_is_empty() {
        let dir = tempdir().unwrap();
        assert!(expand(&dir.path().join("nope"), &LibrarySettings::default()).is_empty());
    }

    #[test]
    fn expand_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let tracks = expand(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "visible.mp3");
    }

    #[test]
    fn expand_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let tracks = expand(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "root.mp3");
    }

    #[test]
    fn expand_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2.
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let names: Vec<String> = expand(dir.path(), &settings)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert!(names.contains(&"root.mp3".to_string()));
        assert!(names.contains(&"one.mp3".to_string()));
        assert!(!names.contains(&"two.mp3".to_string()));
    }
}
