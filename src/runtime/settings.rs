use crate::config::Settings;

/// Effective settings, plus why the defaults were used instead of the file.
pub struct LoadedSettings {
    pub settings: Settings,
    pub fallback: Option<String>,
}

/// Load and validate settings. Never fails: a broken file or an invalid value
/// means defaults, with the reason kept for logging once a subscriber exists.
pub fn load_settings() -> LoadedSettings {
    let (settings, fallback) = match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (Settings::default(), Some(format!("invalid config: {msg}"))),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("failed to load config: {e}")),
        ),
    };
    LoadedSettings { settings, fallback }
}
