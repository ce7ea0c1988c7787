use crate::config::{TimeField, UiSettings};
use crate::player::{PlaybackState, Progress};

/// `m:ss`, minutes unpadded. Negative and non-finite input renders as `0:00`.
pub fn format_mmss(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the progress text according to `ui` settings.
///
/// Fields that need the duration are skipped when it is unknown. Returns
/// `None` when no field could be rendered.
pub fn time_text(elapsed: f64, total: Option<f64>, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_mmss((t - elapsed).max(0.0))));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.time_separator))
    }
}

pub fn progress_text(p: &Progress, ui: &UiSettings) -> Option<String> {
    time_text(p.elapsed, p.total(), ui)
}

pub fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "stopped",
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
    }
}
