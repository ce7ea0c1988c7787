use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::debug;

use crate::config;
use crate::library;
use crate::player::{PlaybackController, PlayerError, PlayerEvent};
use crate::playlist::TrackId;

use super::command::{CommandError, ControlCmd, HELP, TrackRef};
use super::format::{progress_text, state_label, time_text};

/// How long the loop waits for a command before draining player events again.
const POLL: Duration = Duration::from_millis(50);

/// State tracked by the control loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Last progress line printed; a new one is only printed when the text changes.
    last_progress: Option<String>,
}

/// Execute commands and print player events until `quit`, end of input, or the
/// command channel closing.
pub fn run(
    out: &mut impl Write,
    settings: &config::Settings,
    player: &PlaybackController,
    commands: &Receiver<Result<ControlCmd, CommandError>>,
    events: &Receiver<PlayerEvent>,
    state: &mut EventLoopState,
) -> io::Result<()> {
    loop {
        for event in events.try_iter() {
            print_event(out, &event, settings, player, state)?;
        }
        out.flush()?;

        match commands.recv_timeout(POLL) {
            Ok(Ok(cmd)) => {
                debug!(?cmd, "command");
                if handle_control_cmd(out, cmd, settings, player)? {
                    break;
                }
            }
            Ok(Err(e)) => writeln!(out, "! {e}")?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    out.flush()
}

fn track_name(player: &PlaybackController, id: TrackId) -> String {
    player
        .snapshot()
        .tracks
        .into_iter()
        .find(|e| e.id == id)
        .map(|e| e.name)
        .unwrap_or_else(|| id.to_string())
}

pub fn print_event(
    out: &mut impl Write,
    event: &PlayerEvent,
    settings: &config::Settings,
    player: &PlaybackController,
    state: &mut EventLoopState,
) -> io::Result<()> {
    match event {
        PlayerEvent::Progress(p) => {
            if !settings.ui.print_progress {
                return Ok(());
            }
            let Some(text) = progress_text(p, &settings.ui) else {
                return Ok(());
            };
            if state.last_progress.as_deref() != Some(text.as_str()) {
                writeln!(out, "  {text}")?;
                state.last_progress = Some(text);
            }
        }
        PlayerEvent::TrackChanged(Some(id)) => {
            state.last_progress = None;
            writeln!(out, "> {} {}", id, track_name(player, *id))?;
        }
        PlayerEvent::TrackChanged(None) => state.last_progress = None,
        PlayerEvent::StateChanged(s) => writeln!(out, "[{}]", state_label(*s))?,
        PlayerEvent::PlaylistChanged => {}
        PlayerEvent::Notice(msg) => writeln!(out, "! {msg}")?,
    }
    Ok(())
}

fn resolve(player: &PlaybackController, r: TrackRef) -> Result<TrackId, PlayerError> {
    match r {
        TrackRef::Id(id) => Ok(id),
        TrackRef::Name(name) => player.find_by_name(&name),
    }
}

fn report<T>(out: &mut impl Write, result: Result<T, PlayerError>) -> io::Result<()> {
    if let Err(e) = result {
        writeln!(out, "! {e}")?;
    }
    Ok(())
}

/// Run one command. Returns `Ok(true)` when the loop should exit.
pub fn handle_control_cmd(
    out: &mut impl Write,
    cmd: ControlCmd,
    settings: &config::Settings,
    player: &PlaybackController,
) -> io::Result<bool> {
    match cmd {
        ControlCmd::Quit => return Ok(true),
        ControlCmd::Add(path) => {
            let tracks = library::expand(&path, &settings.library);
            if tracks.is_empty() {
                writeln!(out, "! no playable files at {}", path.display())?;
            } else {
                let n = tracks.len();
                for track in tracks {
                    player.add(track);
                }
                writeln!(out, "added {n} track(s)")?;
            }
        }
        ControlCmd::Delete(r) => {
            let removed = resolve(player, r).and_then(|id| player.delete_track(id));
            match removed {
                Ok(track) => writeln!(out, "removed {}", track.name)?,
                Err(e) => writeln!(out, "! {e}")?,
            }
        }
        ControlCmd::Select(r) => {
            report(out, resolve(player, r).and_then(|id| player.select_track(id)))?;
        }
        ControlCmd::Play => report(out, player.play())?,
        ControlCmd::Pause => player.pause(),
        ControlCmd::Toggle => report(out, player.toggle())?,
        ControlCmd::Stop => player.stop(),
        ControlCmd::Next => report(out, player.next())?,
        ControlCmd::Prev => report(out, player.previous())?,
        ControlCmd::Seek(secs) => report(out, player.seek(secs))?,
        ControlCmd::Forward(secs) => report(out, player.seek_by(secs))?,
        ControlCmd::Rewind(secs) => report(out, player.seek_by(-secs))?,
        ControlCmd::Volume(level) => {
            let applied = player.set_volume(level);
            writeln!(out, "volume {:.0}%", applied * 100.0)?;
        }
        ControlCmd::List => {
            let snap = player.snapshot();
            if snap.tracks.is_empty() {
                writeln!(out, "(empty playlist)")?;
            }
            for entry in &snap.tracks {
                let marker = if snap.current == Some(entry.id) { '*' } else { ' ' };
                writeln!(out, "{marker} {} {}", entry.id, entry.name)?;
            }
        }
        ControlCmd::Status => {
            let snap = player.snapshot();
            let label = state_label(snap.state);
            match snap.current_entry() {
                Some(entry) => {
                    let time = snap
                        .elapsed
                        .and_then(|e| time_text(e, snap.duration, &settings.ui))
                        .map(|t| format!(" {t}"))
                        .unwrap_or_default();
                    writeln!(out, "[{label}] {} {}{time}", entry.id, entry.name)?;
                }
                None => writeln!(out, "[{label}]")?,
            }
            writeln!(
                out,
                "volume {:.0}%, {} track(s)",
                snap.volume * 100.0,
                snap.tracks.len()
            )?;
        }
        ControlCmd::Help => writeln!(out, "{HELP}")?,
    }

    Ok(false)
}
