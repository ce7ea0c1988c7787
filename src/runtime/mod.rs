use std::env;
use std::io::{self, Write};
use std::sync::mpsc;

use tracing::{info, warn};

use crate::audio::{LoftyMetadata, RodioEngine};
use crate::player::PlaybackController;

mod command;
mod event_loop;
mod format;
mod settings;
mod startup;

pub use command::{CommandError, ControlCmd, TrackRef};
pub use format::format_mmss;

const USAGE: &str = "\
usage: cadenza [--print-config] [PATH...]

Plays the given files and directories. Commands are read from stdin;
type `help` for the list.";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }

    let settings::LoadedSettings { settings, fallback } = settings::load_settings();

    if args.iter().any(|a| a == "--print-config") {
        if let Some(reason) = &fallback {
            eprintln!("cadenza: {reason}");
        }
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    startup::init_logging(&settings.log);
    if let Some(reason) = fallback {
        warn!(%reason, "using default settings");
    }

    let paths: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();
    let engine = RodioEngine::open_default()?;
    let player = PlaybackController::new(engine, LoftyMetadata, startup::player_options(&settings));
    let events = player.subscribe();
    startup::add_paths(&player, &paths, &settings.library);

    let (control_tx, control_rx) = mpsc::channel();
    command::spawn_stdin_reader(control_tx);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "cadenza: {} track(s), type `help` for commands", player.snapshot().tracks.len())?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut out,
        &settings,
        &player,
        &control_rx,
        &events,
        &mut state,
    );

    player.shutdown();
    info!("bye");

    run_result.map_err(Into::into)
}
