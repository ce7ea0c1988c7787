use std::io::{self, BufRead};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::Sender;
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::playlist::{ParseTrackIdError, TrackId};

/// Commands the control loop executes, one per input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    Add(PathBuf),
    Delete(TrackRef),
    Select(TrackRef),
    Play,
    Pause,
    Toggle,
    Stop,
    Next,
    Prev,
    Seek(f64),
    Forward(f64),
    Rewind(f64),
    Volume(f64),
    List,
    Status,
    Help,
    Quit,
}

/// A playlist entry as typed by the user: `#3` or a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackRef {
    Id(TrackId),
    Name(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("input line is not valid UTF-8")]
    InvalidUtf8,

    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{cmd}` takes no argument")]
    UnexpectedArgument { cmd: &'static str },

    #[error("`{cmd}` expects a number, got {value:?}")]
    BadNumber { cmd: &'static str, value: String },

    #[error(transparent)]
    BadId(#[from] ParseTrackIdError),
}

pub const HELP: &str = "\
commands:
  add <path>            add a file or directory
  delete <name|#id>     remove a track
  select <name|#id>     play a track from the start
  play | pause | toggle | stop
  next | prev
  seek <secs>           jump to a position
  ff <secs> | rew <secs>
  volume <0..1>
  list | status | help | quit";

impl FromStr for TrackRef {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('#') {
            Ok(TrackRef::Id(s.parse()?))
        } else {
            Ok(TrackRef::Name(s.to_string()))
        }
    }
}

fn number(cmd: &'static str, arg: Option<&str>) -> Result<f64, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument(cmd))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::BadNumber {
            cmd,
            value: value.to_string(),
        })
}

fn bare(cmd: &'static str, arg: Option<&str>, out: ControlCmd) -> Result<ControlCmd, CommandError> {
    match arg {
        None => Ok(out),
        Some(_) => Err(CommandError::UnexpectedArgument { cmd }),
    }
}

impl FromStr for ControlCmd {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((w, rest)) => (w, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        match word.to_ascii_lowercase().as_str() {
            "add" => arg
                .map(|p| ControlCmd::Add(PathBuf::from(p)))
                .ok_or(CommandError::MissingArgument("add")),
            "delete" | "rm" => Ok(ControlCmd::Delete(
                arg.ok_or(CommandError::MissingArgument("delete"))?.parse()?,
            )),
            "select" => Ok(ControlCmd::Select(
                arg.ok_or(CommandError::MissingArgument("select"))?.parse()?,
            )),
            "play" => bare("play", arg, ControlCmd::Play),
            "pause" => bare("pause", arg, ControlCmd::Pause),
            "toggle" => bare("toggle", arg, ControlCmd::Toggle),
            "stop" => bare("stop", arg, ControlCmd::Stop),
            "next" => bare("next", arg, ControlCmd::Next),
            "prev" | "previous" => bare("prev", arg, ControlCmd::Prev),
            "seek" => number("seek", arg).map(ControlCmd::Seek),
            "ff" => number("ff", arg).map(ControlCmd::Forward),
            "rew" => number("rew", arg).map(ControlCmd::Rewind),
            "volume" | "vol" => number("volume", arg).map(ControlCmd::Volume),
            "list" | "ls" => bare("list", arg, ControlCmd::List),
            "status" => bare("status", arg, ControlCmd::Status),
            "help" | "?" => bare("help", arg, ControlCmd::Help),
            "quit" | "exit" => bare("quit", arg, ControlCmd::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// Parse lines from `input` and send them until end of input, a read error,
/// or the receiver going away. End of input and read errors become `Quit`;
/// a line that is not UTF-8 is reported and skipped.
pub fn read_commands(mut input: impl BufRead, tx: &Sender<Result<ControlCmd, CommandError>>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "reading commands failed");
                break;
            }
        }
        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) => line.parse::<ControlCmd>(),
            Err(_) => Err(CommandError::InvalidUtf8),
        };
        if parsed == Err(CommandError::Empty) {
            continue;
        }
        if tx.send(parsed).is_err() {
            return;
        }
    }
    debug!("command input closed");
    let _ = tx.send(Ok(ControlCmd::Quit));
}

/// Read commands from stdin on a dedicated thread.
pub fn spawn_stdin_reader(tx: Sender<Result<ControlCmd, CommandError>>) {
    thread::spawn(move || read_commands(io::stdin().lock(), &tx));
}
