//! A local audio playback controller: an ordered playlist with a cursor,
//! a play/pause/stop state machine over an audio engine, and a background
//! progress monitor.

pub mod audio;
pub mod config;
pub mod library;
pub mod player;
pub mod playlist;
pub mod runtime;
