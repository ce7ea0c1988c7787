//! Track model and helpers to turn user-supplied paths into tracks.
//!
//! A `Track` is what the playlist stores: a display name derived from the
//! file name plus the path handed to the audio engine.

mod display;
mod model;
mod scan;

pub use display::display_name;
pub use model::Track;
pub use scan::expand;
