//! Audio engine seam.
//!
//! The controller drives playback through the [`AudioEngine`] and
//! [`MetadataReader`] traits. The concrete implementations here use `rodio`
//! for decode/output and `lofty` for reading track durations.

mod engine;
mod metadata;
mod output;
mod sink;
mod thread;
mod types;

pub use engine::{AudioEngine, MetadataReader};
pub use metadata::LoftyMetadata;
pub use output::RodioEngine;
pub use types::{EngineError, MetadataError};
