//! Audio playback subsystem.
//!
//! The controller talks to a [`PlaybackEngine`] trait; the real
//! implementation drives a `rodio` sink on a dedicated audio thread,
//! commanded over an mpsc channel. All position/busy state flows back
//! through a shared handle so reading it never blocks on audio work.

mod engine;
mod sink;
mod thread;
mod types;

pub use engine::{EngineStatus, PlaybackEngine, RodioEngine};
pub use types::{AudioCmd, PlaybackHandle, PlaybackInfo};
