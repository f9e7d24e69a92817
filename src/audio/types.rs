//! Audio-related small types and handles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Open and decode the file, leaving the sink paused at the start.
    Load(PathBuf),
    /// Start (or restart) playback of the loaded sink.
    Play,
    /// Toggle pause/resume.
    TogglePause,
    /// Drop the current sink and reset position.
    Stop,
    /// Set the sink volume on rodio's 0.0..=1.0 scale.
    SetVolume(f32),
    /// Quit the audio thread.
    Quit,
}

/// Runtime playback information shared with the foreground loop.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Elapsed playback time for the current track.
    pub position: Duration,
    /// Whether the engine is actively producing sound (loaded, unpaused,
    /// and not yet run out of samples).
    pub busy: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            busy: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
