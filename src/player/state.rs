use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("track index {index} is out of range (playlist has {len} tracks)")]
    OutOfRange { index: usize, len: usize },
    #[error("track file is missing: {0}")]
    FileMissing(PathBuf),
    #[error("the playlist is empty")]
    EmptyPlaylist,
}

/// Transport state as shown to the user.
///
/// `elapsed` is display state, not engine state: when a track runs out it
/// keeps its final value until the next load so the time readout does not
/// snap back to zero.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Index of the current track, `None` when nothing has been selected
    /// yet or a rescan invalidated the selection.
    pub current: Option<usize>,
    pub paused: bool,
    /// Total duration of the current track, when its tags reveal one.
    pub duration: Option<Duration>,
    pub elapsed: Duration,
    /// Volume on the user-facing 0..=100 scale.
    pub volume: f32,
}

impl PlayerState {
    pub fn new(volume: f32) -> Self {
        Self {
            current: None,
            paused: true,
            duration: None,
            elapsed: Duration::ZERO,
            volume,
        }
    }
}

/// Cover art for the current track, in order of how it was obtained.
///
/// `Pending` means a network fetch is in flight; whether its result still
/// applies is decided when it lands, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    /// No art known; the UI draws its placeholder.
    Placeholder,
    /// A fetch was dispatched for this track and has not resolved yet.
    Pending,
    /// Art read out of the file's own tags.
    Embedded(Vec<u8>),
    /// Art fetched from the track's thumbnail URL.
    Fetched(Vec<u8>),
}
