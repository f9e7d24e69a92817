use std::path::Path;

use crate::config::LibrarySettings;

use super::model::Track;
use super::scan::scan_dir;

/// Ordered sequence of tracks, insertion order preserved.
///
/// Duplicate paths are permitted (nothing deduplicates downloads that land
/// on the same filename). Indices handed out by [`PlaylistStore::append`]
/// stay valid only until the next [`PlaylistStore::rescan`], which rebuilds
/// the whole sequence; holders of an index must re-validate it afterwards.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    tracks: Vec<Track>,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Add a track at the end, returning its index.
    pub fn append(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Replace the whole sequence with the audio files found in `dir`.
    ///
    /// Any previously valid index is invalidated; callers holding one must
    /// bounds-check it against the new length.
    pub fn rescan(&mut self, dir: &Path, settings: &LibrarySettings) {
        self.tracks = scan_dir(dir, settings);
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}
