use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::acquire::{Downloaded, FetchError, ThumbnailFetcher, WorkerEvent};
use crate::audio::PlaybackEngine;
use crate::config::LibrarySettings;
use crate::playlist::{PlaylistStore, Track};
use crate::tags;

use super::state::{Artwork, PlayerError, PlayerState};

/// Coordinates the playlist, the playback engine and the transport state.
///
/// The controller is single-threaded by construction: only the foreground
/// loop calls into it. Worker results enter through [`apply_artwork`] and
/// [`append_downloaded`], where anything that went stale in flight is
/// discarded.
///
/// [`apply_artwork`]: PlayerController::apply_artwork
/// [`append_downloaded`]: PlayerController::append_downloaded
pub struct PlayerController<E: PlaybackEngine> {
    playlist: PlaylistStore,
    engine: E,
    fetcher: Arc<dyn ThumbnailFetcher>,
    events: Sender<WorkerEvent>,
    state: PlayerState,
    artwork: Artwork,
    /// Bumped on every rescan; artwork fetched against an older generation
    /// is discarded even if its index happens to line up again.
    generation: u64,
}

impl<E: PlaybackEngine> PlayerController<E> {
    pub fn new(
        mut engine: E,
        fetcher: Arc<dyn ThumbnailFetcher>,
        events: Sender<WorkerEvent>,
        volume: f32,
    ) -> Self {
        let volume = volume.clamp(0.0, 100.0);
        engine.set_volume(volume / 100.0);
        Self {
            playlist: PlaylistStore::new(),
            engine,
            fetcher,
            events,
            state: PlayerState::new(volume),
            artwork: Artwork::Placeholder,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn artwork(&self) -> &Artwork {
        &self.artwork
    }

    pub fn playlist(&self) -> &PlaylistStore {
        &self.playlist
    }

    /// Take the engine back for shutdown.
    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current.and_then(|i| self.playlist.get(i))
    }

    /// Load the track at `index` and start playing it from the top.
    pub fn select_and_play(&mut self, index: usize) -> Result<(), PlayerError> {
        self.load_track(index)?;
        self.engine.play();
        self.state.paused = false;
        Ok(())
    }

    /// Pause/resume the current track; with nothing selected yet, start
    /// the first track instead.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        if self.playlist.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        match self.state.current {
            None => self.select_and_play(0),
            Some(_) => {
                self.engine.toggle_pause();
                self.state.paused = !self.state.paused;
                Ok(())
            }
        }
    }

    /// Advance to the next track, wrapping at the end. With nothing
    /// selected, starts at the first track.
    pub fn next(&mut self) -> Result<(), PlayerError> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(PlayerError::EmptyPlaylist);
        }
        let index = match self.state.current {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.select_and_play(index)
    }

    /// Step back to the previous track, wrapping at the start. With
    /// nothing selected, starts at the last track.
    pub fn previous(&mut self) -> Result<(), PlayerError> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(PlayerError::EmptyPlaylist);
        }
        let index = match self.state.current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select_and_play(index)
    }

    /// Set the volume on the user-facing 0..=100 scale, clamping anything
    /// outside of it.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 100.0);
        self.state.volume = volume;
        self.engine.set_volume(volume / 100.0);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Refresh the elapsed-time readout from the engine.
    ///
    /// Only an actively playing engine moves the clock; when playback has
    /// stopped (paused, or the track ran out) the last position stays on
    /// screen instead of snapping back to zero.
    pub fn tick(&mut self) {
        let status = self.engine.status();
        if status.busy {
            self.state.elapsed = status.position;
        }
    }

    /// Rebuild the playlist from `dir`.
    ///
    /// Every index handed out before is invalid afterwards: the current
    /// selection is dropped back to "nothing selected" and playback stops
    /// unless the old index still points inside the new sequence. In-flight
    /// artwork fetches are invalidated wholesale by bumping the generation.
    pub fn rescan(&mut self, dir: &Path, settings: &LibrarySettings) {
        self.generation += 1;
        self.playlist.rescan(dir, settings);
        info!(tracks = self.playlist.len(), dir = %dir.display(), "rescanned playlist");

        if let Some(current) = self.state.current {
            if current >= self.playlist.len() {
                self.engine.stop();
                self.state.current = None;
                self.state.paused = true;
                self.state.elapsed = Duration::ZERO;
                self.state.duration = None;
                self.artwork = Artwork::Placeholder;
            }
        }
    }

    /// Put a finished download at the end of the playlist, returning its
    /// index.
    pub fn append_downloaded(&mut self, downloaded: Downloaded) -> usize {
        let index = self.playlist.append(Track::new(
            downloaded.path,
            downloaded.title,
            downloaded.thumbnail_url,
        ));
        debug!(index, "appended downloaded track");
        index
    }

    /// Apply the result of a background artwork fetch, unless the track it
    /// was fetched for is no longer the current one.
    pub fn apply_artwork(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<Vec<u8>, FetchError>,
    ) {
        if generation != self.generation || self.state.current != Some(index) {
            debug!(generation, index, "discarding stale artwork result");
            return;
        }
        match result {
            Ok(bytes) => self.artwork = Artwork::Fetched(bytes),
            Err(e) => {
                warn!(error = %e, "artwork fetch failed, keeping placeholder");
                if self.artwork == Artwork::Pending {
                    self.artwork = Artwork::Placeholder;
                }
            }
        }
    }

    /// Point the transport at `index`, leaving the engine loaded and
    /// paused at the start of the file.
    ///
    /// The file is checked on disk before the engine sees it. A vanished
    /// track aborts the load but keeps the selection pointing at it, so
    /// the gap in the playlist stays visible.
    fn load_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let track = self
            .playlist
            .get(index)
            .ok_or(PlayerError::OutOfRange {
                index,
                len: self.playlist.len(),
            })?
            .clone();

        if !track.path.exists() {
            self.engine.stop();
            self.state.current = Some(index);
            self.state.paused = true;
            self.state.elapsed = Duration::ZERO;
            self.state.duration = None;
            self.artwork = Artwork::Placeholder;
            return Err(PlayerError::FileMissing(track.path));
        }

        // Duration and embedded art are best-effort: unreadable tags must
        // not stop the track from playing.
        let meta = match tags::read_embedded(&track.path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %track.path.display(), error = %e, "could not read tags");
                tags::EmbeddedMeta::default()
            }
        };

        self.engine.load(&track.path);
        self.state.current = Some(index);
        self.state.elapsed = Duration::ZERO;
        self.state.duration = meta.duration;

        self.artwork = match meta.art {
            Some(bytes) => Artwork::Embedded(bytes),
            None => match &track.thumbnail_url {
                Some(url) => {
                    self.spawn_artwork_fetch(url.clone(), index);
                    Artwork::Pending
                }
                None => Artwork::Placeholder,
            },
        };

        info!(index, title = %track.title, "loaded track");
        Ok(())
    }

    fn spawn_artwork_fetch(&self, url: String, index: usize) {
        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events.clone();
        let generation = self.generation;
        thread::spawn(move || {
            let result = fetcher.fetch(&url);
            let _ = events.send(WorkerEvent::ArtworkFetched {
                generation,
                index,
                result,
            });
        });
    }
}
