use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use tracing::{error, info, warn};

use crate::acquire::{
    self, MediaAcquirer, Progress, ThumbnailFetcher, WorkerEvent,
};
use crate::audio::PlaybackEngine;
use crate::config::{LibrarySettings, Settings, ThemeSetting};
use crate::player::{PlayerController, PlayerError};

const VOLUME_STEP: f32 = 5.0;

/// Whether keystrokes act on the transport or feed the search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message shown in a blocking popup until the user dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the terminal UI renders and every action a key can trigger.
pub struct App<E: PlaybackEngine> {
    pub player: PlayerController<E>,
    acquirer: Arc<dyn MediaAcquirer>,
    fetcher: Arc<dyn ThumbnailFetcher>,
    events: Sender<WorkerEvent>,
    download_dir: PathBuf,
    library: LibrarySettings,
    pub theme: ThemeSetting,
    pub header_text: String,
    pub mode: InputMode,
    pub search_query: String,
    pub notice: Option<Notice>,
    /// Playlist cursor; independent of what is playing.
    pub selected: usize,
    pub show_metadata: bool,
    pub download_in_flight: bool,
    pub last_progress: Option<Progress>,
    pub should_quit: bool,
}

impl<E: PlaybackEngine> App<E> {
    pub fn new(
        player: PlayerController<E>,
        acquirer: Arc<dyn MediaAcquirer>,
        fetcher: Arc<dyn ThumbnailFetcher>,
        events: Sender<WorkerEvent>,
        settings: &Settings,
    ) -> Self {
        Self {
            player,
            acquirer,
            fetcher,
            events,
            download_dir: PathBuf::from(&settings.download.dir),
            library: settings.library.clone(),
            theme: settings.ui.theme,
            header_text: settings.ui.header_text.clone(),
            mode: InputMode::Normal,
            search_query: String::new(),
            notice: None,
            selected: 0,
            show_metadata: false,
            download_in_flight: false,
            last_progress: None,
            should_quit: false,
        }
    }

    /// Apply one background-worker result on the foreground loop.
    pub fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::DownloadProgress(p) => {
                self.last_progress = Some(p);
            }
            WorkerEvent::DownloadDone(Ok(downloaded)) => {
                self.download_in_flight = false;
                self.last_progress = None;
                info!(title = %downloaded.title, "download finished");
                // Append only; whatever is playing keeps playing. The
                // cursor moves so the new track is one Enter away.
                self.selected = self.player.append_downloaded(downloaded);
            }
            WorkerEvent::DownloadDone(Err(e)) => {
                self.download_in_flight = false;
                self.last_progress = None;
                error!(error = %e, "download failed");
                self.notice = Some(Notice::error(format!("download failed: {e}")));
            }
            WorkerEvent::ArtworkFetched {
                generation,
                index,
                result,
            } => {
                self.player.apply_artwork(generation, index, result);
            }
        }
    }

    pub fn select_next(&mut self) {
        let len = self.player.playlist().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn play_selected(&mut self) {
        if self.player.playlist().is_empty() {
            self.notice = Some(Notice::warning("the playlist is empty"));
            return;
        }
        let result = self.player.select_and_play(self.selected);
        self.report(result);
    }

    pub fn toggle_play_pause(&mut self) {
        let result = self.player.toggle_play_pause();
        self.report(result);
    }

    pub fn next_track(&mut self) {
        let result = self.player.next();
        self.report(result);
        self.follow_current();
    }

    pub fn previous_track(&mut self) {
        let result = self.player.previous();
        self.report(result);
        self.follow_current();
    }

    pub fn volume_up(&mut self) {
        self.player.adjust_volume(VOLUME_STEP);
    }

    pub fn volume_down(&mut self) {
        self.player.adjust_volume(-VOLUME_STEP);
    }

    /// Rebuild the playlist from the download directory and pull the
    /// cursor back inside the new bounds.
    pub fn rescan(&mut self) {
        self.player.rescan(&self.download_dir, &self.library);
        let len = self.player.playlist().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            ThemeSetting::Light => ThemeSetting::Dark,
            ThemeSetting::Dark => ThemeSetting::Light,
        };
    }

    pub fn toggle_metadata(&mut self) {
        self.show_metadata = !self.show_metadata;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn begin_search(&mut self) {
        self.mode = InputMode::Search;
        self.search_query.clear();
    }

    pub fn cancel_search(&mut self) {
        self.mode = InputMode::Normal;
        self.search_query.clear();
    }

    pub fn search_input(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn search_backspace(&mut self) {
        self.search_query.pop();
    }

    /// Kick off a search/download for the typed query on a worker thread.
    pub fn submit_search(&mut self) {
        self.mode = InputMode::Normal;
        let query = self.search_query.trim().to_string();
        self.search_query.clear();

        if query.is_empty() {
            warn!("ignoring empty search");
            self.notice = Some(Notice::warning("nothing to search for"));
            return;
        }
        if self.download_in_flight {
            self.notice = Some(Notice::warning("a download is already running"));
            return;
        }

        info!(%query, "starting download");
        self.download_in_flight = true;
        self.last_progress = None;
        acquire::spawn_download(
            Arc::clone(&self.acquirer),
            Arc::clone(&self.fetcher),
            query,
            self.events.clone(),
        );
    }

    fn follow_current(&mut self) {
        if let Some(current) = self.player.state().current {
            self.selected = current;
        }
    }

    /// Route a transport error to the right notice level. An empty
    /// playlist is the user's situation, not a fault, so it only warns.
    fn report(&mut self, result: Result<(), PlayerError>) {
        match result {
            Ok(()) => {}
            Err(e @ PlayerError::EmptyPlaylist) => {
                self.notice = Some(Notice::warning(e.to_string()));
            }
            Err(e) => {
                error!(error = %e, "transport command failed");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }
}
