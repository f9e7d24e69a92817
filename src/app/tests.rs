use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use tempfile::TempDir;

use crate::acquire::{
    AcquireError, Downloaded, FetchError, MediaAcquirer, Progress, ThumbnailFetcher, WorkerEvent,
};
use crate::audio::{EngineStatus, PlaybackEngine};
use crate::config::{Settings, ThemeSetting};
use crate::player::PlayerController;

use super::*;

struct NullEngine;

impl PlaybackEngine for NullEngine {
    fn load(&mut self, _path: &Path) {}
    fn play(&mut self) {}
    fn toggle_pause(&mut self) {}
    fn stop(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn status(&self) -> EngineStatus {
        EngineStatus::default()
    }
}

struct NullFetcher;

impl ThumbnailFetcher for NullFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(Vec::new())
    }
}

struct CannedAcquirer {
    path: PathBuf,
}

impl MediaAcquirer for CannedAcquirer {
    fn acquire(
        &self,
        query: &str,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Downloaded, AcquireError> {
        progress(Progress {
            downloaded_bytes: 1,
            total_bytes: Some(2),
        });
        Ok(Downloaded {
            path: self.path.clone(),
            title: query.to_string(),
            thumbnail_url: None,
        })
    }
}

fn test_app(dir: &TempDir) -> (App<NullEngine>, Receiver<WorkerEvent>) {
    let mut settings = Settings::default();
    settings.download.dir = dir.path().to_string_lossy().into_owned();

    let (tx, rx) = mpsc::channel();
    let fetcher: Arc<dyn ThumbnailFetcher> = Arc::new(NullFetcher);
    let player = PlayerController::new(NullEngine, Arc::clone(&fetcher), tx.clone(), 50.0);
    let acquirer = Arc::new(CannedAcquirer {
        path: dir.path().join("downloaded.mp3"),
    });
    let app = App::new(player, acquirer, fetcher, tx, &settings);
    (app, rx)
}

fn downloaded_file(dir: &TempDir, name: &str) -> Downloaded {
    let path = dir.path().join(name);
    fs::write(&path, b"audio").unwrap();
    Downloaded {
        path,
        title: name.trim_end_matches(".mp3").to_string(),
        thumbnail_url: None,
    }
}

#[test]
fn an_empty_search_only_warns() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);

    app.begin_search();
    app.search_input(' ');
    app.submit_search();

    assert!(!app.download_in_flight);
    assert_eq!(app.mode, InputMode::Normal);
    assert_eq!(
        app.notice.as_ref().map(|n| n.level),
        Some(NoticeLevel::Warning)
    );
}

#[test]
fn submitting_a_search_runs_one_download_at_a_time() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("downloaded.mp3"), b"audio").unwrap();
    let (mut app, rx) = test_app(&dir);

    app.begin_search();
    for c in "some song".chars() {
        app.search_input(c);
    }
    app.submit_search();
    assert!(app.download_in_flight);
    assert!(app.notice.is_none());

    // A second submission while the first runs is refused.
    app.begin_search();
    app.search_input('x');
    app.submit_search();
    assert_eq!(
        app.notice.as_ref().map(|n| n.level),
        Some(NoticeLevel::Warning)
    );
    app.dismiss_notice();

    // Drain the worker: progress first, then completion, which lands the
    // track in the playlist and puts the cursor on it.
    let mut done = false;
    while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
        let is_done = matches!(event, WorkerEvent::DownloadDone(_));
        app.apply_event(event);
        if is_done {
            done = true;
            break;
        }
    }
    assert!(done);
    assert!(!app.download_in_flight);
    assert_eq!(app.player.playlist().len(), 1);
    assert_eq!(app.selected, 0);
    // Appending never starts playback on its own.
    assert_eq!(app.player.state().current, None);
}

#[test]
fn a_finished_download_does_not_interrupt_playback() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "a.mp3"))));
    app.play_selected();
    assert_eq!(app.player.state().current, Some(0));
    assert!(!app.player.state().paused);

    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "b.mp3"))));

    // The new track joins the playlist and takes the cursor, but the
    // current track keeps playing.
    assert_eq!(app.player.playlist().len(), 2);
    assert_eq!(app.selected, 1);
    assert_eq!(app.player.state().current, Some(0));
    assert!(!app.player.state().paused);
}

#[test]
fn progress_events_update_the_gauge_state() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);

    app.apply_event(WorkerEvent::DownloadProgress(Progress {
        downloaded_bytes: 10,
        total_bytes: None,
    }));
    assert_eq!(
        app.last_progress,
        Some(Progress {
            downloaded_bytes: 10,
            total_bytes: None
        })
    );
}

#[test]
fn a_failed_download_raises_an_error_notice() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);
    app.download_in_flight = true;

    app.apply_event(WorkerEvent::DownloadDone(Err(AcquireError::NoResult)));

    assert!(!app.download_in_flight);
    assert_eq!(
        app.notice.as_ref().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

#[test]
fn transport_on_an_empty_playlist_warns_instead_of_erroring() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);

    app.toggle_play_pause();
    assert_eq!(
        app.notice.as_ref().map(|n| n.level),
        Some(NoticeLevel::Warning)
    );
    app.dismiss_notice();

    app.play_selected();
    assert_eq!(
        app.notice.as_ref().map(|n| n.level),
        Some(NoticeLevel::Warning)
    );
}

#[test]
fn cursor_stays_inside_the_playlist() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "a.mp3"))));
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "b.mp3"))));

    app.select_previous();
    app.select_previous();
    assert_eq!(app.selected, 0);
    app.select_next();
    app.select_next();
    assert_eq!(app.selected, 1);
}

#[test]
fn next_track_moves_the_cursor_along() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "a.mp3"))));
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "b.mp3"))));
    app.play_selected();
    assert_eq!(app.player.state().current, Some(1));

    app.next_track();
    assert_eq!(app.player.state().current, Some(0));
    assert_eq!(app.selected, 0);
}

#[test]
fn rescan_pulls_the_cursor_back_into_bounds() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "a.mp3"))));
    app.apply_event(WorkerEvent::DownloadDone(Ok(downloaded_file(&dir, "b.mp3"))));
    assert_eq!(app.selected, 1);

    fs::remove_file(dir.path().join("b.mp3")).unwrap();
    app.rescan();

    assert_eq!(app.player.playlist().len(), 1);
    assert_eq!(app.selected, 0);
}

#[test]
fn theme_toggles_between_light_and_dark() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = test_app(&dir);
    assert_eq!(app.theme, ThemeSetting::Light);
    app.toggle_theme();
    assert_eq!(app.theme, ThemeSetting::Dark);
    app.toggle_theme();
    assert_eq!(app.theme, ThemeSetting::Light);
}
