use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use crate::acquire::{Downloaded, FetchError, ThumbnailFetcher, WorkerEvent};
use crate::audio::{EngineStatus, PlaybackEngine};
use crate::config::LibrarySettings;

use super::*;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(PathBuf),
    Play,
    TogglePause,
    Stop,
    SetVolume(f32),
}

#[derive(Clone, Default)]
struct FakeEngine {
    calls: Arc<Mutex<Vec<Call>>>,
    status: Arc<Mutex<EngineStatus>>,
}

impl FakeEngine {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn set_status(&self, busy: bool, position: Duration) {
        *self.status.lock().unwrap() = EngineStatus { busy, position };
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PlaybackEngine for FakeEngine {
    fn load(&mut self, path: &Path) {
        self.record(Call::Load(path.to_path_buf()));
    }

    fn play(&mut self) {
        self.record(Call::Play);
    }

    fn toggle_pause(&mut self) {
        self.record(Call::TogglePause);
    }

    fn stop(&mut self) {
        self.record(Call::Stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Call::SetVolume(volume));
    }

    fn status(&self) -> EngineStatus {
        *self.status.lock().unwrap()
    }
}

struct FakeFetcher(Vec<u8>);

impl ThumbnailFetcher for FakeFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.0.clone())
    }
}

fn fetch_error() -> FetchError {
    // An unsupported scheme errors in the client without any network i/o.
    reqwest::blocking::get("foo://nope").unwrap_err().into()
}

fn track_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"not really audio").unwrap();
    path
}

fn controller_with_tracks(
    n: usize,
) -> (
    PlayerController<FakeEngine>,
    FakeEngine,
    Receiver<WorkerEvent>,
    TempDir,
) {
    let dir = TempDir::new().unwrap();
    let engine = FakeEngine::default();
    let (tx, rx) = mpsc::channel();
    let mut controller = PlayerController::new(
        engine.clone(),
        Arc::new(FakeFetcher(b"art".to_vec())),
        tx,
        50.0,
    );
    for i in 0..n {
        let path = track_file(&dir, &format!("track{i}.mp3"));
        controller.append_downloaded(Downloaded {
            path,
            title: format!("track{i}"),
            thumbnail_url: None,
        });
    }
    (controller, engine, rx, dir)
}

#[test]
fn new_controller_pushes_its_volume_to_the_engine() {
    let (_, engine, _rx, _dir) = controller_with_tracks(0);
    assert_eq!(engine.calls(), vec![Call::SetVolume(0.5)]);
}

#[test]
fn select_out_of_range_is_an_error_and_touches_nothing() {
    let (mut controller, engine, _rx, _dir) = controller_with_tracks(2);
    let before = engine.calls();
    assert!(matches!(
        controller.select_and_play(2),
        Err(PlayerError::OutOfRange { index: 2, len: 2 })
    ));
    assert_eq!(engine.calls(), before);
    assert_eq!(controller.state().current, None);
}

#[test]
fn select_and_play_loads_then_plays() {
    let (mut controller, engine, _rx, dir) = controller_with_tracks(2);
    controller.select_and_play(1).unwrap();

    let state = controller.state();
    assert_eq!(state.current, Some(1));
    assert!(!state.paused);
    assert_eq!(state.elapsed, Duration::ZERO);

    let calls = engine.calls();
    assert_eq!(
        calls[1..],
        [Call::Load(dir.path().join("track1.mp3")), Call::Play]
    );
}

#[test]
fn a_vanished_file_keeps_the_selection_but_never_reaches_the_engine() {
    let (mut controller, engine, _rx, dir) = controller_with_tracks(1);
    controller.append_downloaded(Downloaded {
        path: dir.path().join("gone.mp3"),
        title: "gone".into(),
        thumbnail_url: None,
    });

    assert!(matches!(
        controller.select_and_play(1),
        Err(PlayerError::FileMissing(_))
    ));

    // The selection stays on the missing entry so the gap is visible, but
    // the engine was never asked to load it.
    assert_eq!(controller.state().current, Some(1));
    assert!(controller.state().paused);
    assert!(!engine.calls().iter().any(|c| matches!(c, Call::Load(_))));
    assert_eq!(engine.calls().last(), Some(&Call::Stop));
}

#[test]
fn toggle_on_an_empty_playlist_is_an_error() {
    let (mut controller, _engine, _rx, _dir) = controller_with_tracks(0);
    assert!(matches!(
        controller.toggle_play_pause(),
        Err(PlayerError::EmptyPlaylist)
    ));
}

#[test]
fn toggle_with_no_selection_starts_the_first_track() {
    let (mut controller, _engine, _rx, _dir) = controller_with_tracks(3);
    controller.toggle_play_pause().unwrap();
    assert_eq!(controller.state().current, Some(0));
    assert!(!controller.state().paused);
}

#[test]
fn toggle_flips_the_paused_flag() {
    let (mut controller, engine, _rx, _dir) = controller_with_tracks(1);
    controller.select_and_play(0).unwrap();

    controller.toggle_play_pause().unwrap();
    assert!(controller.state().paused);
    controller.toggle_play_pause().unwrap();
    assert!(!controller.state().paused);
    assert_eq!(
        engine.calls().iter().filter(|c| **c == Call::TogglePause).count(),
        2
    );
}

#[test]
fn next_and_previous_wrap_around() {
    let (mut controller, _engine, _rx, _dir) = controller_with_tracks(3);

    controller.next().unwrap();
    assert_eq!(controller.state().current, Some(0));
    controller.next().unwrap();
    controller.next().unwrap();
    controller.next().unwrap();
    assert_eq!(controller.state().current, Some(0));

    controller.previous().unwrap();
    assert_eq!(controller.state().current, Some(2));
}

#[test]
fn previous_with_no_selection_starts_the_last_track() {
    let (mut controller, _engine, _rx, _dir) = controller_with_tracks(3);
    controller.previous().unwrap();
    assert_eq!(controller.state().current, Some(2));
}

#[test]
fn next_on_an_empty_playlist_is_an_error() {
    let (mut controller, _engine, _rx, _dir) = controller_with_tracks(0);
    assert!(matches!(controller.next(), Err(PlayerError::EmptyPlaylist)));
    assert!(matches!(
        controller.previous(),
        Err(PlayerError::EmptyPlaylist)
    ));
}

#[test]
fn volume_is_clamped_and_scaled_for_the_engine() {
    let (mut controller, engine, _rx, _dir) = controller_with_tracks(0);

    controller.set_volume(150.0);
    assert_eq!(controller.state().volume, 100.0);
    controller.set_volume(-20.0);
    assert_eq!(controller.state().volume, 0.0);
    controller.adjust_volume(25.0);
    assert_eq!(controller.state().volume, 25.0);

    assert_eq!(
        engine.calls(),
        vec![
            Call::SetVolume(0.5),
            Call::SetVolume(1.0),
            Call::SetVolume(0.0),
            Call::SetVolume(0.25),
        ]
    );
}

#[test]
fn tick_follows_the_engine_only_while_it_is_busy() {
    let (mut controller, engine, _rx, _dir) = controller_with_tracks(1);
    controller.select_and_play(0).unwrap();

    engine.set_status(true, Duration::from_secs(7));
    controller.tick();
    assert_eq!(controller.state().elapsed, Duration::from_secs(7));

    // Track ran out: the engine resets, the readout must not.
    engine.set_status(false, Duration::ZERO);
    controller.tick();
    assert_eq!(controller.state().elapsed, Duration::from_secs(7));
}

#[test]
fn rescan_drops_a_selection_the_new_playlist_cannot_hold() {
    let (mut controller, engine, _rx, dir) = controller_with_tracks(3);
    controller.select_and_play(2).unwrap();

    // Leave a single scannable file behind.
    fs::remove_file(dir.path().join("track1.mp3")).unwrap();
    fs::remove_file(dir.path().join("track2.mp3")).unwrap();
    controller.rescan(dir.path(), &LibrarySettings::default());

    assert_eq!(controller.playlist().len(), 1);
    let state = controller.state();
    assert_eq!(state.current, None);
    assert!(state.paused);
    assert_eq!(state.elapsed, Duration::ZERO);
    assert_eq!(state.duration, None);
    assert_eq!(*controller.artwork(), Artwork::Placeholder);
    assert_eq!(engine.calls().last(), Some(&Call::Stop));
}

#[test]
fn rescan_keeps_a_selection_that_still_fits() {
    let (mut controller, engine, _rx, dir) = controller_with_tracks(3);
    controller.select_and_play(0).unwrap();

    controller.rescan(dir.path(), &LibrarySettings::default());

    assert_eq!(controller.state().current, Some(0));
    assert_ne!(engine.calls().last(), Some(&Call::Stop));
}

#[test]
fn download_with_a_thumbnail_leaves_artwork_pending_until_the_fetch_lands() {
    let (mut controller, _engine, rx, dir) = controller_with_tracks(0);
    let path = track_file(&dir, "remote.mp3");
    controller.append_downloaded(Downloaded {
        path,
        title: "remote".into(),
        thumbnail_url: Some("https://img.example/cover.jpg".into()),
    });

    controller.select_and_play(0).unwrap();
    assert_eq!(*controller.artwork(), Artwork::Pending);

    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        WorkerEvent::ArtworkFetched {
            generation,
            index,
            result,
        } => {
            controller.apply_artwork(generation, index, result);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(*controller.artwork(), Artwork::Fetched(b"art".to_vec()));
}

#[test]
fn stale_artwork_results_are_discarded() {
    let (mut controller, _engine, _rx, _dir) = controller_with_tracks(2);
    controller.select_and_play(0).unwrap();

    // Wrong index: fetched for a track that is no longer current.
    controller.apply_artwork(0, 1, Ok(b"late".to_vec()));
    assert_eq!(*controller.artwork(), Artwork::Placeholder);

    // Wrong generation: a rescan happened while the fetch was in flight.
    controller.apply_artwork(99, 0, Ok(b"late".to_vec()));
    assert_eq!(*controller.artwork(), Artwork::Placeholder);

    controller.apply_artwork(0, 0, Ok(b"fresh".to_vec()));
    assert_eq!(*controller.artwork(), Artwork::Fetched(b"fresh".to_vec()));
}

#[test]
fn a_failed_fetch_falls_back_to_the_placeholder() {
    let (mut controller, _engine, _rx, dir) = controller_with_tracks(0);
    let path = track_file(&dir, "remote.mp3");
    controller.append_downloaded(Downloaded {
        path,
        title: "remote".into(),
        thumbnail_url: Some("https://img.example/cover.jpg".into()),
    });
    controller.select_and_play(0).unwrap();
    assert_eq!(*controller.artwork(), Artwork::Pending);

    controller.apply_artwork(0, 0, Err(fetch_error()));
    assert_eq!(*controller.artwork(), Artwork::Placeholder);
}
