use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Position and activity snapshot of the playback engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStatus {
    pub busy: bool,
    pub position: Duration,
}

/// The interface the player controller needs from an audio backend.
///
/// Every method must return promptly; implementations may not block on
/// decode or device work on the caller's thread.
pub trait PlaybackEngine {
    /// Prepare `path` for playback, paused at the start.
    fn load(&mut self, path: &Path);
    /// Start playback of whatever was last loaded.
    fn play(&mut self);
    /// Toggle pause/resume.
    fn toggle_pause(&mut self);
    /// Stop playback and drop the loaded file.
    fn stop(&mut self);
    /// Set the volume on the 0.0..=1.0 scale.
    fn set_volume(&mut self, volume: f32);
    /// Current busy flag and position.
    fn status(&self) -> EngineStatus;
}

/// `rodio`-backed engine: commands go to a dedicated audio thread, state
/// comes back through a shared handle.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    pub fn new(initial_volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone(), initial_volume);

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        // A closed channel means the audio thread is gone (e.g. no output
        // device); playback silently degrades to a no-op.
        let _ = self.tx.send(cmd);
    }

    /// Ask the audio thread to shut down and wait for it.
    pub fn quit(&self) {
        self.send(AudioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, path: &Path) {
        self.send(AudioCmd::Load(path.to_path_buf()));
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn toggle_pause(&mut self) {
        self.send(AudioCmd::TogglePause);
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }

    fn status(&self) -> EngineStatus {
        match self.playback.lock() {
            Ok(info) => EngineStatus {
                busy: info.busy,
                position: info.position,
            },
            Err(_) => EngineStatus::default(),
        }
    }
}
