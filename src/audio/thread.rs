use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{error, warn};

use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "no audio output device, playback disabled");
                // Drain commands so senders never block or error out.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut volume = initial_volume;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let publish = |sink: &Option<Sink>,
                       paused: bool,
                       started_at: &Option<Instant>,
                       accumulated: Duration| {
            let position =
                accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
            let busy = sink.as_ref().map(|s| !s.empty()).unwrap_or(false) && !paused;
            if let Ok(mut info) = playback_info.lock() {
                info.position = position;
                info.busy = busy;
            }
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => {
                    match cmd {
                        AudioCmd::Load(path) => {
                            if let Some(s) = sink.as_ref() {
                                s.stop();
                            }
                            sink = match create_sink(&stream, &path, volume) {
                                Ok(s) => Some(s),
                                Err(e) => {
                                    warn!(error = %e, "load failed");
                                    None
                                }
                            };
                            paused = true;
                            started_at = None;
                            accumulated = Duration::ZERO;
                        }
                        AudioCmd::Play => {
                            if let Some(s) = sink.as_ref() {
                                s.play();
                                paused = false;
                                started_at = Some(Instant::now());
                                accumulated = Duration::ZERO;
                            }
                        }
                        AudioCmd::TogglePause => {
                            if let Some(s) = sink.as_ref() {
                                if paused {
                                    s.play();
                                    started_at = Some(Instant::now());
                                } else {
                                    s.pause();
                                    if let Some(st) = started_at {
                                        accumulated += Instant::now() - st;
                                    }
                                    started_at = None;
                                }
                                paused = !paused;
                            }
                        }
                        AudioCmd::Stop => {
                            if let Some(s) = sink.as_ref() {
                                s.stop();
                            }
                            sink = None;
                            paused = true;
                            started_at = None;
                            accumulated = Duration::ZERO;
                        }
                        AudioCmd::SetVolume(v) => {
                            volume = v;
                            if let Some(s) = sink.as_ref() {
                                s.set_volume(v);
                            }
                        }
                        AudioCmd::Quit => {
                            if let Some(s) = sink.as_ref() {
                                s.stop();
                            }
                            publish(&None, true, &None, accumulated);
                            break;
                        }
                    }
                    publish(&sink, paused, &started_at, accumulated);
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Detect the current track running out of samples. The
                    // position deliberately stays where it ended so a display
                    // reading it keeps showing the final time.
                    if let Some(s) = sink.as_ref() {
                        if !paused && s.empty() {
                            if let Some(st) = started_at {
                                accumulated += Instant::now() - st;
                            }
                            started_at = None;
                            sink = None;
                            paused = true;
                        }
                    }
                    publish(&sink, paused, &started_at, accumulated);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
