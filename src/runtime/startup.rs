use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use tracing::info;

use crate::acquire::{HttpFetcher, ThumbnailFetcher, WorkerEvent, YtDlpAcquirer};
use crate::app::App;
use crate::audio::RodioEngine;
use crate::config::Settings;
use crate::player::PlayerController;

/// Everything `run` needs that outlives the event loop.
pub struct Startup {
    pub app: App<RodioEngine>,
    pub worker_rx: Receiver<WorkerEvent>,
}

/// Wire the subsystems together and fill the playlist from disk.
pub fn build_app(settings: &Settings) -> Result<Startup, Box<dyn std::error::Error>> {
    let download_dir = Path::new(&settings.download.dir);
    fs::create_dir_all(download_dir)?;

    let (worker_tx, worker_rx) = mpsc::channel::<WorkerEvent>();

    let engine = RodioEngine::new(settings.playback.volume / 100.0);
    let fetcher: Arc<dyn ThumbnailFetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(
        settings.download.thumbnail_timeout_secs,
    )));
    let acquirer = Arc::new(YtDlpAcquirer::new(settings.download.clone()));

    let mut player = PlayerController::new(
        engine,
        Arc::clone(&fetcher),
        worker_tx.clone(),
        settings.playback.volume,
    );
    player.rescan(download_dir, &settings.library);
    info!(
        tracks = player.playlist().len(),
        dir = %download_dir.display(),
        "startup scan complete"
    );

    let app = App::new(player, acquirer, fetcher, worker_tx, settings);
    Ok(Startup { app, worker_rx })
}
