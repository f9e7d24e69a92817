use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::tags;

use super::thumb::ThumbnailFetcher;
use super::types::{MediaAcquirer, Progress, WorkerEvent};

/// Run one search/download/transcode request on its own thread.
///
/// The worker never touches shared state: it posts progress and the final
/// typed outcome into `events` and lets the foreground loop apply them.
/// Cover art is fetched and embedded here, before the track is announced,
/// so a track never becomes visible and then mutates; embedding failure is
/// non-fatal by contract.
pub fn spawn_download(
    acquirer: Arc<dyn MediaAcquirer>,
    fetcher: Arc<dyn ThumbnailFetcher>,
    query: String,
    events: Sender<WorkerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut on_progress = |p: Progress| {
            let _ = events.send(WorkerEvent::DownloadProgress(p));
        };

        let result = acquirer.acquire(&query, &mut on_progress);

        if let Ok(downloaded) = &result {
            if let Some(url) = &downloaded.thumbnail_url {
                match fetcher.fetch(url) {
                    Ok(bytes) => tags::embed_art(&downloaded.path, &bytes),
                    Err(e) => {
                        warn!(error = %e, "skipping cover art embedding");
                    }
                }
            }
        }

        // The receiver disappearing just means the app is shutting down.
        let _ = events.send(WorkerEvent::DownloadDone(result));
    })
}
