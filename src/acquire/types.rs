use std::path::PathBuf;

use thiserror::Error;

use super::thumb::FetchError;

/// What a finished acquisition hands back to the foreground loop.
#[derive(Debug, Clone)]
pub struct Downloaded {
    /// Local path of the transcoded audio file.
    pub path: PathBuf,
    /// Title as resolved by the media source.
    pub title: String,
    pub thumbnail_url: Option<String>,
}

/// A point-in-time download progress report.
///
/// `total_bytes` is `None` when the source does not announce a size; the
/// display must treat that as indeterminate rather than divide by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{bin} failed: {detail}")]
    Failed { bin: String, detail: String },
    #[error("could not parse media metadata: {0}")]
    Metadata(#[source] serde_json::Error),
    #[error("the search returned no result")]
    NoResult,
    #[error("i/o error while downloading: {0}")]
    Io(#[from] std::io::Error),
}

/// Result values produced by background workers, applied on the foreground
/// loop only. Completion of work that has since become irrelevant is
/// discarded at apply time; there is no cancellation at the source.
#[derive(Debug)]
pub enum WorkerEvent {
    DownloadProgress(Progress),
    DownloadDone(Result<Downloaded, AcquireError>),
    ArtworkFetched {
        /// Playlist generation at dispatch time; a rescan in between makes
        /// the result stale no matter what index it carries.
        generation: u64,
        /// Index the fetch was started for.
        index: usize,
        result: Result<Vec<u8>, FetchError>,
    },
}

/// The search+download+transcode subsystem as the core sees it.
///
/// `acquire` blocks its calling (worker) thread for the whole run and
/// reports byte-level progress through the callback as it goes.
pub trait MediaAcquirer: Send + Sync {
    fn acquire(
        &self,
        query: &str,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Downloaded, AcquireError>;
}
