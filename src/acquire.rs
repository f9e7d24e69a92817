//! Search, download and transcode of audio from the web.
//!
//! The controller only depends on the [`MediaAcquirer`] and
//! [`ThumbnailFetcher`] traits; the real implementations shell out to the
//! `yt-dlp` binary and perform blocking HTTP GETs. All of it runs on
//! background worker threads that report back through [`WorkerEvent`]
//! values, never by touching shared state.

mod thumb;
mod types;
mod worker;
mod ytdlp;

pub use thumb::{FetchError, HttpFetcher, ThumbnailFetcher};
pub use types::{AcquireError, Downloaded, MediaAcquirer, Progress, WorkerEvent};
pub use worker::spawn_download;
pub use ytdlp::YtDlpAcquirer;
