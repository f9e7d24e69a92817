use std::path::{Path, PathBuf};

/// One playable audio file plus an optional cover-art reference.
///
/// A track is never mutated after creation; it is only ever replaced by a
/// full rescan of the download directory. Identity is the path: two tracks
/// with the same path are the same file, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    /// Where the cover art can be fetched from when the file itself has
    /// none embedded. Only known for tracks that arrived via download.
    pub thumbnail_url: Option<String>,
}

impl Track {
    pub fn new(path: PathBuf, title: String, thumbnail_url: Option<String>) -> Self {
        Self {
            path,
            title,
            thumbnail_url,
        }
    }

    /// Build a track straight from a file on disk, titling it by file stem.
    pub fn from_path(path: &Path) -> Self {
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            path: path.to_path_buf(),
            title,
            thumbnail_url: None,
        }
    }
}
