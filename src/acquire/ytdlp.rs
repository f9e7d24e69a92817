use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::DownloadSettings;

use super::types::{AcquireError, Downloaded, MediaAcquirer, Progress};

/// Prefix our progress template puts on every progress line so it can be
/// told apart from the final-filepath print on the same stream.
const PROGRESS_PREFIX: &str = "dl:";

/// Shells out to the `yt-dlp` binary in two phases: a metadata probe
/// (`-j`) to resolve title, thumbnail and canonical URL, then the actual
/// download with audio extraction and a parseable progress template.
pub struct YtDlpAcquirer {
    settings: DownloadSettings,
}

/// The slice of `yt-dlp -j` output this crate cares about.
#[derive(Debug, Deserialize)]
pub(super) struct ProbeInfo {
    pub(super) title: String,
    pub(super) thumbnail: Option<String>,
    pub(super) webpage_url: Option<String>,
}

impl YtDlpAcquirer {
    pub fn new(settings: DownloadSettings) -> Self {
        Self { settings }
    }

    /// URLs pass through untouched; anything else becomes a platform search
    /// resolving to the single best match.
    pub(super) fn resolve_target(&self, query: &str) -> String {
        let query = query.trim();
        if query.starts_with("http://") || query.starts_with("https://") {
            query.to_string()
        } else {
            format!("{}{}", self.settings.search_prefix, query)
        }
    }

    pub(super) fn output_template(&self) -> String {
        format!("{}/%(title)s.%(ext)s", self.settings.dir.trim_end_matches('/'))
    }

    fn probe(&self, target: &str) -> Result<ProbeInfo, AcquireError> {
        let bin = &self.settings.ytdlp_bin;
        let output = Command::new(bin)
            .args(["-j", "--no-playlist", target])
            .stdin(Stdio::null())
            .output()
            .map_err(|source| AcquireError::Spawn {
                bin: bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AcquireError::Failed {
                bin: bin.clone(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // A search target may in principle print one JSON object per line;
        // the first one is the best match.
        let line = stdout
            .lines()
            .find(|l| !l.trim().is_empty())
            .ok_or(AcquireError::NoResult)?;
        parse_probe(line)
    }

    fn download(
        &self,
        url: &str,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Option<PathBuf>, AcquireError> {
        let bin = &self.settings.ytdlp_bin;
        let template = format!(
            "download:{PROGRESS_PREFIX}%(progress.downloaded_bytes)s:%(progress.total_bytes)s"
        );

        let mut child = Command::new(bin)
            .args([
                "-f",
                "bestaudio/best",
                "--no-playlist",
                "-x",
                "--audio-format",
                &self.settings.audio_format,
                "--audio-quality",
                &self.settings.audio_quality,
                "-o",
                &self.output_template(),
                "--newline",
                "--progress-template",
                &template,
                "--print",
                "after_move:filepath",
                url,
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AcquireError::Spawn {
                bin: bin.clone(),
                source,
            })?;

        // Slurp stderr on the side so a chatty child can't deadlock against
        // our stdout reads.
        let stderr_reader = child.stderr.take().map(|mut err| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = err.read_to_string(&mut buf);
                buf
            })
        });

        let mut resolved_path: Option<PathBuf> = None;
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line?;
                if let Some(p) = parse_progress_line(&line) {
                    progress(p);
                } else if !line.trim().is_empty() {
                    // The only non-progress print we asked for is the final
                    // filepath after post-processing.
                    resolved_path = Some(PathBuf::from(line.trim()));
                }
            }
        }

        let status = child.wait()?;
        if !status.success() {
            let detail = stderr_reader
                .and_then(|h| h.join().ok())
                .unwrap_or_default()
                .trim()
                .to_string();
            return Err(AcquireError::Failed {
                bin: bin.clone(),
                detail,
            });
        }

        Ok(resolved_path)
    }
}

impl MediaAcquirer for YtDlpAcquirer {
    fn acquire(
        &self,
        query: &str,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Downloaded, AcquireError> {
        let target = self.resolve_target(query);
        debug!(%target, "probing media metadata");
        let probe = self.probe(&target)?;

        let url = probe.webpage_url.as_deref().unwrap_or(&target);
        info!(title = %probe.title, "downloading audio");
        let resolved = self.download(url, progress)?;

        // yt-dlp sanitizes titles when expanding the output template, so
        // prefer the path it printed; fall back to the naive expansion.
        let path = resolved.unwrap_or_else(|| {
            PathBuf::from(&self.settings.dir)
                .join(format!("{}.{}", probe.title, self.settings.audio_format))
        });

        if !path.exists() {
            warn!(path = %path.display(), "downloaded file not found where expected");
        }

        Ok(Downloaded {
            path,
            title: probe.title,
            thumbnail_url: probe.thumbnail,
        })
    }
}

pub(super) fn parse_probe(line: &str) -> Result<ProbeInfo, AcquireError> {
    serde_json::from_str(line).map_err(AcquireError::Metadata)
}

/// Parse one `--progress-template` line: `dl:<downloaded>:<total>` where
/// `<total>` is `NA` when the source does not announce a size.
pub(super) fn parse_progress_line(line: &str) -> Option<Progress> {
    let rest = line.trim().strip_prefix(PROGRESS_PREFIX)?;
    let (downloaded, total) = rest.split_once(':')?;
    let downloaded_bytes = downloaded.parse::<u64>().ok()?;
    let total_bytes = total.parse::<u64>().ok();
    Some(Progress {
        downloaded_bytes,
        total_bytes,
    })
}
