use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
///
/// Nothing is written back at runtime: volume, theme and the like reset to
/// these defaults on every run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub download: DownloadSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Directory downloads land in, relative to the working directory.
    /// Created at startup if absent.
    pub dir: String,
    /// Name or path of the yt-dlp binary to shell out to.
    pub ytdlp_bin: String,
    /// Target audio container passed to yt-dlp's audio extractor.
    pub audio_format: String,
    /// Target audio quality passed to yt-dlp (e.g. "320K").
    pub audio_quality: String,
    /// Prefix applied to free-text queries so yt-dlp resolves them as a
    /// search; URLs are passed through untouched.
    pub search_prefix: String,
    /// Timeout for the cover-art HTTP fetch, in seconds.
    pub thumbnail_timeout_secs: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            dir: "downloads".to_string(),
            ytdlp_bin: "yt-dlp".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "320K".to_string(),
            search_prefix: "ytsearch1:".to_string(),
            thumbnail_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Startup volume on the 0..=100 scale.
    pub volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { volume: 50.0 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeSetting {
    #[serde(alias = "day")]
    Light,
    #[serde(alias = "night")]
    Dark,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Color theme the UI starts in. Toggled at runtime with `t`.
    pub theme: ThemeSetting,
    /// Period of the refresh tick driving the elapsed-time display, in
    /// milliseconds.
    pub tick_ms: u64,
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: ThemeSetting::Light,
            tick_ms: 500,
            header_text: " ~ encore! one more song ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions a rescan treats as audio (case-insensitive, without
    /// dot).
    pub extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
        }
    }
}
