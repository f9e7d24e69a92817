mod acquire;
mod app;
mod audio;
mod config;
mod player;
mod playlist;
mod runtime;
mod tags;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    runtime::run()
}

/// Log to a file; the terminal belongs to the TUI.
///
/// The log lands under `$XDG_STATE_HOME/encore/` (or `~/.local/state/encore/`),
/// falling back to `./encore.log`. Verbosity comes from `ENCORE_LOG` using
/// the usual filter syntax; the default is `info`.
fn init_logging() {
    use std::fs::{self, File};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tracing_subscriber::EnvFilter;

    let state_dir = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .map(|p| p.join("encore"));

    let file = state_dir
        .and_then(|dir| {
            fs::create_dir_all(&dir).ok()?;
            File::create(dir.join("encore.log")).ok()
        })
        .or_else(|| File::create("encore.log").ok());

    // No writable location at all: run without logging.
    let Some(file) = file else { return };

    let filter = EnvFilter::try_from_env("ENCORE_LOG")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}
