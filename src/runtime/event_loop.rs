use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::acquire::WorkerEvent;
use crate::app::{App, InputMode};
use crate::audio::PlaybackEngine;
use crate::config;
use crate::ui;

/// Main terminal event loop: applies background-worker results, drives the
/// refresh tick, draws the UI and handles input. Returns `Ok(())` when
/// shutdown is requested.
pub fn run<E: PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
    worker_rx: &Receiver<WorkerEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_period = Duration::from_millis(settings.ui.tick_ms);
    let mut last_tick = Instant::now();

    loop {
        // Background results first, so this frame already shows them.
        while let Ok(ev) = worker_rx.try_recv() {
            app.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_period {
            app.player.tick();
            last_tick = Instant::now();
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, app);
                if app.should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key_event<E: PlaybackEngine>(key: KeyEvent, app: &mut App<E>) {
    // A visible notice swallows the keypress that dismisses it.
    if app.notice.is_some() {
        app.dismiss_notice();
        return;
    }

    if app.mode == InputMode::Search {
        match key.code {
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Enter => app.submit_search(),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Char(c) => app.search_input(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play_pause(),
        KeyCode::Char('l') | KeyCode::Right => app.next_track(),
        KeyCode::Char('h') | KeyCode::Left => app.previous_track(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_up(),
        KeyCode::Char('-') => app.volume_down(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('r') => app.rescan(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('K') => app.toggle_metadata(),
        _ => {}
    }
}
