//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.
//! Everything draws from [`App`] state; no widget holds state of its own.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, InputMode, Notice, NoticeLevel};
use crate::audio::PlaybackEngine;
use crate::config::ThemeSetting;
use crate::player::Artwork;

/// Colors for one theme. Mirrors the classic light/dark pairing: dark is
/// near-black with white text, light is the inverse.
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
}

impl Theme {
    pub fn for_setting(setting: ThemeSetting) -> Self {
        match setting {
            ThemeSetting::Dark => Theme {
                bg: Color::Rgb(0x1e, 0x1e, 0x1e),
                fg: Color::White,
                accent: Color::LightCyan,
            },
            ThemeSetting::Light => Theme {
                bg: Color::White,
                fg: Color::Black,
                accent: Color::Blue,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().bg(self.bg).fg(self.fg)
    }
}

const CONTROLS: &str = "[j/k] up/down | [enter] play selected | [space/p] play/pause | \
    [h/l] prev/next | [-/+] volume | [/] search & download | [r] rescan | \
    [t] theme | [K] metadata | [q] quit";

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute the visible window of a list of `total` items in a viewport of
/// `height` rows, centering the selection when the list overflows.
///
/// Returns `(start, end, selected_pos_in_visible)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn status_text<E: PlaybackEngine>(app: &App<E>) -> String {
    let mut parts: Vec<String> = Vec::new();

    let state = app.player.state();
    match app.player.current_track() {
        Some(track) => {
            let time = match state.duration {
                Some(total) => format!("{} / {}", format_mmss(state.elapsed), format_mmss(total)),
                None => format_mmss(state.elapsed),
            };
            parts.push(format!("Song: {} [{}]", track.title, time));
            parts.push(if state.paused { "Paused" } else { "Playing" }.to_string());
        }
        None => parts.push("Stopped".to_string()),
    }

    parts.push(format!("Volume: {:.0}%", state.volume));

    match app.player.artwork() {
        Artwork::Pending => parts.push("Cover: fetching".to_string()),
        Artwork::Embedded(_) | Artwork::Fetched(_) => parts.push("Cover: yes".to_string()),
        Artwork::Placeholder => {}
    }

    parts.push(format!("Tracks: {}", app.player.playlist().len()));
    parts.join(" • ")
}

fn download_line<E: PlaybackEngine>(frame: &mut Frame, app: &App<E>, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" download ")
        .style(theme.base());

    match app.last_progress {
        Some(p) => match p.total_bytes {
            Some(total) if total > 0 => {
                let ratio = (p.downloaded_bytes as f64 / total as f64).clamp(0.0, 1.0);
                let gauge = Gauge::default()
                    .block(block)
                    .gauge_style(Style::default().fg(theme.accent).bg(theme.bg))
                    .ratio(ratio)
                    .label(format!("{:.0}%", ratio * 100.0));
                frame.render_widget(gauge, area);
            }
            // No announced size: show raw bytes instead of a fake ratio.
            _ => {
                let text = format!("downloading… {} bytes", p.downloaded_bytes);
                frame.render_widget(Paragraph::new(text).block(block), area);
            }
        },
        None => {
            frame.render_widget(Paragraph::new("starting download…").block(block), area);
        }
    }
}

fn notice_popup(frame: &mut Frame, notice: &Notice, theme: &Theme, area: Rect) {
    let title = match notice.level {
        NoticeLevel::Warning => " warning (any key closes) ",
        NoticeLevel::Error => " error (any key closes) ",
    };
    let border = match notice.level {
        NoticeLevel::Warning => Style::default().fg(Color::Yellow),
        NoticeLevel::Error => Style::default().fg(Color::Red),
    };
    let popup_area = centered_rect_sized(60, 7, area);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(notice.text.as_str())
        .style(theme.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title)
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw<E: PlaybackEngine>(frame: &mut Frame, app: &App<E>) {
    let theme = Theme::for_setting(app.theme);
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let searching = app.mode == InputMode::Search;
    let downloading = app.download_in_flight;

    let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
    if searching {
        constraints.push(Constraint::Length(3));
    }
    if downloading {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(4));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());
    let mut next = 0usize;
    let mut chunk = || {
        let area = chunks[next];
        next += 1;
        area
    };

    // Header
    let header = Paragraph::new(app.header_text.as_str())
        .style(theme.base())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunk());

    // Status box
    let status = Paragraph::new(status_text(app))
        .style(theme.base())
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunk());

    // Search input
    if searching {
        let input = Paragraph::new(format!("{}_", app.search_query))
            .style(theme.base())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.accent))
                    .title(" search (enter downloads, esc cancels) "),
            );
        frame.render_widget(input, chunk());
    }

    // Download progress
    if downloading {
        download_line(frame, app, &theme, chunk());
    }

    // Main list, windowed around the cursor
    let list_area = chunk();
    {
        let playlist = app.player.playlist();
        let total = playlist.len();
        let height = list_area.height.saturating_sub(2) as usize;
        let (start, end, selected_pos) = visible_window(total, height, app.selected);

        let playing = app.player.state().current;
        let visible_items: Vec<ListItem> = playlist
            .iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, track)| {
                let marker = if playing == Some(i) { "♪ " } else { "  " };
                ListItem::new(format!("{marker}{}", track.title))
            })
            .collect();

        let list = List::new(visible_items)
            .style(theme.base())
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos));
        }
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    // Footer
    let footer = Paragraph::new(CONTROLS)
        .style(theme.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunk());

    // Overlay metadata popup (keeps list visible under it)
    if app.show_metadata {
        let popup_area = centered_rect_sized(72, 9, list_area);
        frame.render_widget(Clear, popup_area);

        let meta = match app.player.playlist().get(app.selected) {
            Some(track) => {
                let (duration, cover) = if app.player.state().current == Some(app.selected) {
                    let state = app.player.state();
                    let cover = match app.player.artwork() {
                        Artwork::Embedded(b) => format!("embedded ({} bytes)", b.len()),
                        Artwork::Fetched(b) => format!("fetched ({} bytes)", b.len()),
                        Artwork::Pending => "fetching…".to_string(),
                        Artwork::Placeholder => "none".to_string(),
                    };
                    let duration = state
                        .duration
                        .map(format_mmss)
                        .unwrap_or_else(|| "-".to_string());
                    (duration, cover)
                } else {
                    ("-".to_string(), "-".to_string())
                };
                format!(
                    "Title: {}\nDuration: {}\nCover: {}\nSource: {}\nPath: {}",
                    track.title,
                    duration,
                    cover,
                    track.thumbnail_url.as_deref().unwrap_or("local file"),
                    track.path.display()
                )
            }
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .style(theme.base())
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    // A notice blocks everything until dismissed, so draw it last.
    if let Some(notice) = &app.notice {
        notice_popup(frame, notice, &theme, frame.area());
    }
}
