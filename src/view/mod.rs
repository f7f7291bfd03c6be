//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, truncation)
//! - `layout`: Playlist list and now-playing panel
//! - `controls`: Transport button strip
//! - `progress`: Progress bar rendering
//! - `overlays`: Modal overlays (help popup)
//!
//! Rendering returns a [`FrameLayout`] describing where the clickable
//! regions ended up, so mouse events can be resolved against the frame
//! that is actually on screen.

mod controls;
mod layout;
mod overlays;
mod progress;
mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::controller::Intent;
use crate::model::SessionState;

/// A clickable button with its rendered screen region.
#[derive(Clone, Debug)]
pub struct Button {
    pub label: &'static str,
    pub intent: Intent,
    pub area: Rect,
}

/// Hit-regions of the most recently rendered frame.
#[derive(Clone, Debug, Default)]
pub struct FrameLayout {
    pub buttons: Vec<Button>,
    /// Inner area of the playlist list (rows only, no borders).
    pub playlist_area: Rect,
    /// Scroll offset of the list when it was drawn; a clicked row maps to
    /// `playlist_offset + (row - playlist_area.y)`.
    pub playlist_offset: usize,
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, state: &SessionState, busy: bool) -> FrameLayout {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Playlists + now playing
                Constraint::Length(3), // Transport buttons
                Constraint::Length(3), // Progress bar
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // Playlist list
                Constraint::Percentage(60), // Now playing panel
            ])
            .split(chunks[0]);

        let (playlist_area, playlist_offset) =
            layout::render_playlists(frame, main_chunks[0], state);
        layout::render_now_playing(frame, main_chunks[1], state);

        let buttons = controls::render_controls(frame, chunks[1], state);

        progress::render_progress_bar(frame, chunks[2], state);

        render_status_line(frame, chunks[3], state, busy);

        if state.help_open {
            overlays::render_help_popup(frame);
        }

        FrameLayout {
            buttons,
            playlist_area,
            playlist_offset,
        }
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &SessionState, busy: bool) {
    let mut spans = vec![Span::styled(
        format!(" {}", state.status_text()),
        Style::default().fg(Color::Cyan),
    )];
    if busy {
        spans.push(Span::styled(
            "  ⏳ working...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
