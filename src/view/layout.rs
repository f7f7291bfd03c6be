//! Layout rendering (playlist list, now-playing panel)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::SessionState;
use super::utils::truncate_string;

/// Render the playlist list. Returns the inner row area and the scroll
/// offset actually used, so mouse clicks can be mapped back to indices.
pub fn render_playlists(frame: &mut Frame, area: Rect, state: &SessionState) -> (Rect, usize) {
    let title = if state.playlists_loaded {
        format!(" Playlists ({}) ", state.playlists().len())
    } else {
        " Playlists (loading...) ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);

    let items: Vec<ListItem> = state
        .playlists()
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            let style = if i == state.selected_index() {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(truncate_string(&playlist.name, inner.width as usize)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !state.playlists().is_empty() {
        list_state.select(Some(state.selected_index()));
    }

    frame.render_stateful_widget(list, area, &mut list_state);

    (inner, list_state.offset())
}

pub fn render_now_playing(frame: &mut Frame, area: Rect, state: &SessionState) {
    let np = state.now_playing();

    let mut lines = vec![Line::default()];
    match &np.track {
        Some(track) => {
            lines.push(Line::from(vec![
                Span::styled("  Track:  ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    track.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Artist: ", Style::default().fg(Color::DarkGray)),
                Span::raw(np.artist.clone().unwrap_or_default()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Album:  ", Style::default().fg(Color::DarkGray)),
                Span::raw(np.album.clone().unwrap_or_default()),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  Nothing playing",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("  State:  ", Style::default().fg(Color::DarkGray)),
        Span::styled(np.state.label(), Style::default().fg(Color::Cyan)),
    ]));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  ↑/↓ select   Enter play   Space play/pause",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        "  n/p next/prev   s stop   r refresh   ? help   q quit",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now Playing "),
    );
    frame.render_widget(panel, area);
}
