//! Transport button strip

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::controller::Intent;
use crate::model::SessionState;
use super::Button;

/// Render the clickable transport buttons and return them with their
/// screen regions for mouse hit-testing.
pub fn render_controls(frame: &mut Frame, area: Rect, state: &SessionState) -> Vec<Button> {
    let play_pause_label = if state.now_playing().is_playing() {
        "⏸ Pause"
    } else {
        "▶ Play"
    };

    let specs: [(&'static str, Intent); 6] = [
        ("⏮ Prev", Intent::Previous),
        (play_pause_label, Intent::PlayPause),
        ("⏭ Next", Intent::Next),
        ("⏹ Stop", Intent::Stop),
        ("↻ Refresh", Intent::Refresh),
        ("✕ Quit", Intent::Quit),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(area);

    specs
        .into_iter()
        .zip(chunks.iter())
        .map(|((label, intent), &chunk)| {
            let widget = Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(widget, chunk);
            Button {
                label,
                intent,
                area: chunk,
            }
        })
        .collect()
}
