//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{PlayerSettings, SessionState};
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, state: &SessionState) {
    let np = state.now_playing();

    let title = match &np.track {
        Some(track) => {
            let marker = if np.is_playing() { "▶" } else { "⏸" };
            match &np.artist {
                Some(artist) => format!(" {marker} {track} | {artist} "),
                None => format!(" {marker} {track} "),
            }
        }
        None => " No track playing ".to_string(),
    };

    let position = state.display_position_secs();
    let ratio = if np.duration_secs > 0.0 {
        (position / np.duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let time_str = format!(
        "{} / {}",
        format_duration(position),
        format_duration(np.duration_secs)
    );

    let settings_info = settings_summary(state.settings());

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(settings_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}

fn settings_summary(settings: &PlayerSettings) -> String {
    let shuffle = match settings.shuffle {
        Some(true) => "Shuffle: On",
        Some(false) => "Shuffle: Off",
        None => "Shuffle: ?",
    };
    let repeat = match settings.repeat {
        Some(mode) => format!("Repeat: {}", mode.keyword()),
        None => "Repeat: ?".to_string(),
    };
    let volume = match settings.volume {
        Some(v) => format!("Vol: {v}%"),
        None => "Vol: ?".to_string(),
    };
    format!(" {shuffle} | {repeat} | {volume} ")
}
