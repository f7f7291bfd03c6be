//! Event-to-intent routing
//!
//! Both routers are pure functions of the event plus the most recently
//! rendered frame layout; they never touch session state.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::view::FrameLayout;

use super::Intent;

/// Fixed keyboard table. Unrecognized keys yield `None`.
pub fn route_key(key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Intent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Intent::MoveDown),
        KeyCode::Char('g') => Some(Intent::SelectFirst),
        KeyCode::Char('G') => Some(Intent::SelectLast),
        KeyCode::Enter => Some(Intent::ActivateSelection),
        KeyCode::Char(' ') => Some(Intent::PlayPause),
        KeyCode::Char('o') | KeyCode::Char('O') => Some(Intent::Play),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Intent::Pause),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Intent::Stop),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::Next),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Intent::Previous),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Intent::ToggleShuffle),
        KeyCode::Char('v') => Some(Intent::CycleRepeat),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Intent::VolumeUp),
        KeyCode::Char('-') => Some(Intent::VolumeDown),
        KeyCode::Right => Some(Intent::SeekForward),
        KeyCode::Left => Some(Intent::SeekBackward),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Refresh),
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => Some(Intent::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Intent::Quit),
        _ => None,
    }
}

/// Test a left-click against the last rendered frame: control-strip
/// buttons first, then the playlist rows. Anything else is ignored.
pub fn route_mouse(event: MouseEvent, layout: &FrameLayout) -> Option<Intent> {
    if event.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }

    let (col, row) = (event.column, event.row);

    for button in &layout.buttons {
        if layout_hit(button.area, col, row) {
            return Some(button.intent);
        }
    }

    if layout_hit(layout.playlist_area, col, row) {
        let clicked = layout.playlist_offset + (row - layout.playlist_area.y) as usize;
        return Some(Intent::SelectIndex(clicked));
    }

    None
}

fn layout_hit(area: ratatui::layout::Rect, col: u16, row: u16) -> bool {
    area.width > 0
        && area.height > 0
        && col >= area.x
        && col < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Button;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn key_table_maps_navigation_and_transport() {
        assert_eq!(route_key(key(KeyCode::Up)), Some(Intent::MoveUp));
        assert_eq!(route_key(key(KeyCode::Char('j'))), Some(Intent::MoveDown));
        assert_eq!(route_key(key(KeyCode::Enter)), Some(Intent::ActivateSelection));
        assert_eq!(route_key(key(KeyCode::Char(' '))), Some(Intent::PlayPause));
        assert_eq!(route_key(key(KeyCode::Char('n'))), Some(Intent::Next));
        assert_eq!(route_key(key(KeyCode::Char('q'))), Some(Intent::Quit));
    }

    #[test]
    fn key_table_maps_playback_settings() {
        assert_eq!(route_key(key(KeyCode::Char('x'))), Some(Intent::ToggleShuffle));
        assert_eq!(route_key(key(KeyCode::Char('v'))), Some(Intent::CycleRepeat));
        assert_eq!(route_key(key(KeyCode::Char('+'))), Some(Intent::VolumeUp));
        assert_eq!(route_key(key(KeyCode::Char('='))), Some(Intent::VolumeUp));
        assert_eq!(route_key(key(KeyCode::Char('-'))), Some(Intent::VolumeDown));
        assert_eq!(route_key(key(KeyCode::Right)), Some(Intent::SeekForward));
        assert_eq!(route_key(key(KeyCode::Left)), Some(Intent::SeekBackward));
    }

    #[test]
    fn unrecognized_keys_map_to_none() {
        assert_eq!(route_key(key(KeyCode::Char('z'))), None);
        assert_eq!(route_key(key(KeyCode::F(5))), None);
        assert_eq!(route_key(key(KeyCode::Tab)), None);
    }

    #[test]
    fn ctrl_c_quits_other_ctrl_keys_ignored() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(route_key(ctrl('c')), Some(Intent::Quit));
        assert_eq!(route_key(ctrl('n')), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut ev = key(KeyCode::Char('q'));
        ev.kind = KeyEventKind::Release;
        assert_eq!(route_key(ev), None);
    }

    #[test]
    fn click_on_button_yields_its_intent() {
        let layout = FrameLayout {
            buttons: vec![Button {
                label: "Next",
                intent: Intent::Next,
                area: Rect::new(10, 20, 8, 3),
            }],
            playlist_area: Rect::new(0, 0, 0, 0),
            playlist_offset: 0,
        };
        assert_eq!(route_mouse(click(12, 21), &layout), Some(Intent::Next));
        assert_eq!(route_mouse(click(30, 21), &layout), None);
    }

    #[test]
    fn click_on_playlist_row_selects_with_scroll_offset() {
        let layout = FrameLayout {
            buttons: vec![],
            playlist_area: Rect::new(2, 5, 30, 10),
            playlist_offset: 4,
        };
        assert_eq!(
            route_mouse(click(10, 7), &layout),
            Some(Intent::SelectIndex(6))
        );
    }

    #[test]
    fn non_left_click_is_ignored() {
        let layout = FrameLayout {
            buttons: vec![],
            playlist_area: Rect::new(0, 0, 50, 50),
            playlist_offset: 0,
        };
        let ev = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(route_mouse(ev, &layout), None);
    }
}
