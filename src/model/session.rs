//! Session state: the single source of truth for what the UI shows.
//!
//! The state record is exclusively owned by the render loop's task. The
//! dispatcher and the input router receive it by reference; background
//! player calls never touch it directly, they report back over the
//! completion channel instead, so no locking is needed anywhere.

use std::time::{Duration, Instant};

use super::playback::{NowPlaying, PlaybackTiming};
use super::types::{PlayerSettings, Playlist};

/// How long a status message stays up before reverting to "Ready".
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// Everything the UI currently shows, in one mutable record.
#[derive(Debug)]
pub struct SessionState {
    playlists: Vec<Playlist>,
    selected: usize,
    now_playing: NowPlaying,
    timing: PlaybackTiming,
    settings: PlayerSettings,
    status: Option<StatusMessage>,
    pub playlists_loaded: bool,
    pub help_open: bool,
    pub should_quit: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            playlists: Vec::new(),
            selected: 0,
            now_playing: NowPlaying::default(),
            timing: PlaybackTiming::default(),
            settings: PlayerSettings::default(),
            status: None,
            playlists_loaded: false,
            help_open: false,
            should_quit: false,
        }
    }

    // ── Playlists & selection ───────────────────────────────────────────

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Replace the playlist list wholesale and re-establish the selection
    /// invariant against the new length.
    pub fn replace_playlists(&mut self, playlists: Vec<Playlist>) {
        self.playlists = playlists;
        self.playlists_loaded = true;
        self.clamp_selection();
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_playlist(&self) -> Option<&Playlist> {
        self.playlists.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.playlists.len() {
            self.selected += 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.playlists.len().saturating_sub(1);
    }

    pub fn select_index(&mut self, index: usize) {
        if index < self.playlists.len() {
            self.selected = index;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.playlists.len() {
            self.selected = self.playlists.len().saturating_sub(1);
        }
    }

    // ── Now playing ─────────────────────────────────────────────────────

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    /// Replace the now-playing snapshot wholesale and re-anchor the local
    /// progress extrapolation.
    pub fn set_now_playing(&mut self, now_playing: NowPlaying) {
        self.timing.sync(&now_playing, Instant::now());
        self.now_playing = now_playing;
    }

    /// Position to display, extrapolated between polls while playing.
    pub fn display_position_secs(&self) -> f64 {
        self.timing.current_position_secs(Instant::now())
    }

    /// Move the local position immediately after a seek command is issued,
    /// so the gauge does not snap back while the command is in flight.
    pub fn seek_to(&mut self, position_secs: f64) {
        let max = self.now_playing.duration_secs.max(0.0);
        self.now_playing.position_secs = position_secs.clamp(0.0, max);
        self.timing.sync(&self.now_playing, Instant::now());
    }

    // ── Player settings ─────────────────────────────────────────────────

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PlayerSettings) {
        self.settings = settings;
    }

    /// Optimistic volume update; the next settings poll re-syncs it.
    pub fn set_volume(&mut self, volume: u8) {
        self.settings.volume = Some(volume);
    }

    // ── Status line ─────────────────────────────────────────────────────

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    pub fn status_text(&self) -> &str {
        self.status.as_ref().map(|s| s.text.as_str()).unwrap_or("Ready")
    }

    /// Periodic housekeeping from the UI tick. Returns true when the frame
    /// needs a redraw (status expired, or a playing track's progress moved).
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.timing.is_playing();
        if let Some(status) = &self.status {
            if now.duration_since(status.set_at) >= STATUS_CLEAR_AFTER {
                self.status = None;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Playlist> {
        names
            .iter()
            .map(|n| Playlist {
                id: format!("id-{n}"),
                name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn selection_stays_in_bounds_for_any_move_sequence() {
        let mut state = SessionState::new();
        state.replace_playlists(named(&["a", "b", "c"]));

        for _ in 0..10 {
            state.move_down();
            assert!(state.selected_index() < 3);
        }
        assert_eq!(state.selected_index(), 2);

        for _ in 0..10 {
            state.move_up();
        }
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn move_down_saturates_never_wraps() {
        let mut state = SessionState::new();
        state.replace_playlists(named(&["a", "b", "c"]));
        for _ in 0..3 {
            state.move_down();
        }
        assert_eq!(state.selected_index(), 2);
    }

    #[test]
    fn empty_list_keeps_index_at_zero() {
        let mut state = SessionState::new();
        state.move_down();
        state.move_up();
        state.select_last();
        state.select_index(5);
        assert_eq!(state.selected_index(), 0);
        assert!(state.selected_playlist().is_none());
    }

    #[test]
    fn selection_clamps_when_list_shrinks() {
        let mut state = SessionState::new();
        state.replace_playlists(named(&["a", "b", "c", "d"]));
        state.select_last();
        assert_eq!(state.selected_index(), 3);

        state.replace_playlists(named(&["a", "b"]));
        assert_eq!(state.selected_index(), 1);

        state.replace_playlists(Vec::new());
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn seek_clamps_to_track_bounds() {
        let mut state = SessionState::new();
        state.set_now_playing(NowPlaying {
            track: Some("Track".into()),
            duration_secs: 200.0,
            position_secs: 100.0,
            ..NowPlaying::default()
        });

        state.seek_to(250.0);
        assert_eq!(state.now_playing().position_secs, 200.0);

        state.seek_to(-5.0);
        assert_eq!(state.now_playing().position_secs, 0.0);
    }

    #[test]
    fn status_clears_after_timeout() {
        let mut state = SessionState::new();
        state.set_status("Loaded 3 playlists.");
        assert_eq!(state.status_text(), "Loaded 3 playlists.");

        assert!(!state.tick(Instant::now()));
        assert!(state.tick(Instant::now() + STATUS_CLEAR_AFTER));
        assert_eq!(state.status_text(), "Ready");
    }
}
