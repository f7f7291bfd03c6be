//! Playback-related types and state management

use std::time::Instant;

use super::types::PlaybackState;

/// Snapshot of what the Music app is currently playing.
///
/// Replaced wholesale on every refresh and after every resolved transport
/// command. `None` fields mean the player did not report a value (e.g. a
/// stream without artist metadata).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NowPlaying {
    pub track: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub state: PlaybackState,
    pub duration_secs: f64,
    pub position_secs: f64,
}

impl NowPlaying {
    pub fn stopped() -> Self {
        Self {
            state: PlaybackState::Stopped,
            ..Self::default()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

/// Internal timing state for smooth progress updates between polls.
///
/// The player is only polled every couple of seconds; while a track is
/// playing the displayed position advances locally from the last reported
/// position so the progress gauge does not stall.
#[derive(Clone, Debug)]
pub struct PlaybackTiming {
    position_secs: f64,
    duration_secs: f64,
    is_playing: bool,
    last_update: Instant,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            position_secs: 0.0,
            duration_secs: 0.0,
            is_playing: false,
            last_update: Instant::now(),
        }
    }
}

impl PlaybackTiming {
    /// Re-anchor the timing state on a fresh snapshot from the player.
    pub fn sync(&mut self, now_playing: &NowPlaying, now: Instant) {
        self.position_secs = now_playing.position_secs;
        self.duration_secs = now_playing.duration_secs;
        self.is_playing = now_playing.is_playing();
        self.last_update = now;
    }

    /// Current position, extrapolated while playing, clamped to duration.
    pub fn current_position_secs(&self, now: Instant) -> f64 {
        if self.is_playing && self.duration_secs > 0.0 {
            let elapsed = now.duration_since(self.last_update).as_secs_f64();
            (self.position_secs + elapsed).min(self.duration_secs)
        } else {
            self.position_secs
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }
}
