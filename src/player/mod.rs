//! Player module - the boundary to the external Music app
//!
//! The rest of the application only sees the `PlayerControl` trait; the
//! production implementation in `apple_music` drives the Music app over
//! AppleScript. Tests script a fake implementation instead.

mod apple_music;

use std::future::Future;

use thiserror::Error;

use crate::model::{NowPlaying, PlayerSettings, Playlist, RepeatMode};

pub use apple_music::AppleMusicPlayer;

/// A single transport-style operation against the player. Besides the
/// classic transport verbs this covers the playback-settings commands,
/// which share the one-in-flight-at-a-time discipline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransportOp {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    ToggleShuffle,
    SetRepeat(RepeatMode),
    /// System output volume, 0-100.
    SetVolume(u8),
    /// Absolute player position in seconds.
    SeekTo(f64),
}

impl TransportOp {
    /// Label used in status messages and logs ("Next track.").
    pub fn label(self) -> &'static str {
        match self {
            TransportOp::Play => "Play",
            TransportOp::Pause => "Pause",
            TransportOp::Stop => "Stop",
            TransportOp::Next => "Next track",
            TransportOp::Previous => "Previous track",
            TransportOp::ToggleShuffle => "Toggle shuffle",
            TransportOp::SetRepeat(_) => "Set repeat",
            TransportOp::SetVolume(_) => "Set volume",
            TransportOp::SeekTo(_) => "Seek",
        }
    }
}

/// Errors from the player boundary.
///
/// All of these are recoverable: the dispatcher turns them into a status
/// message and the session continues.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Music app is not running.")]
    ServiceUnavailable,
    #[error(
        "Permission denied. Enable Automation for your terminal in \
         System Settings > Privacy & Security > Automation."
    )]
    PermissionDenied,
    #[error("Playlist not found. Try refreshing.")]
    NotFound,
    #[error("AppleScript error: {0}")]
    Script(String),
}

/// Request/response contract with the media player. Calls may block their
/// task for up to a few seconds; the dispatcher always runs them on spawned
/// tasks so the render loop keeps reading input.
pub trait PlayerControl: Clone + Send + Sync + 'static {
    fn list_playlists(&self) -> impl Future<Output = Result<Vec<Playlist>, PlayerError>> + Send;

    fn play_playlist(&self, id: &str) -> impl Future<Output = Result<(), PlayerError>> + Send;

    fn transport(&self, op: TransportOp) -> impl Future<Output = Result<(), PlayerError>> + Send;

    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, PlayerError>> + Send;

    fn settings(&self) -> impl Future<Output = Result<PlayerSettings, PlayerError>> + Send;
}
