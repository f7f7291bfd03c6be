//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the
//! application. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (playlists, playback state)
//! - `playback`: Now-playing snapshot and progress extrapolation
//! - `session`: The session state record owned by the render loop

mod playback;
mod session;
mod types;

pub use playback::NowPlaying;
pub use session::SessionState;
pub use types::{PlaybackState, PlayerSettings, Playlist, RepeatMode};
