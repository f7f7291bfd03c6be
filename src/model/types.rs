//! Core type definitions for the application

/// A playlist in the Music app's library.
///
/// `id` is the persistent ID reported by the Music app. It is treated as an
/// opaque token and only ever handed back to the player when starting
/// playback. The playlist list is replaced wholesale on every refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

/// Player state as reported by the Music app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
    #[default]
    Unknown,
}

impl PlaybackState {
    /// Parse the `player state as string` value from AppleScript output.
    pub fn from_script(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "playing" => PlaybackState::Playing,
            "paused" => PlaybackState::Paused,
            "stopped" => PlaybackState::Stopped,
            _ => PlaybackState::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Unknown => "Unknown",
        }
    }
}

/// Song repeat mode as reported by the Music app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatMode {
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Parse the `song repeat as string` value from AppleScript output.
    pub fn from_script(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Some(RepeatMode::Off),
            "all" => Some(RepeatMode::All),
            "one" => Some(RepeatMode::One),
            _ => None,
        }
    }

    /// The cycle order used by the repeat key: off → all → one → off.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    /// Keyword accepted by `set song repeat to`, also used in status text.
    pub fn keyword(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

/// Shuffle, repeat and volume as last reported by the player. `None`
/// fields mean the value could not be determined (e.g. no current
/// playlist to read shuffle from). Volume is the system output volume,
/// 0-100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerSettings {
    pub shuffle: Option<bool>,
    pub repeat: Option<RepeatMode>,
    pub volume: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_state_parses_known_values() {
        assert_eq!(PlaybackState::from_script("playing"), PlaybackState::Playing);
        assert_eq!(PlaybackState::from_script("PAUSED"), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_script(" stopped "), PlaybackState::Stopped);
    }

    #[test]
    fn playback_state_defaults_to_unknown() {
        assert_eq!(PlaybackState::from_script(""), PlaybackState::Unknown);
        assert_eq!(PlaybackState::from_script("rewinding"), PlaybackState::Unknown);
    }

    #[test]
    fn repeat_mode_parses_script_values() {
        assert_eq!(RepeatMode::from_script("off"), Some(RepeatMode::Off));
        assert_eq!(RepeatMode::from_script("none"), Some(RepeatMode::Off));
        assert_eq!(RepeatMode::from_script("ALL"), Some(RepeatMode::All));
        assert_eq!(RepeatMode::from_script("one"), Some(RepeatMode::One));
        assert_eq!(RepeatMode::from_script("UNKNOWN"), None);
    }

    #[test]
    fn repeat_mode_cycles_off_all_one() {
        assert_eq!(RepeatMode::Off.next(), RepeatMode::All);
        assert_eq!(RepeatMode::All.next(), RepeatMode::One);
        assert_eq!(RepeatMode::One.next(), RepeatMode::Off);
    }
}
