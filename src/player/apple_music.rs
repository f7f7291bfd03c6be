//! AppleScript client for the macOS Music app
//!
//! Every operation shells out to `/usr/bin/osascript` with a bounded
//! timeout. Script output is line-oriented text; the parsing helpers are
//! kept as free functions so they can be tested without a player present.

use std::time::Duration;

use tokio::process::Command;

use crate::model::{NowPlaying, PlaybackState, PlayerSettings, Playlist, RepeatMode};

use super::{PlayerControl, PlayerError, TransportOp};

const APP_NAME: &str = "Music";
const OSASCRIPT: &str = "/usr/bin/osascript";
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sentinel returned by scripts when the Music app is not running. Checked
/// in AppleScript rather than letting `tell` auto-launch the app.
const NOT_RUNNING: &str = "NOT_RUNNING";

#[derive(Clone, Debug, Default)]
pub struct AppleMusicPlayer;

impl AppleMusicPlayer {
    pub fn new() -> Self {
        Self
    }

    async fn run_script(&self, script: String) -> Result<String, PlayerError> {
        let output = tokio::time::timeout(
            SCRIPT_TIMEOUT,
            Command::new(OSASCRIPT)
                .arg("-e")
                .arg(&script)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| PlayerError::Script("AppleScript timed out".to_string()))?
        .map_err(|e| PlayerError::Script(format!("failed to run osascript: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            let err = classify_script_error(stderr.trim());
            tracing::warn!(error = %err, "osascript call failed");
            return Err(err);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout == NOT_RUNNING {
            return Err(PlayerError::ServiceUnavailable);
        }
        Ok(stdout)
    }
}

impl PlayerControl for AppleMusicPlayer {
    async fn list_playlists(&self) -> Result<Vec<Playlist>, PlayerError> {
        let script = format!(
            r#"set output to ""
tell application "{APP_NAME}"
    if it is not running then return "{NOT_RUNNING}"
    repeat with p in playlists
        set output to output & (persistent ID of p) & tab & (name of p) & linefeed
    end repeat
end tell
return output"#
        );
        let out = self.run_script(script).await?;
        let playlists = parse_playlist_lines(&out);
        tracing::debug!(count = playlists.len(), "listed playlists");
        Ok(playlists)
    }

    async fn play_playlist(&self, id: &str) -> Result<(), PlayerError> {
        let id = applescript_escape(id);
        let script = format!(
            r#"tell application "{APP_NAME}"
    if it is not running then return "{NOT_RUNNING}"
    play (first playlist whose persistent ID is "{id}")
end tell"#
        );
        self.run_script(script).await.map(|_| ())
    }

    async fn transport(&self, op: TransportOp) -> Result<(), PlayerError> {
        self.run_script(transport_script(op)).await.map(|_| ())
    }

    async fn now_playing(&self) -> Result<NowPlaying, PlayerError> {
        let script = format!(
            r#"tell application "{APP_NAME}"
    if it is not running then return "{NOT_RUNNING}"
    if player state is stopped then return "STOPPED"
    set t to current track
    return (name of t) & linefeed & (artist of t) & linefeed & (album of t) & linefeed & (player state as string) & linefeed & (duration of t) & linefeed & (player position)
end tell"#
        );
        let out = self.run_script(script).await?;
        Ok(parse_now_playing(&out))
    }

    async fn settings(&self) -> Result<PlayerSettings, PlayerError> {
        // Shuffle lives on the current playlist when there is one, repeat
        // on the app, volume on the system. Unreadable values come back as
        // UNKNOWN rather than failing the whole query.
        let script = format!(
            r#"set shufState to "UNKNOWN"
set repState to "UNKNOWN"
tell application "{APP_NAME}"
    if it is not running then return "{NOT_RUNNING}"
    try
        set shufState to (shuffle enabled of current playlist) as string
    on error
        try
            set shufState to shuffle enabled as string
        end try
    end try
    try
        set repState to song repeat as string
    end try
end tell
set vol to output volume of (get volume settings)
return shufState & linefeed & repState & linefeed & vol"#
        );
        let out = self.run_script(script).await?;
        Ok(parse_settings(&out))
    }
}

/// Build the AppleScript for one transport-style operation. Volume is a
/// system-level command and needs no app guard; everything else checks
/// that the Music app is running first.
fn transport_script(op: TransportOp) -> String {
    let body = match op {
        TransportOp::Play => "play".to_string(),
        TransportOp::Pause => "pause".to_string(),
        TransportOp::Stop => "stop".to_string(),
        TransportOp::Next => "next track".to_string(),
        TransportOp::Previous => "previous track".to_string(),
        TransportOp::ToggleShuffle => {
            return format!(
                r#"tell application "{APP_NAME}"
    if it is not running then return "{NOT_RUNNING}"
    try
        set p to current playlist
        set shuffle enabled of p to not shuffle enabled of p
    on error
        set shuffle enabled to not shuffle enabled
    end try
end tell"#
            );
        }
        TransportOp::SetRepeat(mode) => format!("set song repeat to {}", mode.keyword()),
        TransportOp::SetVolume(volume) => {
            return format!("set volume output volume {volume}");
        }
        TransportOp::SeekTo(position) => format!("set player position to {position}"),
    };
    format!(
        r#"tell application "{APP_NAME}"
    if it is not running then return "{NOT_RUNNING}"
    {body}
end tell"#
    )
}

/// Map osascript stderr to the error taxonomy. Error numbers are stable;
/// the message text varies by macOS locale, so both are checked.
fn classify_script_error(stderr: &str) -> PlayerError {
    let lowered = stderr.to_ascii_lowercase();
    if lowered.contains("-1743")
        || lowered.contains("not authorized")
        || lowered.contains("not authorised")
        || lowered.contains("not permitted")
    {
        PlayerError::PermissionDenied
    } else if lowered.contains("-1728") {
        PlayerError::NotFound
    } else if lowered.contains("-600") {
        PlayerError::ServiceUnavailable
    } else {
        PlayerError::Script(stderr.to_string())
    }
}

fn applescript_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\n', '\r'], " ")
}

fn parse_playlist_lines(out: &str) -> Vec<Playlist> {
    out.lines()
        .filter_map(|line| {
            let (id, name) = line.split_once('\t')?;
            let (id, name) = (id.trim(), name.trim());
            if id.is_empty() || name.is_empty() {
                return None;
            }
            Some(Playlist {
                id: id.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

fn parse_now_playing(out: &str) -> NowPlaying {
    if out == "STOPPED" || out.is_empty() {
        return NowPlaying::stopped();
    }

    let parts: Vec<&str> = out.split('\n').collect();
    if parts.len() < 4 {
        return NowPlaying::default();
    }

    let field = |raw: &str| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    NowPlaying {
        track: field(parts[0]),
        artist: field(parts[1]),
        album: field(parts[2]),
        state: PlaybackState::from_script(parts[3]),
        duration_secs: parts.get(4).map(|p| parse_script_number(p)).unwrap_or(0.0),
        position_secs: parts.get(5).map(|p| parse_script_number(p)).unwrap_or(0.0),
    }
}

fn parse_settings(out: &str) -> PlayerSettings {
    let mut lines = out.lines();
    let shuffle = match lines.next().map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    };
    let repeat = lines.next().and_then(RepeatMode::from_script);
    let volume = lines.next().map(parse_script_number).and_then(|v| {
        (0.0..=100.0).contains(&v).then_some(v as u8)
    });
    PlayerSettings {
        shuffle,
        repeat,
        volume,
    }
}

/// Parse a number from AppleScript output. Some locales use a comma as the
/// decimal separator, others as a thousands separator.
fn parse_script_number(raw: &str) -> f64 {
    let text = raw.trim();
    let normalized = if text.contains(',') && !text.contains('.') {
        text.replace(',', ".")
    } else {
        text.replace(',', "")
    };
    let filtered: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    filtered.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_playlist_lines() {
        let out = "ABC123\tChill\nDEF456\tFocus\n\nGHI789\tGym";
        let playlists = parse_playlist_lines(out);
        assert_eq!(playlists.len(), 3);
        assert_eq!(playlists[0].id, "ABC123");
        assert_eq!(playlists[0].name, "Chill");
        assert_eq!(playlists[2].name, "Gym");
    }

    #[test]
    fn skips_malformed_playlist_lines() {
        let out = "no-tab-here\nID1\tGood\n\t\n";
        let playlists = parse_playlist_lines(out);
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].name, "Good");
    }

    #[test]
    fn parses_full_now_playing_output() {
        let out = "Weightless\nMarconi Union\nAmbient 1\nplaying\n480.5\n12.25";
        let np = parse_now_playing(out);
        assert_eq!(np.track.as_deref(), Some("Weightless"));
        assert_eq!(np.artist.as_deref(), Some("Marconi Union"));
        assert_eq!(np.album.as_deref(), Some("Ambient 1"));
        assert_eq!(np.state, PlaybackState::Playing);
        assert_eq!(np.duration_secs, 480.5);
        assert_eq!(np.position_secs, 12.25);
    }

    #[test]
    fn stopped_sentinel_yields_stopped_state() {
        let np = parse_now_playing("STOPPED");
        assert_eq!(np.state, PlaybackState::Stopped);
        assert!(np.track.is_none());
    }

    #[test]
    fn short_output_yields_metadata_without_timing() {
        let np = parse_now_playing("Track\nArtist\nAlbum\npaused");
        assert_eq!(np.state, PlaybackState::Paused);
        assert_eq!(np.duration_secs, 0.0);
    }

    #[test]
    fn parses_locale_formatted_numbers() {
        assert_eq!(parse_script_number("480,5"), 480.5);
        assert_eq!(parse_script_number("1,480.5"), 1480.5);
        assert_eq!(parse_script_number(" 12.0 "), 12.0);
        assert_eq!(parse_script_number("garbage"), 0.0);
    }

    #[test]
    fn classifies_permission_errors() {
        let err = classify_script_error(
            "execution error: Not authorized to send Apple events to Music. (-1743)",
        );
        assert_eq!(err, PlayerError::PermissionDenied);
    }

    #[test]
    fn classifies_missing_playlist_as_not_found() {
        let err = classify_script_error("execution error: Can't get playlist 1. (-1728)");
        assert_eq!(err, PlayerError::NotFound);
    }

    #[test]
    fn unknown_errors_keep_their_message() {
        let err = classify_script_error("execution error: something odd (-10000)");
        assert!(matches!(err, PlayerError::Script(msg) if msg.contains("something odd")));
    }

    #[test]
    fn parses_settings_lines() {
        let settings = parse_settings("true\nall\n65");
        assert_eq!(settings.shuffle, Some(true));
        assert_eq!(settings.repeat, Some(RepeatMode::All));
        assert_eq!(settings.volume, Some(65));
    }

    #[test]
    fn unknown_settings_fields_stay_none() {
        let settings = parse_settings("UNKNOWN\nUNKNOWN\n-1");
        assert_eq!(settings.shuffle, None);
        assert_eq!(settings.repeat, None);
        assert_eq!(settings.volume, None);
    }

    #[test]
    fn transport_scripts_carry_the_right_verbs() {
        assert!(transport_script(TransportOp::Next).contains("next track"));
        assert!(transport_script(TransportOp::SetRepeat(RepeatMode::One))
            .contains("set song repeat to one"));
        assert!(transport_script(TransportOp::SeekTo(92.5))
            .contains("set player position to 92.5"));
        assert!(transport_script(TransportOp::ToggleShuffle).contains("shuffle enabled"));
    }

    #[test]
    fn volume_script_skips_the_app_guard() {
        let script = transport_script(TransportOp::SetVolume(40));
        assert_eq!(script, "set volume output volume 40");
    }

    #[test]
    fn escapes_quotes_and_newlines() {
        assert_eq!(applescript_escape(r#"My "Best" Mix"#), r#"My \"Best\" Mix"#);
        assert_eq!(applescript_escape("a\nb"), "a b");
    }
}
