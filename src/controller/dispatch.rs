//! Command dispatch with in-flight call tracking
//!
//! Navigation intents mutate session state synchronously. Player intents
//! spawn a background task and report back over the completion channel,
//! tagged with a sequence number and category so the render loop can apply
//! them in arrival order and discard stale results. At most one call per
//! category is outstanding at a time; a refresh requested while one is
//! pending is coalesced into a single queued refresh.

use tokio::sync::mpsc;

use crate::model::{NowPlaying, PlaybackState, PlayerSettings, Playlist, RepeatMode, SessionState};
use crate::player::{PlayerControl, PlayerError, TransportOp};

use super::Intent;

/// Volume step per key press, percent.
const VOLUME_STEP: i16 = 5;
/// Seek step per key press, seconds.
const SEEK_STEP: f64 = 10.0;

/// Result of a background player call, delivered to the render loop's
/// wait-set. Transport and play-playlist completions carry re-fetched
/// state on success (now-playing, and for transports the settings too);
/// it is merged rather than assumed optimistically. `None` means the
/// follow-up query failed while the command itself was acknowledged.
#[derive(Debug)]
pub enum Completion {
    Refresh {
        seq: u64,
        playlists: Result<Vec<Playlist>, PlayerError>,
        now_playing: Result<NowPlaying, PlayerError>,
        settings: Result<PlayerSettings, PlayerError>,
    },
    Transport {
        seq: u64,
        op: TransportOp,
        result: Result<(Option<NowPlaying>, Option<PlayerSettings>), PlayerError>,
    },
    PlayPlaylist {
        seq: u64,
        name: String,
        result: Result<Option<NowPlaying>, PlayerError>,
    },
}

/// Per-category in-flight bookkeeping. `latest_seq` survives completion so
/// a late result from a superseded call can still be recognized as stale.
#[derive(Debug, Default)]
struct CallSlot {
    latest_seq: u64,
    inflight: bool,
}

impl CallSlot {
    fn issue(&mut self, seq: u64) {
        self.latest_seq = seq;
        self.inflight = true;
    }

    /// True when this completion is current; stale completions are dropped.
    fn complete(&mut self, seq: u64) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        self.inflight = false;
        true
    }
}

pub struct Dispatcher<P: PlayerControl> {
    player: P,
    tx: mpsc::Sender<Completion>,
    next_seq: u64,
    transport: CallSlot,
    play_playlist: CallSlot,
    refresh: CallSlot,
    refresh_queued: bool,
}

impl<P: PlayerControl> Dispatcher<P> {
    pub fn new(player: P, tx: mpsc::Sender<Completion>) -> Self {
        Self {
            player,
            tx,
            next_seq: 0,
            transport: CallSlot::default(),
            play_playlist: CallSlot::default(),
            refresh: CallSlot::default(),
            refresh_queued: false,
        }
    }

    /// Whether any player call is outstanding (the session's
    /// "awaiting command" phase; the UI stays responsive throughout).
    pub fn is_busy(&self) -> bool {
        self.transport.inflight || self.play_playlist.inflight || self.refresh.inflight
    }

    /// Handle one intent. Returns true when the frame needs a redraw.
    pub fn dispatch(&mut self, intent: Intent, state: &mut SessionState) -> bool {
        match intent {
            Intent::MoveUp => {
                state.move_up();
                true
            }
            Intent::MoveDown => {
                state.move_down();
                true
            }
            Intent::SelectFirst => {
                state.select_first();
                true
            }
            Intent::SelectLast => {
                state.select_last();
                true
            }
            Intent::SelectIndex(index) => {
                state.select_index(index);
                true
            }
            Intent::ToggleHelp => {
                state.help_open = !state.help_open;
                true
            }
            Intent::Quit => {
                tracing::info!("quit requested");
                state.should_quit = true;
                true
            }
            Intent::Refresh => self.handle_refresh(),
            Intent::ActivateSelection => self.handle_activate(state),
            Intent::PlayPause => {
                // Resolve the toggle against the last known state; the
                // completion merges whatever the player actually reports.
                let op = if state.now_playing().state == PlaybackState::Playing {
                    TransportOp::Pause
                } else {
                    TransportOp::Play
                };
                self.handle_transport(op, state)
            }
            Intent::Play => self.handle_transport(TransportOp::Play, state),
            Intent::Pause => self.handle_transport(TransportOp::Pause, state),
            Intent::Stop => self.handle_transport(TransportOp::Stop, state),
            Intent::Next => self.handle_transport(TransportOp::Next, state),
            Intent::Previous => self.handle_transport(TransportOp::Previous, state),
            Intent::ToggleShuffle => self.handle_transport(TransportOp::ToggleShuffle, state),
            Intent::CycleRepeat => self.handle_cycle_repeat(state),
            Intent::VolumeUp => self.handle_volume(VOLUME_STEP, state),
            Intent::VolumeDown => self.handle_volume(-VOLUME_STEP, state),
            Intent::SeekForward => self.handle_seek(SEEK_STEP, state),
            Intent::SeekBackward => self.handle_seek(-SEEK_STEP, state),
        }
    }

    /// Merge a completed call into session state, discarding stale
    /// results. Returns true when the frame needs a redraw.
    pub fn apply_completion(&mut self, completion: Completion, state: &mut SessionState) -> bool {
        match completion {
            Completion::Refresh {
                seq,
                playlists,
                now_playing,
                settings,
            } => {
                if !self.refresh.complete(seq) {
                    tracing::warn!(seq, latest = self.refresh.latest_seq, "discarding stale refresh");
                    return false;
                }
                match playlists {
                    Ok(playlists) => {
                        if !state.playlists_loaded {
                            state.set_status(format!("Loaded {} playlists.", playlists.len()));
                        }
                        state.replace_playlists(playlists);
                    }
                    Err(e) => state.set_status(e.to_string()),
                }
                match now_playing {
                    Ok(np) => state.set_now_playing(np),
                    Err(e) => state.set_status(e.to_string()),
                }
                match settings {
                    Ok(settings) => state.set_settings(settings),
                    // Usually the same root cause as a now-playing failure,
                    // which already set the status.
                    Err(e) => tracing::debug!(error = %e, "settings poll failed"),
                }
                if self.refresh_queued {
                    self.refresh_queued = false;
                    self.issue_refresh();
                }
                true
            }
            Completion::Transport { seq, op, result } => {
                if !self.transport.complete(seq) {
                    tracing::warn!(seq, op = op.label(), "discarding stale transport completion");
                    return false;
                }
                match result {
                    Ok((now_playing, settings)) => {
                        if let Some(np) = now_playing {
                            state.set_now_playing(np);
                        }
                        if let Some(settings) = settings {
                            state.set_settings(settings);
                        }
                        match op {
                            TransportOp::Play
                            | TransportOp::Pause
                            | TransportOp::Stop
                            | TransportOp::Next
                            | TransportOp::Previous => {
                                state.set_status(format!("{}.", op.label()));
                            }
                            // Only the player knows the toggle's outcome.
                            TransportOp::ToggleShuffle => {
                                state.set_status(match state.settings().shuffle {
                                    Some(true) => "Shuffle on",
                                    Some(false) => "Shuffle off",
                                    None => "Shuffle toggled",
                                });
                            }
                            // Repeat, volume and seek statuses were set at
                            // dispatch time from the computed target.
                            TransportOp::SetRepeat(_)
                            | TransportOp::SetVolume(_)
                            | TransportOp::SeekTo(_) => {}
                        }
                    }
                    Err(e) => {
                        tracing::warn!(op = op.label(), error = %e, "transport command failed");
                        state.set_status(e.to_string());
                    }
                }
                true
            }
            Completion::PlayPlaylist { seq, name, result } => {
                if !self.play_playlist.complete(seq) {
                    tracing::warn!(seq, "discarding stale play-playlist completion");
                    return false;
                }
                match result {
                    Ok(snapshot) => {
                        state.set_status(format!("Playing playlist: {name}"));
                        if let Some(np) = snapshot {
                            state.set_now_playing(np);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(playlist = %name, error = %e, "play playlist failed");
                        state.set_status(e.to_string());
                    }
                }
                true
            }
        }
    }

    // ── Intent handlers ─────────────────────────────────────────────────

    fn handle_refresh(&mut self) -> bool {
        if self.refresh.inflight {
            // Coalesce: one queued refresh at most, re-issued on completion.
            self.refresh_queued = true;
            tracing::debug!("refresh already in flight, coalescing");
            return false;
        }
        self.issue_refresh();
        true
    }

    fn handle_activate(&mut self, state: &mut SessionState) -> bool {
        let Some(playlist) = state.selected_playlist().cloned() else {
            state.set_status("No playlists loaded.");
            return true;
        };
        if self.play_playlist.inflight {
            state.set_status("Still starting the previous playlist.");
            return true;
        }

        let seq = self.alloc_seq();
        self.play_playlist.issue(seq);
        tracing::debug!(seq, playlist = %playlist.name, "dispatching play playlist");

        let player = self.player.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match player.play_playlist(&playlist.id).await {
                Ok(()) => Ok(player.now_playing().await.ok()),
                Err(e) => Err(e),
            };
            let _ = tx
                .send(Completion::PlayPlaylist {
                    seq,
                    name: playlist.name,
                    result,
                })
                .await;
        });
        true
    }

    fn handle_transport(&mut self, op: TransportOp, state: &mut SessionState) -> bool {
        if self.transport.inflight {
            state.set_status("Still working on the previous command.");
            return true;
        }
        self.issue_transport(op);
        true
    }

    /// Repeat cycles off → all → one against the last known mode; an
    /// unknown mode is treated as off, like a fresh player.
    fn handle_cycle_repeat(&mut self, state: &mut SessionState) -> bool {
        if self.transport.inflight {
            state.set_status("Still working on the previous command.");
            return true;
        }
        let next = state.settings().repeat.unwrap_or(RepeatMode::Off).next();
        state.set_status(format!("Repeat: {}", next.keyword()));
        self.issue_transport(TransportOp::SetRepeat(next));
        true
    }

    fn handle_volume(&mut self, delta: i16, state: &mut SessionState) -> bool {
        if self.transport.inflight {
            state.set_status("Still working on the previous command.");
            return true;
        }
        // The level is polled with the regular refresh; until the first
        // poll lands there is no base to step from.
        let Some(current) = state.settings().volume else {
            state.set_status("Volume not known yet.");
            return true;
        };
        let target = (i16::from(current) + delta).clamp(0, 100) as u8;
        state.set_volume(target);
        state.set_status(format!("Volume: {target}%"));
        self.issue_transport(TransportOp::SetVolume(target));
        true
    }

    fn handle_seek(&mut self, delta: f64, state: &mut SessionState) -> bool {
        if self.transport.inflight {
            state.set_status("Still working on the previous command.");
            return true;
        }
        let np = state.now_playing();
        if !matches!(np.state, PlaybackState::Playing | PlaybackState::Paused) {
            return false;
        }
        let max = np.duration_secs.max(0.0);
        let target = (state.display_position_secs() + delta).clamp(0.0, max);
        state.seek_to(target);
        state.set_status(if delta >= 0.0 {
            "Seek forward 10s"
        } else {
            "Seek back 10s"
        });
        self.issue_transport(TransportOp::SeekTo(target));
        true
    }

    fn issue_transport(&mut self, op: TransportOp) {
        let seq = self.alloc_seq();
        self.transport.issue(seq);
        tracing::debug!(seq, op = op.label(), "dispatching transport command");

        let player = self.player.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match player.transport(op).await {
                Ok(()) => {
                    let now_playing = player.now_playing().await.ok();
                    let settings = player.settings().await.ok();
                    Ok((now_playing, settings))
                }
                Err(e) => Err(e),
            };
            let _ = tx.send(Completion::Transport { seq, op, result }).await;
        });
    }

    fn issue_refresh(&mut self) {
        let seq = self.alloc_seq();
        self.refresh.issue(seq);
        tracing::debug!(seq, "dispatching refresh");

        let player = self.player.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let playlists = player.list_playlists().await;
            let now_playing = player.now_playing().await;
            let settings = player.settings().await;
            let _ = tx
                .send(Completion::Refresh {
                    seq,
                    playlists,
                    now_playing,
                    settings,
                })
                .await;
        });
    }

    fn alloc_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
