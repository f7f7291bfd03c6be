//! Application event loop
//!
//! A single task owns the session state. It waits on terminal input,
//! completions from background player calls, the periodic refresh timer,
//! and the UI animation tick, then redraws only when something changed.
//! Terminal input is read on a blocking thread and fed in over a channel.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::controller::{route_key, route_mouse, Dispatcher, Intent};
use crate::model::SessionState;
use crate::player::PlayerControl;
use crate::view::{AppView, FrameLayout};

/// How often playback state is re-polled from the player.
const REFRESH_INTERVAL: Duration = Duration::from_secs(2);
/// Animation tick for the progress bar and status-line expiry.
const UI_TICK: Duration = Duration::from_millis(250);

pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    player: impl PlayerControl,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let (input_tx, input_rx) = mpsc::channel(32);
    tokio::task::spawn_blocking(move || read_terminal_events(input_tx));
    event_loop(terminal, player, input_rx).await
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    player: impl PlayerControl,
    mut input_rx: mpsc::Receiver<Event>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let (completion_tx, mut completion_rx) = mpsc::channel(32);
    let mut dispatcher = Dispatcher::new(player, completion_tx);
    let mut state = SessionState::new();

    let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ui_tick = tokio::time::interval(UI_TICK);
    ui_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut layout = FrameLayout::default();
    let mut redraw = true;

    loop {
        if redraw {
            let busy = dispatcher.is_busy();
            terminal.draw(|frame| {
                layout = AppView::render(frame, &state, busy);
            })?;
        }

        redraw = tokio::select! {
            event = input_rx.recv() => {
                // A closed input stream means the terminal reader died;
                // without it there is no way left to quit.
                let Some(event) = event else {
                    bail!("terminal input stream closed");
                };
                handle_event(event, &mut dispatcher, &mut state, &layout)
            }
            Some(completion) = completion_rx.recv() => {
                dispatcher.apply_completion(completion, &mut state)
            }
            // The first tick fires immediately and doubles as the initial
            // playlist load.
            _ = refresh.tick() => {
                dispatcher.dispatch(Intent::Refresh, &mut state)
            }
            _ = ui_tick.tick() => {
                state.tick(Instant::now())
            }
        };

        if state.should_quit {
            tracing::info!("shutting down");
            break;
        }
    }

    Ok(())
}

fn handle_event<P: PlayerControl>(
    event: Event,
    dispatcher: &mut Dispatcher<P>,
    state: &mut SessionState,
    layout: &FrameLayout,
) -> bool {
    match event {
        Event::Key(key) => {
            if state.help_open {
                // Any key dismisses the help overlay, except quit which
                // still quits.
                return match route_key(key) {
                    Some(Intent::Quit) => dispatcher.dispatch(Intent::Quit, state),
                    _ if key.kind != KeyEventKind::Release => {
                        state.help_open = false;
                        true
                    }
                    _ => false,
                };
            }
            match route_key(key) {
                Some(intent) => dispatcher.dispatch(intent, state),
                None => false,
            }
        }
        Event::Mouse(mouse) => {
            if state.help_open {
                // Any click dismisses the overlay, hit-region or not.
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    state.help_open = false;
                    return true;
                }
                return false;
            }
            match route_mouse(mouse, layout) {
                Some(intent) => dispatcher.dispatch(intent, state),
                None => false,
            }
        }
        Event::Resize(_, _) => true,
        _ => false,
    }
}

/// Blocking loop feeding crossterm events into the async loop. Returns
/// when the receiving side is dropped on shutdown, or on a read error —
/// dropping the sender then makes the event loop bail out.
fn read_terminal_events(tx: mpsc::Sender<Event>) {
    loop {
        match event::read() {
            Ok(event) => {
                if tx.blocking_send(event).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "terminal event read failed");
                return;
            }
        }
    }
}
