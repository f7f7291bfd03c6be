//! Controller module - intent routing and command dispatch
//!
//! This module turns raw terminal events into intents and intents into
//! state changes or player calls. It is organized into submodules by
//! responsibility:
//!
//! - `input`: Pure event-to-intent routing (keyboard table, mouse hit-tests)
//! - `dispatch`: The command dispatcher with in-flight call tracking

mod dispatch;
mod input;

pub use dispatch::{Completion, Dispatcher};
pub use input::{route_key, route_mouse};

/// A normalized user action, decoupled from the key or click that
/// produced it. The set is closed: every variant is handled exhaustively
/// by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    SelectFirst,
    SelectLast,
    SelectIndex(usize),
    ActivateSelection,
    PlayPause,
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    ToggleShuffle,
    CycleRepeat,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
    Refresh,
    ToggleHelp,
    Quit,
}
