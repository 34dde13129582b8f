//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use nannou::prelude::*;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // App-level
    Quit,
    ShowHelp,

    // Playback
    TogglePlay,
    Restart,
}

/// Parse a key into an action
pub fn parse_key(key: Key) -> Option<Action> {
    match key {
        Key::Q => Some(Action::Quit),
        Key::H => Some(Action::ShowHelp),
        Key::Space => Some(Action::TogglePlay),
        Key::R => Some(Action::Restart),
        _ => None,
    }
}

/// (key, description) rows for the help overlay
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "Play / pause"),
    ("r", "Restart from the beginning"),
    ("h", "Toggle this help"),
    ("q", "Quit"),
];
