//! Key bindings and per-frame keyboard state (pressed edges and held keys).

use crate::game::FrameInput;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashSet;

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    Pause,
    Quit,
    None,
}

/// Map key event to game action. WASD + Space as in the classic layout, plus arrows and vim keys.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::Pause,
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Up => Action::Rotate,
        KeyCode::Down => Action::SoftDrop,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Action::Quit,
            'p' => Action::Pause,
            'a' | 'h' => Action::MoveLeft,
            'd' | 'l' => Action::MoveRight,
            'w' | 'k' => Action::Rotate,
            's' | 'j' => Action::SoftDrop,
            _ => Action::None,
        },
        _ => Action::None,
    }
}

/// Tracks which actions were pressed since the last frame and which are held.
///
/// Terminals that report key releases give true held state. Without release reports a key
/// counts as held only in frames where a press or auto-repeat arrived.
#[derive(Debug, Default)]
pub struct Keyboard {
    reports_release: bool,
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    repeated: HashSet<Action>,
}

impl Keyboard {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            ..Self::default()
        }
    }

    pub fn handle(&mut self, key: KeyEvent) {
        let action = key_to_action(key);
        if action == Action::None {
            return;
        }
        match key.kind {
            KeyEventKind::Press => {
                if !self.reports_release || !self.held.contains(&action) {
                    self.pressed.insert(action);
                }
                if self.reports_release {
                    self.held.insert(action);
                }
            }
            KeyEventKind::Repeat => {
                self.repeated.insert(action);
            }
            KeyEventKind::Release => {
                self.held.remove(&action);
            }
        }
    }

    /// Edge: pressed since the last `take_frame`.
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Level: held down during this frame.
    pub fn is_down(&self, action: Action) -> bool {
        self.held.contains(&action) || self.pressed.contains(&action) || self.repeated.contains(&action)
    }

    pub fn quit_requested(&self) -> bool {
        self.is_pressed(Action::Quit)
    }

    /// Snapshot for the controller; clears the per-frame edges.
    pub fn take_frame(&mut self) -> FrameInput {
        let input = FrameInput {
            pause: self.is_pressed(Action::Pause),
            rotate: self.is_pressed(Action::Rotate),
            left: self.is_pressed(Action::MoveLeft),
            right: self.is_pressed(Action::MoveRight),
            soft_drop: self.is_down(Action::SoftDrop),
        };
        self.pressed.clear();
        self.repeated.clear();
        input
    }
}
