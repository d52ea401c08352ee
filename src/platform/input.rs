//! Keyboard input state
//!
//! Host key callbacks flip flags here between simulation steps; the loop reads
//! a snapshot once per step.

use crate::sim::TickInput;

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
    Start,
    ToggleAutopilot,
    ToggleMute,
}

impl Action {
    /// Map a `KeyboardEvent.key` value to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "ArrowLeft" => Some(Action::MoveLeft),
            "d" | "D" | "ArrowRight" => Some(Action::MoveRight),
            " " | "w" | "W" | "ArrowUp" => Some(Action::Jump),
            "Escape" | "p" | "P" => Some(Action::Pause),
            "Enter" => Some(Action::Start),
            "i" | "I" => Some(Action::ToggleAutopilot),
            "m" | "M" => Some(Action::ToggleMute),
            _ => None,
        }
    }
}

/// Current key state plus pending one-shot triggers
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub start: bool,
    pub pause: bool,
    pub autopilot: bool,
    /// Mute toggle (one-shot, handled by the loop rather than the simulation)
    pub mute: bool,
}

impl InputState {
    /// Handle a key press; returns true if the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        match action {
            Action::MoveLeft => self.left = true,
            Action::MoveRight => self.right = true,
            Action::Jump => self.jump = true,
            Action::Pause => self.pause = true,
            Action::Start => self.start = true,
            Action::ToggleMute => self.mute = true,
            Action::ToggleAutopilot => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
        }
        true
    }

    /// Handle a key release; one-shot triggers are cleared by the loop instead
    pub fn key_up(&mut self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(Action::MoveLeft) => self.left = false,
            Some(Action::MoveRight) => self.right = false,
            Some(Action::Jump) => self.jump = false,
            Some(_) => {}
            None => return false,
        }
        true
    }

    /// Drop held keys (e.g. on window blur, when key-up events get lost)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.jump = false;
    }

    /// Input for the next simulation step
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
            start: self.start,
            pause: self.pause,
            autopilot: self.autopilot,
        }
    }

    /// Clear one-shot inputs after they were processed
    pub fn clear_one_shots(&mut self) {
        self.start = false;
        self.pause = false;
    }
}
