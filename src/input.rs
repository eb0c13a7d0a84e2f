//! Input edge detection
//!
//! Front ends report what is held this frame; the tracker compares against
//! the previous frame so one-shot actions (jump, pause, confirm, backspace,
//! click) fire once per key press no matter how long it is held.

use glam::Vec2;

use crate::sim::TickInput;

/// Raw device state sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub jump: bool,
    pub left: bool,
    pub right: bool,
    pub pause: bool,
    pub confirm: bool,
    pub backspace: bool,
    /// Window close / quit key
    pub quit: bool,
    /// Characters typed since the last frame
    pub text: Vec<char>,
    pub pointer: Vec2,
    pub pointer_down: bool,
}

/// Held state from the previous frame
#[derive(Debug, Clone, Copy, Default)]
struct Held {
    jump: bool,
    pause: bool,
    confirm: bool,
    backspace: bool,
    pointer_down: bool,
}

/// Converts held state into per-tick intents
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    prev: Held,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build this tick's intents and remember the held state for the next call
    pub fn update(&mut self, raw: &RawInput) -> TickInput {
        let input = TickInput {
            jump: raw.jump && !self.prev.jump,
            move_left: raw.left,
            move_right: raw.right,
            pause: raw.pause && !self.prev.pause,
            confirm: raw.confirm && !self.prev.confirm,
            backspace: raw.backspace && !self.prev.backspace,
            text: raw.text.clone(),
            quit: raw.quit,
            pointer: raw.pointer,
            clicked: raw.pointer_down && !self.prev.pointer_down,
        };

        self.prev = Held {
            jump: raw.jump,
            pause: raw.pause,
            confirm: raw.confirm,
            backspace: raw.backspace,
            pointer_down: raw.pointer_down,
        };
        input
    }

    /// Forget held keys (e.g. after focus loss) so the next press fires
    pub fn clear(&mut self) {
        self.prev = Held::default();
    }
}
