//! Logical input consumed by the core
//!
//! Device mapping is the host's job. The core only asks whether a logical
//! button was pressed this frame or is being held.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    /// Fire
    B,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::Start,
        Button::Select,
    ];

    #[inline]
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

pub trait InputQuery {
    /// Went down since the previous frame
    fn is_pressed(&self, button: Button) -> bool;
    /// Currently down
    fn is_held(&self, button: Button) -> bool;
}

/// Button state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: u16,
    pressed: u16,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with `buttons` held (not freshly pressed)
    pub fn holding(buttons: &[Button]) -> Self {
        let mut snapshot = Self::default();
        for &b in buttons {
            snapshot.held |= b.bit();
        }
        snapshot
    }

    /// Button went down; counts as pressed only if it was not already held
    pub fn press(&mut self, button: Button) {
        if self.held & button.bit() == 0 {
            self.pressed |= button.bit();
        }
        self.held |= button.bit();
    }

    pub fn release(&mut self, button: Button) {
        self.held &= !button.bit();
    }

    /// Call once the frame has consumed its input
    pub fn clear_pressed(&mut self) {
        self.pressed = 0;
    }
}

impl InputQuery for InputSnapshot {
    fn is_pressed(&self, button: Button) -> bool {
        self.pressed & button.bit() != 0
    }

    fn is_held(&self, button: Button) -> bool {
        self.held & button.bit() != 0
    }
}
