//! Pause overlay

use super::{State, Transition};
use crate::input::{Button, InputQuery};
use crate::surface::Surface;

/// Blink period of the pause banner, in ticks
const BLINK_TICKS: u64 = 30;

/// Freezes the state beneath. START resumes, SELECT quits to the title.
#[derive(Debug, Default)]
pub struct Pause {
    ticks: u64,
}

impl Pause {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for Pause {
    fn name(&self) -> &'static str {
        "pause"
    }

    fn handle_input(&mut self, input: &dyn InputQuery) -> Transition {
        if input.is_pressed(Button::Start) {
            Transition::Pop
        } else if input.is_pressed(Button::Select) {
            Transition::ResetToFloor
        } else {
            Transition::None
        }
    }

    fn update(&mut self) -> Transition {
        self.ticks += 1;
        Transition::None
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if (self.ticks / BLINK_TICKS) % 2 == 0 {
            surface.text("PAUSED", 136, 112);
        }
    }

    fn is_overlay(&self) -> bool {
        true
    }
}
