//! Timed message overlay ("LEVEL 1 COMPLETE", "GAME OVER")

use super::{State, Transition};
use crate::sim::SimTime;
use crate::surface::Surface;

/// Shows a message for a fixed span of simulated time, then pops itself
#[derive(Debug)]
pub struct ScriptedEvent {
    message: String,
    duration_ms: f64,
    now: SimTime,
}

impl ScriptedEvent {
    pub fn new(message: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            message: message.into(),
            duration_ms,
            now: SimTime::ZERO,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl State for ScriptedEvent {
    fn name(&self) -> &'static str {
        "scripted_event"
    }

    fn update(&mut self) -> Transition {
        self.now.advance();
        if self.now.millis() >= self.duration_ms {
            Transition::Pop
        } else {
            Transition::None
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        // Roughly centered for an 8 px font
        let x = 160 - (self.message.len() as i32 * 4);
        surface.text(&self.message, x, 112);
    }

    fn is_overlay(&self) -> bool {
        true
    }
}
