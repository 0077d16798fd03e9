//! Title screen, the floor of the state stack

use std::rc::Rc;

use super::{Carry, Gameplay, State, Transition};
use crate::game::Campaign;
use crate::input::{Button, InputQuery};
use crate::surface::Surface;

const BLINK_TICKS: u64 = 30;

pub struct Title {
    campaign: Rc<Campaign>,
    ticks: u64,
}

impl Title {
    pub fn new(campaign: Rc<Campaign>) -> Self {
        Self { campaign, ticks: 0 }
    }
}

impl State for Title {
    fn name(&self) -> &'static str {
        "title"
    }

    fn reactivate(&mut self) {
        self.ticks = 0;
    }

    /// START or A begins a new campaign
    fn handle_input(&mut self, input: &dyn InputQuery) -> Transition {
        if input.is_pressed(Button::Start) || input.is_pressed(Button::A) {
            let carry = Carry::fresh(self.campaign.settings.starting_lives);
            Transition::Push(Box::new(Gameplay::new(self.campaign.clone(), 0, carry)))
        } else {
            Transition::None
        }
    }

    fn update(&mut self) -> Transition {
        self.ticks += 1;
        Transition::None
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.text("PROTOSTRIKER", 112, 80);
        if (self.ticks / BLINK_TICKS) % 2 == 0 {
            surface.text("PRESS START", 116, 144);
        }
    }
}
