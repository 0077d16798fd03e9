//! Game states and the state stack
//!
//! Only the top state receives input and updates. States beneath it are
//! frozen but may still be drawn (a pause overlay over gameplay). The floor
//! state (title) is never popped during play.

mod gameplay;
mod pause;
mod scripted;
mod title;

use std::fmt;

pub use gameplay::{Carry, Gameplay, Outcome};
pub use pause::Pause;
pub use scripted::ScriptedEvent;
pub use title::Title;

use crate::error::ConfigError;
use crate::input::InputQuery;
use crate::sim::GameEvent;
use crate::surface::Surface;

/// What the top state asks the stack to do after input or an update
pub enum Transition {
    None,
    Push(Box<dyn State>),
    Pop,
    /// Swap the top state for another without waking the state below
    Replace(Box<dyn State>),
    /// Pop everything above the floor
    ResetToFloor,
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "None"),
            Transition::Push(s) => write!(f, "Push({})", s.name()),
            Transition::Pop => write!(f, "Pop"),
            Transition::Replace(s) => write!(f, "Replace({})", s.name()),
            Transition::ResetToFloor => write!(f, "ResetToFloor"),
        }
    }
}

pub trait State {
    fn name(&self) -> &'static str;

    /// Runs once, before the state is placed on the stack.
    /// An error leaves the stack untouched.
    fn activate(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Runs once each time the state becomes top again after a pop
    fn reactivate(&mut self) {}

    /// Called once per frame on the top state
    fn handle_input(&mut self, _input: &dyn InputQuery) -> Transition {
        Transition::None
    }

    /// One fixed tick
    fn update(&mut self) -> Transition;

    fn draw(&self, surface: &mut dyn Surface);

    /// Overlays let the state beneath show through
    fn is_overlay(&self) -> bool {
        false
    }

    /// Gameplay events produced since the last call
    fn drain_events(&mut self) -> Vec<GameEvent> {
        Vec::new()
    }
}

pub struct StateStack {
    states: Vec<Box<dyn State>>,
}

impl fmt::Debug for StateStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl StateStack {
    /// Activate and install the floor state
    pub fn new(mut floor: Box<dyn State>) -> Result<Self, ConfigError> {
        floor.activate()?;
        log::info!("State stack floor: {}", floor.name());
        Ok(Self { states: vec![floor] })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Names from floor to top
    pub fn names(&self) -> Vec<&'static str> {
        self.states.iter().map(|s| s.name()).collect()
    }

    pub fn top_name(&self) -> Option<&'static str> {
        self.states.last().map(|s| s.name())
    }

    pub fn push(&mut self, mut state: Box<dyn State>) -> Result<(), ConfigError> {
        state.activate()?;
        log::info!("Push {}", state.name());
        self.states.push(state);
        Ok(())
    }

    /// Pop the top state and reactivate the one beneath.
    /// Returns false (and does nothing) when only the floor remains.
    pub fn pop(&mut self) -> bool {
        if self.states.len() <= 1 {
            log::warn!("Refusing to pop the floor state");
            return false;
        }
        if let Some(old) = self.states.pop() {
            log::info!("Pop {}", old.name());
        }
        if let Some(top) = self.states.last_mut() {
            top.reactivate();
        }
        true
    }

    pub fn replace(&mut self, mut state: Box<dyn State>) -> Result<(), ConfigError> {
        state.activate()?;
        match self.states.pop() {
            Some(old) => log::info!("Replace {} with {}", old.name(), state.name()),
            None => log::info!("Push {}", state.name()),
        }
        self.states.push(state);
        Ok(())
    }

    pub fn reset_to_floor(&mut self) {
        if self.states.len() <= 1 {
            return;
        }
        self.states.truncate(1);
        if let Some(floor) = self.states.first_mut() {
            log::info!("Reset to {}", floor.name());
            floor.reactivate();
        }
    }

    pub fn apply(&mut self, transition: Transition) -> Result<(), ConfigError> {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.push(state)?,
            Transition::Pop => {
                self.pop();
            }
            Transition::Replace(state) => self.replace(state)?,
            Transition::ResetToFloor => self.reset_to_floor(),
        }
        Ok(())
    }

    pub fn handle_input(&mut self, input: &dyn InputQuery) -> Result<(), ConfigError> {
        let transition = match self.states.last_mut() {
            Some(top) => top.handle_input(input),
            None => return Ok(()),
        };
        self.apply(transition)
    }

    /// Run one tick on the top state
    pub fn update(&mut self) -> Result<(), ConfigError> {
        let transition = match self.states.last_mut() {
            Some(top) => top.update(),
            None => return Ok(()),
        };
        self.apply(transition)
    }

    /// Draw from the highest opaque state up to the top
    pub fn draw(&self, surface: &mut dyn Surface) {
        let start = self.states.iter().rposition(|s| !s.is_overlay()).unwrap_or(0);
        for state in &self.states[start..] {
            state.draw(surface);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.states.iter_mut().flat_map(|s| s.drain_events()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        ticks: Cell<u32>,
        activations: Cell<u32>,
        reactivations: Cell<u32>,
    }

    struct Probe {
        name: &'static str,
        overlay: bool,
        fail: bool,
        counters: Rc<Counters>,
    }

    impl Probe {
        fn boxed(name: &'static str) -> (Box<dyn State>, Rc<Counters>) {
            let counters = Rc::new(Counters::default());
            let probe = Probe {
                name,
                overlay: false,
                fail: false,
                counters: counters.clone(),
            };
            (Box::new(probe), counters)
        }

        fn overlay(name: &'static str) -> Box<dyn State> {
            Box::new(Probe {
                name,
                overlay: true,
                fail: false,
                counters: Rc::default(),
            })
        }
    }

    impl State for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn activate(&mut self) -> Result<(), ConfigError> {
            if self.fail {
                return Err(ConfigError::NoLevels);
            }
            self.counters.activations.set(self.counters.activations.get() + 1);
            Ok(())
        }

        fn reactivate(&mut self) {
            self.counters.reactivations.set(self.counters.reactivations.get() + 1);
        }

        fn update(&mut self) -> Transition {
            self.counters.ticks.set(self.counters.ticks.get() + 1);
            Transition::None
        }

        fn draw(&self, surface: &mut dyn Surface) {
            surface.text(self.name, 0, 0);
        }

        fn is_overlay(&self) -> bool {
            self.overlay
        }
    }

    #[test]
    fn test_push_pop_reactivates_once_without_bleed() {
        let (floor, floor_counters) = Probe::boxed("floor");
        let mut stack = StateStack::new(floor).unwrap();
        stack.update().unwrap();
        stack.update().unwrap();

        let (pushed, pushed_counters) = Probe::boxed("pushed");
        stack.push(pushed).unwrap();
        for _ in 0..10 {
            stack.update().unwrap();
        }
        assert_eq!(pushed_counters.ticks.get(), 10);
        assert_eq!(floor_counters.ticks.get(), 2);

        assert!(stack.pop());
        assert_eq!(floor_counters.reactivations.get(), 1);
        assert_eq!(floor_counters.activations.get(), 1);
        assert_eq!(floor_counters.ticks.get(), 2);
        stack.update().unwrap();
        assert_eq!(floor_counters.ticks.get(), 3);
    }

    #[test]
    fn test_floor_is_never_popped() {
        let (floor, counters) = Probe::boxed("floor");
        let mut stack = StateStack::new(floor).unwrap();
        assert!(!stack.pop());
        assert_eq!(stack.len(), 1);
        assert_eq!(counters.reactivations.get(), 0);
    }

    #[test]
    fn test_replace_does_not_wake_state_below() {
        let (floor, floor_counters) = Probe::boxed("floor");
        let mut stack = StateStack::new(floor).unwrap();
        stack.push(Probe::boxed("level_1").0).unwrap();
        let (next, next_counters) = Probe::boxed("level_2");
        stack.apply(Transition::Replace(next)).unwrap();
        assert_eq!(stack.names(), ["floor", "level_2"]);
        assert_eq!(next_counters.activations.get(), 1);
        assert_eq!(floor_counters.reactivations.get(), 0);
    }

    #[test]
    fn test_reset_to_floor() {
        let (floor, counters) = Probe::boxed("floor");
        let mut stack = StateStack::new(floor).unwrap();
        stack.push(Probe::boxed("a").0).unwrap();
        stack.push(Probe::overlay("b")).unwrap();
        stack.apply(Transition::ResetToFloor).unwrap();
        assert_eq!(stack.names(), ["floor"]);
        assert_eq!(counters.reactivations.get(), 1);
    }

    #[test]
    fn test_failed_activation_leaves_stack_unchanged() {
        let (floor, _) = Probe::boxed("floor");
        let mut stack = StateStack::new(floor).unwrap();
        let broken = Box::new(Probe {
            name: "broken",
            overlay: false,
            fail: true,
            counters: Rc::default(),
        });
        assert!(matches!(stack.push(broken), Err(ConfigError::NoLevels)));
        assert_eq!(stack.names(), ["floor"]);
    }

    #[test]
    fn test_draw_shows_through_overlays() {
        let (floor, _) = Probe::boxed("floor");
        let mut stack = StateStack::new(floor).unwrap();
        stack.push(Probe::boxed("game").0).unwrap();
        stack.push(Probe::overlay("pause")).unwrap();

        let mut list = DrawList::default();
        stack.draw(&mut list);
        assert_eq!(list.texts().collect::<Vec<_>>(), ["game", "pause"]);
    }
}
