//! Frame driver
//!
//! `Game` owns the clock and the state stack. Each host frame feeds it the
//! elapsed wall-clock time; it runs the resulting fixed ticks on whatever
//! state is on top, then draws.

use std::rc::Rc;

use crate::error::ConfigError;
use crate::input::InputQuery;
use crate::settings::Settings;
use crate::sim::{Clock, FactoryRegistry, GameEvent, Level};
use crate::state::{StateStack, Title};
use crate::surface::Surface;

/// Everything a run of the game is built from
#[derive(Debug)]
pub struct Campaign {
    pub settings: Settings,
    pub factories: FactoryRegistry,
    pub levels: Vec<Level>,
}

impl Campaign {
    pub fn new(settings: Settings, factories: FactoryRegistry, levels: Vec<Level>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        settings.group_registry()?;
        Ok(Self {
            settings,
            factories,
            levels,
        })
    }

    /// Campaign over the built-in entity catalog
    pub fn standard(settings: Settings, levels: Vec<Level>) -> Result<Self, ConfigError> {
        Self::new(settings, FactoryRegistry::standard(), levels)
    }
}

#[derive(Debug)]
pub struct Game {
    clock: Clock,
    stack: StateStack,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(campaign: Campaign) -> Result<Self, ConfigError> {
        let clock = match campaign.settings.max_ticks_per_frame {
            Some(max) => Clock::with_max_steps(max),
            None => Clock::new(),
        };
        let stack = StateStack::new(Box::new(Title::new(Rc::new(campaign))))?;
        log::info!("Game ready");
        Ok(Self {
            clock,
            stack,
            events: Vec::new(),
        })
    }

    /// Run one host frame. Returns the number of ticks simulated.
    ///
    /// Input is handled once per frame, before the ticks. A transition takes
    /// effect immediately, so the remaining ticks run on the new top state.
    pub fn frame(
        &mut self,
        elapsed_seconds: f64,
        input: &dyn InputQuery,
        surface: &mut dyn Surface,
    ) -> Result<u32, ConfigError> {
        let ticks = self.clock.tick(elapsed_seconds);

        self.stack.handle_input(input)?;
        for _ in 0..ticks {
            self.stack.update()?;
        }
        self.events.extend(self.stack.drain_events());

        self.stack.draw(surface);
        Ok(ticks)
    }

    /// Gameplay events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn top_name(&self) -> Option<&'static str> {
        self.stack.top_name()
    }

    pub fn total_ticks(&self) -> u64 {
        self.clock.total_ticks()
    }
}
