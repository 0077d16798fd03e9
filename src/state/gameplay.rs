//! Gameplay state: one level of the campaign

use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{ScriptedEvent, State, Transition};
use crate::consts::SIM_DT;
use crate::error::ConfigError;
use crate::game::Campaign;
use crate::input::{Button, InputQuery};
use crate::sim::{
    CollisionResolver, GameEvent, GroupId, GroupRegistry, PilotRecord, Rect, SimTime, SpawnQueue, Spawned,
    TickContext, Viewport, catalog,
};
use crate::surface::Surface;

/// Progress carried from one level to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carry {
    pub score: u32,
    pub pilot: PilotRecord,
}

impl Carry {
    /// Start of a campaign
    pub fn fresh(starting_lives: u8) -> Self {
        Self {
            score: 0,
            pilot: PilotRecord {
                lives: starting_lives,
                ..PilotRecord::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cleared,
    GameOver,
}

pub struct Gameplay {
    campaign: Rc<Campaign>,
    level_index: usize,
    carry: Carry,
    /// Simulated time since activation
    now: SimTime,
    viewport: Viewport,
    playfield: Rect,
    groups: GroupRegistry,
    queue: SpawnQueue,
    resolver: CollisionResolver,
    score: u32,
    /// Set when the level ends; acted on once the message overlay is gone
    outcome: Option<Outcome>,
    events: Vec<GameEvent>,
}

impl Gameplay {
    pub fn new(campaign: Rc<Campaign>, level_index: usize, carry: Carry) -> Self {
        let settings = &campaign.settings;
        Self {
            viewport: settings.viewport(),
            playfield: settings.playfield(),
            resolver: settings.resolver(),
            campaign,
            level_index,
            carry,
            now: SimTime::ZERO,
            groups: GroupRegistry::new(),
            queue: SpawnQueue::new(),
            score: carry.score,
            outcome: None,
            events: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn pilot_record(&self) -> PilotRecord {
        self.groups
            .player()
            .and_then(|p| p.pilot())
            .map(|p| p.record())
            .unwrap_or(self.carry.pilot)
    }

    /// Reaching the end of the level clears it, whatever is still flying
    fn level_complete(&self) -> bool {
        self.campaign
            .levels
            .get(self.level_index)
            .is_none_or(|level| self.viewport.position() >= level.length)
    }

    /// Leave the level once its closing message has been dismissed
    fn finish(&self, outcome: Outcome) -> Transition {
        let next = self.level_index + 1;
        match outcome {
            Outcome::Cleared if next < self.campaign.levels.len() => {
                let carry = Carry {
                    score: self.score,
                    pilot: self.pilot_record(),
                };
                Transition::Replace(Box::new(Gameplay::new(self.campaign.clone(), next, carry)))
            }
            Outcome::Cleared => {
                log::info!("Campaign complete, final score {}", self.score);
                Transition::ResetToFloor
            }
            Outcome::GameOver => {
                log::info!("Game over, final score {}", self.score);
                Transition::ResetToFloor
            }
        }
    }

    fn end_level(&mut self, outcome: Outcome) -> Transition {
        self.outcome = Some(outcome);
        let message = match outcome {
            Outcome::Cleared => format!("LEVEL {} COMPLETE", self.level_index + 1),
            Outcome::GameOver => "GAME OVER".to_string(),
        };
        log::info!("{message} at tick {}", self.now.ticks());
        Transition::Push(Box::new(ScriptedEvent::new(message, self.campaign.settings.message_ms)))
    }
}

impl State for Gameplay {
    fn name(&self) -> &'static str {
        "gameplay"
    }

    /// Load the level and place the player. Nothing is kept unless every
    /// level record builds.
    fn activate(&mut self) -> Result<(), ConfigError> {
        let level = self.campaign.levels.get(self.level_index).ok_or(ConfigError::NoLevels)?;
        let settings = &self.campaign.settings;

        let mut rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(self.level_index as u64));
        let chance = settings.pickup_drop_chance;
        let queue = self.campaign.factories.load(level, || rng.random::<f32>() < chance)?;
        let mut groups = settings.group_registry()?;
        groups.insert(Spawned::new(GroupId::Player, catalog::player(self.carry.pilot)));

        self.queue = queue;
        self.groups = groups;
        self.viewport.reset();
        self.now = SimTime::ZERO;
        self.score = self.carry.score;
        self.outcome = None;
        log::info!("Level {} '{}' started", self.level_index + 1, level.name);
        Ok(())
    }

    fn reactivate(&mut self) {
        log::debug!("Gameplay resumed at tick {}", self.now.ticks());
    }

    fn handle_input(&mut self, input: &dyn InputQuery) -> Transition {
        if self.outcome.is_none() && input.is_pressed(Button::Start) {
            return Transition::Push(Box::new(super::Pause::new()));
        }

        let axis = |neg: Button, pos: Button| {
            if input.is_held(neg) {
                -1.0
            } else if input.is_held(pos) {
                1.0
            } else {
                0.0
            }
        };
        let direction = Vec2::new(axis(Button::Left, Button::Right), axis(Button::Up, Button::Down));
        let trigger = input.is_held(Button::B);
        if let Some(pilot) = self.groups.player_mut().and_then(|p| p.pilot_mut()) {
            pilot.intent.direction = direction;
            pilot.intent.trigger = trigger;
        }
        Transition::None
    }

    fn update(&mut self) -> Transition {
        if let Some(outcome) = self.outcome {
            return self.finish(outcome);
        }

        self.now.advance();
        self.viewport.advance();

        let released = self.queue.release(&self.viewport, &self.playfield, self.now);
        self.groups.insert_all(released);

        let ctx = TickContext {
            now: self.now,
            dt: SIM_DT,
            playfield: self.playfield,
            viewport: &self.viewport,
            player: None,
        };
        self.groups.update(&ctx);

        let resolution = self.resolver.resolve(&mut self.groups, self.now);
        self.score += resolution.points;
        self.groups.insert_all(resolution.spawned);
        let game_over = resolution
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDied { game_over: true, .. }));
        self.events.extend(resolution.events);

        if let Some(level) = self.campaign.levels.get(self.level_index) {
            if self.viewport.position() >= level.length {
                self.viewport.auto_scroll = false;
            }
        }

        if game_over {
            self.end_level(Outcome::GameOver)
        } else if self.level_complete() {
            self.end_level(Outcome::Cleared)
        } else {
            Transition::None
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.groups.draw(surface);

        let record = self.pilot_record();
        surface.text(&format!("SCORE {:06}", self.score), 8, 8);
        surface.text(&format!("SHIPS {}", record.lives), 136, 8);
        surface.text(record.weapon.name(), 232, 8);
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSnapshot;
    use crate::settings::Settings;
    use crate::sim::{Debris, Entity, FactoryRegistry, Level, LevelRecord, Movement, Placement, Role, Exit};
    use crate::surface::DrawList;

    fn sitting_duck(pos: Vec2) -> Entity {
        Entity::new("sitting_duck", Role::Enemy, pos, Vec2::splat(16.0), "duck")
            .with_hitbox(Vec2::ZERO, Vec2::splat(16.0))
            .with_movement(Movement::Still)
            .with_placement(Placement::AtX(200.0), Exit::NONE)
            .with_debris(Debris::Explosion)
            .with_score(150, 0)
    }

    fn campaign(records: Vec<LevelRecord>, length: f64) -> Rc<Campaign> {
        let mut factories = FactoryRegistry::standard();
        factories.register("sitting_duck", sitting_duck);
        let level = Level {
            name: "test".into(),
            length,
            records,
        };
        Rc::new(Campaign::new(Settings::default(), factories, vec![level]).unwrap())
    }

    fn duck_at(x: i32, y: i32) -> LevelRecord {
        LevelRecord {
            kind: "sitting_duck".into(),
            x,
            y,
            drops_pickup: false,
        }
    }

    fn start(campaign: Rc<Campaign>) -> Gameplay {
        let lives = campaign.settings.starting_lives;
        let mut gameplay = Gameplay::new(campaign, 0, Carry::fresh(lives));
        gameplay.activate().unwrap();
        gameplay
    }

    fn run(gameplay: &mut Gameplay, ticks: u32) {
        for _ in 0..ticks {
            assert!(matches!(gameplay.update(), Transition::None));
        }
    }

    #[test]
    fn test_single_enemy_end_to_end() {
        let mut gameplay = start(campaign(vec![duck_at(100, 110)], 100_000.0));

        // One second of simulated time at 100 px/s
        run(&mut gameplay, 60);
        let enemies = gameplay.groups().group(GroupId::Enemies);
        assert_eq!(enemies.alive().count(), 1);
        assert_eq!(enemies.members[0].pos, Vec2::new(200.0, 110.0));

        // Fire exactly one shot
        gameplay.handle_input(&InputSnapshot::holding(&[Button::B]));
        run(&mut gameplay, 1);
        gameplay.handle_input(&InputSnapshot::new());
        assert_eq!(gameplay.groups().group(GroupId::PlayerShots).len(), 1);

        let mut ticks = 0;
        while gameplay.groups().group(GroupId::Enemies).alive().count() > 0 {
            run(&mut gameplay, 1);
            ticks += 1;
            assert!(ticks < 120, "shot never reached the enemy");
        }
        assert_eq!(gameplay.score(), 150);
        assert_eq!(gameplay.groups().group(GroupId::Effects).alive().count(), 1);
        let destroyed = gameplay
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);

        // The explosion animates once and is then swept
        run(&mut gameplay, 60);
        assert!(gameplay.groups().group(GroupId::Effects).is_empty());
        assert_eq!(gameplay.score(), 150);
    }

    #[test]
    fn test_bad_record_aborts_activation() {
        let campaign = campaign(
            vec![
                duck_at(100, 110),
                LevelRecord {
                    kind: "enemy_404".into(),
                    x: 300,
                    y: 80,
                    drops_pickup: false,
                },
            ],
            1000.0,
        );
        let mut gameplay = Gameplay::new(campaign, 0, Carry::fresh(3));
        assert!(matches!(
            gameplay.activate(),
            Err(ConfigError::UnknownEntityType { index: 1, .. })
        ));
        assert_eq!(gameplay.groups().population(), 0);
    }

    #[test]
    fn test_level_cleared_pushes_message() {
        // 50 px of level at 100 px/s
        let mut gameplay = start(campaign(Vec::new(), 50.0));
        run(&mut gameplay, 29);
        let transition = gameplay.update();
        assert!(matches!(transition, Transition::Push(ref s) if s.name() == "scripted_event"));
        assert_eq!(gameplay.outcome(), Some(Outcome::Cleared));
        // Last level: back to the title once the message is gone
        assert!(matches!(gameplay.update(), Transition::ResetToFloor));
    }

    #[test]
    fn test_parked_turret_does_not_block_clear() {
        let turret = LevelRecord {
            kind: "enemy_04".into(),
            x: 300,
            y: 100,
            drops_pickup: false,
        };
        // 100 px at 100 px/s
        let mut gameplay = start(campaign(vec![turret], 100.0));
        run(&mut gameplay, 59);
        assert_eq!(gameplay.groups().group(GroupId::Enemies).alive().count(), 1);

        let transition = gameplay.update();
        assert!(matches!(transition, Transition::Push(ref s) if s.name() == "scripted_event"));
        assert_eq!(gameplay.outcome(), Some(Outcome::Cleared));
        assert_eq!(gameplay.groups().group(GroupId::Enemies).alive().count(), 1);
    }

    #[test]
    fn test_input_steers_player() {
        let mut gameplay = start(campaign(Vec::new(), 1000.0));
        let before = gameplay.groups().player().map(|p| p.pos);
        gameplay.handle_input(&InputSnapshot::holding(&[Button::Down, Button::Right]));
        run(&mut gameplay, 10);
        let after = gameplay.groups().player().map(|p| p.pos);
        assert!(after.zip(before).is_some_and(|(a, b)| a.x > b.x && a.y > b.y));
    }

    #[test]
    fn test_start_pauses() {
        let mut gameplay = start(campaign(Vec::new(), 1000.0));
        let mut input = InputSnapshot::new();
        input.press(Button::Start);
        assert!(matches!(gameplay.handle_input(&input), Transition::Push(ref s) if s.name() == "pause"));
    }

    #[test]
    fn test_hud() {
        let gameplay = start(campaign(Vec::new(), 1000.0));
        let mut list = DrawList::default();
        gameplay.draw(&mut list);
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts, ["SCORE 000000", "SHIPS 3", "BASIC"]);
        assert_eq!(list.blits(), 1);
    }
}
