//! Player ship: input intent, weapons, lives and respawn protection

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog;
use super::entity::{Spawned, TickContext};
use super::groups::GroupId;
use crate::consts::{
    PLAYER_LIVES, PLAYER_MAX_SPEED, PLAYER_RESPAWN_X, PLAYER_SPEED, PLAYER_SPEED_STEP, PLAYER_START,
};

/// Blink period while protected
const BLINK_MS: f64 = 100.0;

/// Collectable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Spreader,
    ReverseFire,
    LaserBeam,
    SpeedUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Basic,
    Spreader,
    ReverseFire,
    LaserBeam,
}

impl WeaponKind {
    /// Minimum time between shots
    pub fn cooldown_ms(self) -> f64 {
        match self {
            WeaponKind::Basic => 200.0,
            WeaponKind::Spreader => 400.0,
            WeaponKind::ReverseFire => 200.0,
            WeaponKind::LaserBeam => 300.0,
        }
    }

    /// HUD label
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Basic => "BASIC",
            WeaponKind::Spreader => "SPREAD",
            WeaponKind::ReverseFire => "REVERSE",
            WeaponKind::LaserBeam => "LASER",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Weapon {
    pub kind: WeaponKind,
    last_shot_ms: Option<f64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            last_shot_ms: None,
        }
    }

    /// Fire from a ship at `pos`/`size` if the cooldown has elapsed
    pub fn fire(&mut self, pos: Vec2, size: Vec2, now_ms: f64, out: &mut Vec<Spawned>) {
        if self
            .last_shot_ms
            .is_some_and(|last| now_ms - last <= self.kind.cooldown_ms())
        {
            return;
        }
        self.last_shot_ms = Some(now_ms);

        let nose = Vec2::new(pos.x + size.x - 6.0, pos.y + size.y / 2.0);
        let shots: Vec<_> = match self.kind {
            WeaponKind::Basic => vec![catalog::player_bullet(nose)],
            WeaponKind::Spreader => {
                let center = pos + size / 2.0;
                [0.0, 10.0, 350.0]
                    .into_iter()
                    .map(|angle| catalog::spreader_bullet(center, angle))
                    .collect()
            }
            WeaponKind::ReverseFire => [0.0, 140.0, 220.0]
                .into_iter()
                .map(|angle| catalog::reverse_bullet(nose, angle))
                .collect(),
            WeaponKind::LaserBeam => vec![catalog::laser_beam(nose, now_ms)],
        };
        out.extend(shots.into_iter().map(|e| Spawned::new(GroupId::PlayerShots, e)));
    }
}

/// Control intent for the next tick, set from input once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Each axis in -1..=1
    pub direction: Vec2,
    pub trigger: bool,
}

/// What survives from one level to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotRecord {
    pub lives: u8,
    pub speed: f32,
    pub weapon: WeaponKind,
}

impl Default for PilotRecord {
    fn default() -> Self {
        Self {
            lives: PLAYER_LIVES,
            speed: PLAYER_SPEED,
            weapon: WeaponKind::Basic,
        }
    }
}

/// Player-specific state carried by the player entity's role
#[derive(Debug, Clone)]
pub struct Pilot {
    pub lives: u8,
    pub speed: f32,
    pub weapon: Weapon,
    pub intent: Intent,
    /// Gliding back onto the screen; input ignored
    pub respawning: bool,
    pub protected_until_ms: f64,
}

impl Pilot {
    pub fn new(record: PilotRecord) -> Self {
        Self {
            lives: record.lives,
            speed: record.speed,
            weapon: Weapon::new(record.weapon),
            intent: Intent::default(),
            respawning: false,
            protected_until_ms: 0.0,
        }
    }

    pub fn record(&self) -> PilotRecord {
        PilotRecord {
            lives: self.lives,
            speed: self.speed,
            weapon: self.weapon.kind,
        }
    }

    /// Collision with enemies and hostile fire is suppressed while true
    pub fn is_protected(&self, now_ms: f64) -> bool {
        self.respawning || now_ms < self.protected_until_ms
    }

    /// Blink while protected
    pub fn visible(&self, now_ms: f64) -> bool {
        if !self.is_protected(now_ms) {
            return true;
        }
        (now_ms / BLINK_MS) as u64 % 2 == 0
    }

    pub fn step(&mut self, pos: &mut Vec2, size: Vec2, ctx: &TickContext, out: &mut Vec<Spawned>) {
        let step = self.speed * ctx.dt;
        if self.respawning {
            pos.x += step;
            if pos.x >= PLAYER_RESPAWN_X {
                self.respawning = false;
            }
            return;
        }

        *pos += self.intent.direction * step;
        let field = &ctx.playfield;
        pos.x = pos.x.clamp(field.left(), field.right() - size.x);
        pos.y = pos.y.clamp(field.top(), field.bottom() - size.y);

        if self.intent.trigger {
            self.weapon.fire(*pos, size, ctx.now.millis(), out);
        }
    }

    /// Lose a life. Returns true when no lives remain.
    ///
    /// With lives left the ship is moved off-screen and glides back in,
    /// protected for `protection_ms` from now. The weapon always resets.
    pub fn die(&mut self, pos: &mut Vec2, size: Vec2, now_ms: f64, protection_ms: f64) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.weapon = Weapon::default();
        self.intent = Intent::default();
        if self.lives == 0 {
            return true;
        }
        *pos = Vec2::new(-20.0 - size.x, PLAYER_START.1);
        self.respawning = true;
        self.protected_until_ms = now_ms + protection_ms;
        false
    }

    pub fn apply(&mut self, pickup: PickupKind) {
        match pickup {
            PickupKind::Spreader => self.weapon = Weapon::new(WeaponKind::Spreader),
            PickupKind::ReverseFire => self.weapon = Weapon::new(WeaponKind::ReverseFire),
            PickupKind::LaserBeam => self.weapon = Weapon::new(WeaponKind::LaserBeam),
            PickupKind::SpeedUp => {
                self.speed = (self.speed + PLAYER_SPEED_STEP).min(PLAYER_MAX_SPEED);
            }
        }
    }
}
