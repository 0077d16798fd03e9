//! Entities and the per-tick update contract
//!
//! Every dynamic object (player, enemies, projectiles, pickups, effects) is an
//! `Entity`. Behaviour differences are expressed by pluggable movement and fire
//! strategies chosen by the catalog at construction time, not by subtyping.

use glam::Vec2;

use super::behavior::{Fire, Movement};
use super::catalog;
use super::clock::SimTime;
use super::groups::GroupId;
use super::player::{Pilot, PickupKind};
use super::rect::{HitRegion, Rect};
use super::spawn::Viewport;
use crate::surface::{SpriteId, Surface};
use crate::to_display;

/// Everything an entity may read while updating
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Simulated time of this tick
    pub now: SimTime,
    /// Fixed timestep in seconds
    pub dt: f32,
    /// Area entities live in; leaving it may kill them
    pub playfield: Rect,
    /// Scroll state (read-only for entities)
    pub viewport: &'a Viewport,
    /// Player's nominal rect, for aiming and homing
    pub player: Option<Rect>,
}

/// A newly created entity tagged with the group it belongs to
#[derive(Debug, Clone)]
pub struct Spawned {
    pub group: GroupId,
    pub entity: Entity,
}

impl Spawned {
    pub fn new(group: GroupId, entity: Entity) -> Self {
        Self { group, entity }
    }
}

/// What part an entity plays in the collision rules
#[derive(Debug, Clone)]
pub enum Role {
    Player(Pilot),
    Enemy,
    Projectile {
        /// Fired by enemies (true) or by the player (false)
        hostile: bool,
        /// Damages every target it overlaps without being consumed
        pass_through: bool,
    },
    Pickup(PickupKind),
    Effect,
}

impl Role {
    /// Group an entity with this role lives in
    pub fn home_group(&self) -> GroupId {
        match self {
            Role::Player(_) => GroupId::Player,
            Role::Enemy => GroupId::Enemies,
            Role::Projectile { hostile: true, .. } => GroupId::EnemyShots,
            Role::Projectile { hostile: false, .. } => GroupId::PlayerShots,
            Role::Pickup(_) => GroupId::Pickups,
            Role::Effect => GroupId::Effects,
        }
    }
}

/// Where the spawn hook places an entity when it becomes active
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Keep the queued position
    AsQueued,
    /// Just past the right edge of the playfield
    RightEdge,
    /// Just before the left edge of the playfield
    LeftEdge,
    /// At a fixed x inside the playfield
    AtX(f32),
}

/// Playfield edges an entity dies beyond once fully past them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exit {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Exit {
    pub const NONE: Exit = Exit {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };
    pub const LEFT: Exit = Exit {
        left: true,
        ..Exit::NONE
    };
    pub const RIGHT: Exit = Exit {
        right: true,
        ..Exit::NONE
    };
    pub const ALL: Exit = Exit {
        left: true,
        right: true,
        top: true,
        bottom: true,
    };

    pub fn past(&self, rect: &Rect, bounds: &Rect) -> bool {
        (self.left && rect.right() < bounds.left())
            || (self.right && rect.left() > bounds.right())
            || (self.top && rect.bottom() < bounds.top())
            || (self.bottom && rect.top() > bounds.bottom())
    }
}

/// What an entity leaves behind when destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debris {
    None,
    /// A single explosion animation
    Explosion,
    /// Eight shrapnel pieces flying outward; they can hit the player
    Shrapnel,
}

/// Frame animation driven by simulated time
#[derive(Debug, Clone)]
pub struct Animation {
    pub frames: u16,
    pub delay_ms: f64,
    pub frame: u16,
    /// Play through once, then the owner dies
    pub once: bool,
    last_ms: Option<f64>,
}

impl Animation {
    pub fn still() -> Self {
        Self::looping(1, 0.0)
    }

    pub fn looping(frames: u16, fps: f64) -> Self {
        Self {
            frames: frames.max(1),
            delay_ms: if fps > 0.0 { 1000.0 / fps } else { f64::INFINITY },
            frame: 0,
            once: false,
            last_ms: None,
        }
    }

    pub fn once(frames: u16, fps: f64) -> Self {
        Self {
            once: true,
            ..Self::looping(frames, fps)
        }
    }

    /// Step the animation; returns true when a one-shot animation has finished
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let last = *self.last_ms.get_or_insert(now_ms);
        if now_ms - last > self.delay_ms {
            self.last_ms = Some(now_ms);
            self.frame += 1;
            if self.frame >= self.frames {
                self.frame = 0;
                return self.once;
            }
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    /// Catalog name, used in diagnostics and events
    pub kind: &'static str,
    pub role: Role,
    /// Authoritative fractional position (top-left of the nominal rect)
    pub pos: Vec2,
    /// Nominal drawing size
    pub size: Vec2,
    pub sprite: SpriteId,
    pub animation: Animation,
    pub regions: Vec<HitRegion>,
    /// Extra hits absorbed before destruction; 0 means a single hit destroys
    pub hits_remaining: u32,
    /// Awarded when destroyed by the player's fire
    pub points: u32,
    pub alive: bool,
    pub visible: bool,
    pub placement: Placement,
    pub exit: Exit,
    pub movement: Movement,
    pub fire: Fire,
    /// Pickup released on destruction
    pub drop: Option<PickupKind>,
    pub debris: Debris,
    /// Simulated time at which the entity expires on its own
    pub expires_ms: Option<f64>,
}

impl Entity {
    pub fn new(kind: &'static str, role: Role, pos: Vec2, size: Vec2, sprite: SpriteId) -> Self {
        Self {
            kind,
            role,
            pos,
            size,
            sprite,
            animation: Animation::still(),
            regions: Vec::new(),
            hits_remaining: 0,
            points: 0,
            alive: true,
            visible: true,
            placement: Placement::AsQueued,
            exit: Exit::NONE,
            movement: Movement::Still,
            fire: Fire::None,
            drop: None,
            debris: Debris::None,
            expires_ms: None,
        }
    }

    pub fn with_region(mut self, region: HitRegion) -> Self {
        self.regions.push(region);
        self.sync_regions();
        self
    }

    /// Single vulnerable hitbox at `offset`
    pub fn with_hitbox(self, offset: Vec2, size: Vec2) -> Self {
        self.with_region(HitRegion::new("body", offset, size))
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_fire(mut self, fire: Fire) -> Self {
        self.fire = fire;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_score(mut self, points: u32, hits_remaining: u32) -> Self {
        self.points = points;
        self.hits_remaining = hits_remaining;
        self
    }

    pub fn with_placement(mut self, placement: Placement, exit: Exit) -> Self {
        self.placement = placement;
        self.exit = exit;
        self
    }

    pub fn with_drop(mut self, drop: Option<PickupKind>) -> Self {
        self.drop = drop;
        self
    }

    pub fn with_debris(mut self, debris: Debris) -> Self {
        self.debris = debris;
        self
    }

    pub fn expiring_at(mut self, ms: f64) -> Self {
        self.expires_ms = Some(ms);
        self
    }

    /// Nominal rect (derived from the fractional position)
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn pilot(&self) -> Option<&Pilot> {
        match &self.role {
            Role::Player(pilot) => Some(pilot),
            _ => None,
        }
    }

    pub fn pilot_mut(&mut self) -> Option<&mut Pilot> {
        match &mut self.role {
            Role::Player(pilot) => Some(pilot),
            _ => None,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(
            self.role,
            Role::Projectile {
                pass_through: true,
                ..
            }
        )
    }

    /// Move region geometry to the current position
    pub fn sync_regions(&mut self) {
        for region in &mut self.regions {
            region.sync(self.pos);
        }
    }

    /// Spawn hook: move from the queued level position onto the playfield
    pub fn spawn(&mut self, playfield: &Rect, now: SimTime) {
        match self.placement {
            Placement::AsQueued => {}
            Placement::RightEdge => self.pos.x = playfield.right(),
            Placement::LeftEdge => self.pos.x = playfield.left() - self.size.x,
            Placement::AtX(x) => self.pos.x = x,
        }
        self.movement.on_spawn(self.pos, now);
        self.sync_regions();
    }

    /// Advance one tick. Returns entities created this tick (shots, effects).
    pub fn update(&mut self, ctx: &TickContext) -> Vec<Spawned> {
        let mut spawned = Vec::new();
        if !self.alive {
            return spawned;
        }

        let now_ms = ctx.now.millis();
        if self.animation.advance(now_ms) {
            self.alive = false;
            return spawned;
        }

        match &mut self.role {
            Role::Player(pilot) => {
                pilot.step(&mut self.pos, self.size, ctx, &mut spawned);
                self.visible = pilot.visible(now_ms);
            }
            _ => {
                self.movement.step(&mut self.pos, self.size, ctx);
                self.fire.poll(self.pos, self.size, ctx, &mut spawned);
            }
        }

        if self.expires_ms.is_some_and(|t| now_ms >= t) || self.exit.past(&self.rect(), &ctx.playfield) {
            self.alive = false;
        }

        self.sync_regions();
        spawned
    }

    /// Take one hit. Armour soaks it while any remains; a hit on an
    /// unarmoured entity destroys it, so `n` armour means `n + 1` hits.
    pub fn absorb_hit(&mut self) -> bool {
        if self.hits_remaining > 0 {
            self.hits_remaining -= 1;
            false
        } else {
            true
        }
    }

    /// Destroy the entity, producing its debris and any dropped pickup
    pub fn explode(&mut self) -> Vec<Spawned> {
        self.alive = false;
        let mut spawned = Vec::new();
        match self.debris {
            Debris::None => {}
            Debris::Explosion => {
                spawned.push(Spawned::new(GroupId::Effects, catalog::explosion(self.pos)));
            }
            Debris::Shrapnel => {
                let center = self.center();
                for angle in (0..360).step_by(45) {
                    spawned.push(Spawned::new(
                        GroupId::Effects,
                        catalog::shrapnel(center, angle as f32),
                    ));
                }
            }
        }
        if let Some(kind) = self.drop.take() {
            spawned.push(Spawned::new(GroupId::Pickups, catalog::pickup(kind, self.pos)));
        }
        spawned
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.alive && self.visible {
            let (x, y) = to_display(self.pos);
            surface.blit(self.sprite, self.animation.frame, x, y);
        }
    }
}
