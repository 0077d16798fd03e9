//! Entity catalog
//!
//! Constructors for every entity type in the game. Level records refer to
//! enemies by catalog name; projectiles, effects and pickups are created by
//! other entities at runtime.
//!
//! Armour values count extra hits: an enemy with armour `n` is destroyed by
//! hit `n + 1`.

use glam::Vec2;

use super::behavior::{BossPhase, Fire, Movement, Vertical};
use super::entity::{Animation, Debris, Entity, Exit, Placement, Role};
use super::factory::FactoryRegistry;
use super::player::{PickupKind, Pilot, PilotRecord};
use super::rect::HitRegion;
use crate::consts::PLAYER_START;
use crate::heading;

const PLAYER_BULLET_SPEED: f32 = 400.0;
const SPREADER_BULLET_SPEED: f32 = 300.0;
const ENEMY_BULLET_SPEED: f32 = 135.0;
const SHRAPNEL_SPEED: f32 = 35.0;
const PICKUP_SPEED: f32 = 100.0;
/// Laser beam lifetime after firing
const BEAM_MS: f64 = 600.0;

/// Animation rate shared by enemy sprites
const ENEMY_FPS: f64 = 20.0;

fn player_shot(kind: &'static str, pos: Vec2, size: Vec2, vel: Vec2, sprite: &'static str) -> Entity {
    Entity::new(
        kind,
        Role::Projectile {
            hostile: false,
            pass_through: false,
        },
        pos,
        size,
        sprite,
    )
    .with_hitbox(Vec2::ZERO, size)
    .with_movement(Movement::Straight { vel })
    .with_placement(Placement::AsQueued, Exit::ALL)
}

pub fn player(record: PilotRecord) -> Entity {
    Entity::new(
        "player",
        Role::Player(Pilot::new(record)),
        Vec2::new(PLAYER_START.0, PLAYER_START.1),
        Vec2::new(32.0, 16.0),
        "player",
    )
    .with_hitbox(Vec2::new(1.0, 3.0), Vec2::new(28.0, 8.0))
}

/// Straight shot; `nose` is the left edge, vertical center
pub fn player_bullet(nose: Vec2) -> Entity {
    player_shot(
        "player_bullet",
        nose - Vec2::new(0.0, 1.5),
        Vec2::new(8.0, 3.0),
        Vec2::new(PLAYER_BULLET_SPEED, 0.0),
        "pshot",
    )
}

pub fn spreader_bullet(center: Vec2, angle: f32) -> Entity {
    player_shot(
        "spreader_bullet",
        center - Vec2::splat(3.0),
        Vec2::splat(6.0),
        heading(angle) * SPREADER_BULLET_SPEED,
        "spreadshot",
    )
}

pub fn reverse_bullet(nose: Vec2, angle: f32) -> Entity {
    player_shot(
        "reverse_bullet",
        nose - Vec2::new(0.0, 1.5),
        Vec2::new(8.0, 3.0),
        heading(angle) * PLAYER_BULLET_SPEED,
        "pshot",
    )
}

/// Pass-through beam; survives the hits that destroy, stopped by anything
/// that survives it. Expires shortly after firing.
pub fn laser_beam(nose: Vec2, now_ms: f64) -> Entity {
    let size = Vec2::new(32.0, 4.0);
    Entity::new(
        "laser_beam",
        Role::Projectile {
            hostile: false,
            pass_through: true,
        },
        nose - Vec2::new(0.0, 2.0),
        size,
        "beam",
    )
    .with_hitbox(Vec2::ZERO, size)
    .with_movement(Movement::Straight {
        vel: Vec2::new(PLAYER_BULLET_SPEED, 0.0),
    })
    .with_placement(Placement::AsQueued, Exit::RIGHT)
    .expiring_at(now_ms + BEAM_MS)
}

/// Hostile shot travelling with `vel`, centered vertically on `mouth`
pub fn aimed_bullet(mouth: Vec2, vel: Vec2) -> Entity {
    Entity::new(
        "enemy_bullet",
        Role::Projectile {
            hostile: true,
            pass_through: false,
        },
        mouth - Vec2::new(0.0, 4.0),
        Vec2::splat(8.0),
        "eshot",
    )
    .with_hitbox(Vec2::ONE, Vec2::splat(6.0))
    .with_movement(Movement::Straight { vel })
    .with_placement(Placement::AsQueued, Exit::ALL)
}

pub fn enemy_bullet(mouth: Vec2) -> Entity {
    aimed_bullet(mouth, Vec2::new(-ENEMY_BULLET_SPEED, 0.0))
}

/// Pure animation, no hit-region
pub fn explosion(pos: Vec2) -> Entity {
    Entity::new("explosion", Role::Effect, pos, Vec2::splat(16.0), "explosion")
        .with_animation(Animation::once(5, 10.0))
}

/// Debris piece flying outward from `center`; kills the player on contact
pub fn shrapnel(center: Vec2, angle: f32) -> Entity {
    Entity::new(
        "shrapnel",
        Role::Effect,
        center - Vec2::splat(4.0),
        Vec2::splat(8.0),
        "shrapnel",
    )
    .with_hitbox(Vec2::ONE, Vec2::splat(6.0))
    .with_movement(Movement::Straight {
        vel: heading(angle) * SHRAPNEL_SPEED,
    })
    .with_placement(Placement::AsQueued, Exit::ALL)
}

pub fn pickup(kind: PickupKind, pos: Vec2) -> Entity {
    let sprite = match kind {
        PickupKind::Spreader => "pu_spreader",
        PickupKind::ReverseFire => "pu_reverse",
        PickupKind::LaserBeam => "pu_laser",
        PickupKind::SpeedUp => "pu_speed",
    };
    Entity::new("pickup", Role::Pickup(kind), pos, Vec2::splat(16.0), sprite)
        .with_hitbox(Vec2::new(1.0, 2.0), Vec2::new(14.0, 12.0))
        .with_movement(Movement::Straight {
            vel: Vec2::new(-PICKUP_SPEED, 0.0),
        })
        .with_placement(Placement::AsQueued, Exit::LEFT)
}

fn enemy(kind: &'static str, pos: Vec2, size: Vec2) -> Entity {
    Entity::new(kind, Role::Enemy, pos, size, kind)
        .with_animation(Animation::looping(2, ENEMY_FPS))
        .with_placement(Placement::RightEdge, Exit::LEFT)
        .with_debris(Debris::Explosion)
}

fn leftward(speed: f32) -> Movement {
    Movement::Straight {
        vel: Vec2::new(-speed, 0.0),
    }
}

fn sine(vx: f32, amplitude: f32, frequency: f32) -> Movement {
    Movement::SineWave {
        vx,
        angle: 0.0,
        amplitude,
        frequency,
    }
}

/// Fast straight flyer
pub fn enemy_01(pos: Vec2) -> Entity {
    enemy("enemy_01", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::new(0.0, 2.0), Vec2::new(15.0, 12.0))
        .with_movement(leftward(145.0))
        .with_score(120, 0)
        .with_drop(Some(PickupKind::SpeedUp))
}

/// Slow flyer firing volleys of three
pub fn enemy_02(pos: Vec2) -> Entity {
    enemy("enemy_02", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::new(0.0, 2.0), Vec2::new(15.0, 12.0))
        .with_movement(leftward(25.0))
        .with_fire(Fire::volley(290.0, 64.0))
        .with_score(90, 0)
        .with_drop(Some(PickupKind::LaserBeam))
}

/// Sine-wave flyer
pub fn enemy_03(pos: Vec2) -> Entity {
    enemy("enemy_03", pos, Vec2::new(24.0, 16.0))
        .with_hitbox(Vec2::new(4.0, 1.0), Vec2::new(18.0, 13.0))
        .with_movement(sine(-75.0, 2.75, 5.0))
        .with_score(175, 0)
        .with_drop(Some(PickupKind::Spreader))
}

/// Turret that parks at x=240 and patrols vertically
pub fn enemy_04(pos: Vec2) -> Entity {
    enemy("enemy_04", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::ONE, Vec2::splat(14.0))
        .with_placement(Placement::AtX(240.0), Exit::NONE)
        .with_movement(Movement::VerticalPatrol {
            speed: 50.0,
            direction: Vertical::Up,
        })
        .with_fire(Fire::interval(1000.0, Vec2::ZERO))
        .with_score(125, 0)
        .with_debris(Debris::Shrapnel)
}

/// Armoured carrier, bursts into shrapnel
pub fn enemy_05(pos: Vec2) -> Entity {
    enemy("enemy_05", pos, Vec2::splat(32.0))
        .with_hitbox(Vec2::splat(4.0), Vec2::new(25.0, 21.0))
        .with_movement(leftward(15.0))
        .with_fire(Fire::interval(1000.0, Vec2::new(2.0, 5.0)))
        .with_score(250, 6)
        .with_debris(Debris::Shrapnel)
        .with_drop(Some(PickupKind::LaserBeam))
}

/// Wide sine-wave flyer taking two hits
pub fn enemy_06(pos: Vec2) -> Entity {
    enemy("enemy_06", pos, Vec2::new(24.0, 16.0))
        .with_hitbox(Vec2::new(4.0, 1.0), Vec2::new(18.0, 13.0))
        .with_movement(sine(-70.0, 3.25, 3.5))
        .with_score(125, 1)
        .with_drop(Some(PickupKind::Spreader))
}

/// Homing flyer
pub fn enemy_07(pos: Vec2) -> Entity {
    enemy("enemy_07", pos, Vec2::new(24.0, 16.0))
        .with_hitbox(Vec2::new(4.0, 1.0), Vec2::new(18.0, 13.0))
        .with_placement(
            Placement::RightEdge,
            Exit {
                right: false,
                ..Exit::ALL
            },
        )
        .with_movement(Movement::Homing {
            speed: 95.0,
            vertical_speed: 45.0,
            turn: None,
        })
        .with_score(120, 3)
        .with_drop(Some(PickupKind::SpeedUp))
}

/// Fast flyer entering from behind
pub fn enemy_08(pos: Vec2) -> Entity {
    enemy("enemy_08", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::new(0.0, 2.0), Vec2::new(15.0, 12.0))
        .with_placement(Placement::LeftEdge, Exit::RIGHT)
        .with_movement(Movement::Straight {
            vel: Vec2::new(135.0, 0.0),
        })
        .with_score(120, 0)
        .with_drop(Some(PickupKind::SpeedUp))
}

/// Sine-wave flyer entering from behind
pub fn enemy_09(pos: Vec2) -> Entity {
    enemy("enemy_09", pos, Vec2::new(24.0, 16.0))
        .with_hitbox(Vec2::new(4.0, 1.0), Vec2::new(18.0, 13.0))
        .with_placement(Placement::LeftEdge, Exit::RIGHT)
        .with_movement(sine(55.0, 2.75, 5.0))
        .with_score(175, 0)
        .with_drop(Some(PickupKind::Spreader))
}

/// Wide sine-wave flyer entering from behind
pub fn enemy_10(pos: Vec2) -> Entity {
    enemy("enemy_10", pos, Vec2::new(24.0, 16.0))
        .with_hitbox(Vec2::new(4.0, 1.0), Vec2::new(18.0, 13.0))
        .with_placement(Placement::LeftEdge, Exit::RIGHT)
        .with_movement(sine(65.0, 3.25, 3.5))
        .with_score(250, 0)
        .with_drop(Some(PickupKind::Spreader))
}

/// Slow flyer aiming at the player
pub fn enemy_11(pos: Vec2) -> Entity {
    enemy("enemy_11", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::ONE, Vec2::splat(14.0))
        .with_movement(leftward(40.0))
        .with_fire(Fire::aimed(1250.0, 75.0))
        .with_score(155, 2)
        .with_drop(Some(PickupKind::ReverseFire))
}

/// Flyer shifting up and down at intervals
pub fn enemy_12(pos: Vec2) -> Entity {
    enemy("enemy_12", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::new(0.0, 2.0), Vec2::new(15.0, 12.0))
        .with_movement(Movement::shift_patrol(90.0, 80.0, 1000.0, pos.y))
        .with_score(120, 0)
        .with_drop(Some(PickupKind::SpeedUp))
}

/// Shifting flyer aiming at the player
pub fn enemy_13(pos: Vec2) -> Entity {
    enemy("enemy_13", pos, Vec2::splat(16.0))
        .with_hitbox(Vec2::ONE, Vec2::splat(14.0))
        .with_movement(Movement::shift_patrol(40.0, 110.0, 800.0, pos.y))
        .with_fire(Fire::aimed(1250.0, 75.0))
        .with_score(155, 2)
        .with_drop(Some(PickupKind::ReverseFire))
}

/// End-of-level boss. Only the core takes damage.
pub fn boss(pos: Vec2) -> Entity {
    let armor = |name, x, y, w, h| HitRegion::armor(name, Vec2::new(x, y), Vec2::new(w, h));
    Entity::new("boss", Role::Enemy, pos, Vec2::new(64.0, 96.0), "boss")
        .with_region(armor("upper_fin", 24.0, 0.0, 40.0, 20.0))
        .with_region(armor("upper_wing", 8.0, 20.0, 56.0, 18.0))
        .with_region(armor("upper_jaw", 0.0, 30.0, 20.0, 10.0))
        .with_region(HitRegion::new("core", Vec2::new(6.0, 42.0), Vec2::splat(12.0)))
        .with_region(armor("lower_jaw", 0.0, 56.0, 20.0, 10.0))
        .with_region(armor("lower_wing", 8.0, 60.0, 56.0, 18.0))
        .with_region(armor("lower_fin", 24.0, 76.0, 40.0, 20.0))
        .with_animation(Animation::looping(2, 8.0))
        .with_placement(Placement::RightEdge, Exit::NONE)
        .with_movement(Movement::Boss {
            hold_x: 240.0,
            speed: 40.0,
            vertical_speed: 30.0,
            direction: Vertical::Down,
            phase: BossPhase::Entering,
        })
        .with_fire(Fire::BossPattern {
            aimed_ms: 900.0,
            fan_ms: 2500.0,
            speed: 90.0,
            last_aimed_ms: 0.0,
            last_fan_ms: 0.0,
        })
        .with_score(5000, 40)
        .with_debris(Debris::Shrapnel)
}

/// Register every level-placeable entity type
pub fn register_standard(registry: &mut FactoryRegistry) {
    registry.register("enemy_01", enemy_01);
    registry.register("enemy_02", enemy_02);
    registry.register("enemy_03", enemy_03);
    registry.register("enemy_04", enemy_04);
    registry.register("enemy_05", enemy_05);
    registry.register("enemy_06", enemy_06);
    registry.register("enemy_07", enemy_07);
    registry.register("enemy_08", enemy_08);
    registry.register("enemy_09", enemy_09);
    registry.register("enemy_10", enemy_10);
    registry.register("enemy_11", enemy_11);
    registry.register("enemy_12", enemy_12);
    registry.register("enemy_13", enemy_13);
    registry.register("boss", boss);
}
