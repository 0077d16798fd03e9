//! Collision resolution between entity groups
//!
//! Runs once per tick after every group has updated. Rules are applied in a
//! fixed order, pairs within a rule in insertion order. Liveness (and player
//! protection) is checked before every pair test, so anything destroyed
//! earlier in the pass takes no further part in it.
//!
//! Entities created here (explosions, shrapnel, pickups) are returned to the
//! caller rather than inserted while groups are borrowed.

use super::catalog;
use super::clock::SimTime;
use super::entity::{Entity, Role, Spawned};
use super::groups::{GroupId, GroupRegistry};
use super::player::PickupKind;
use super::rect::{Strike, strike, touching};

/// Gameplay feedback for the host (sound, score display, flow control)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PlayerDied {
        lives_left: u8,
        game_over: bool,
    },
    EnemyDestroyed {
        kind: &'static str,
        points: u32,
        pickup: Option<PickupKind>,
    },
    EnemyDamaged {
        kind: &'static str,
        hits_remaining: u32,
    },
    /// A shot struck armour and did no damage
    HitBlocked {
        kind: &'static str,
    },
    PickupCollected(PickupKind),
}

/// Outcome of one resolver pass
#[derive(Debug, Default)]
pub struct Resolution {
    pub events: Vec<GameEvent>,
    /// Score earned this pass
    pub points: u32,
    /// Entities to insert once the pass is done
    pub spawned: Vec<Spawned>,
}

impl Resolution {
    pub fn player_died(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::PlayerDied { .. }))
    }
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    /// Protection window after a death, in simulated milliseconds
    pub invulnerability_ms: f64,
}

impl CollisionResolver {
    pub fn new(invulnerability_ms: f64) -> Self {
        Self { invulnerability_ms }
    }

    pub fn resolve(&self, groups: &mut GroupRegistry, now: SimTime) -> Resolution {
        let now_ms = now.millis();
        let mut res = Resolution::default();

        self.player_vs_enemies(groups, now_ms, &mut res);
        Self::shots_vs_enemies(groups, &mut res);
        self.effects_vs_player(groups, now_ms, &mut res);
        self.enemy_shots_vs_player(groups, now_ms, &mut res);
        Self::pickups_vs_player(groups, &mut res);

        res
    }

    /// Body collision: both die, the player's shots in flight are cleared
    fn player_vs_enemies(&self, groups: &mut GroupRegistry, now_ms: f64, res: &mut Resolution) {
        let mut rammed = false;
        {
            let (players, enemies) = groups.pair_mut(GroupId::Player, GroupId::Enemies);
            for player in players.members.iter_mut() {
                for enemy in enemies.members.iter_mut() {
                    if !player.alive || !enemy.alive || is_protected(player, now_ms) {
                        continue;
                    }
                    if touching(&player.regions, &enemy.regions) {
                        destroy_enemy(enemy, false, res);
                        self.kill_player(player, now_ms, res);
                        rammed = true;
                    }
                }
            }
        }
        if rammed {
            for shot in groups.group_mut(GroupId::PlayerShots).members.iter_mut() {
                shot.alive = false;
            }
        }
    }

    fn shots_vs_enemies(groups: &mut GroupRegistry, res: &mut Resolution) {
        let (enemies, shots) = groups.pair_mut(GroupId::Enemies, GroupId::PlayerShots);
        for enemy in enemies.members.iter_mut() {
            for shot in shots.members.iter_mut() {
                if !enemy.alive {
                    break;
                }
                if !shot.alive {
                    continue;
                }
                match strike(&shot.regions, &enemy.regions) {
                    Strike::Miss => {}
                    Strike::Blocked => {
                        shot.alive = false;
                        res.events.push(GameEvent::HitBlocked { kind: enemy.kind });
                    }
                    Strike::Vulnerable => {
                        if enemy.absorb_hit() {
                            // Beams carry on through what they destroy
                            shot.alive = shot.is_pass_through();
                            destroy_enemy(enemy, true, res);
                        } else {
                            shot.alive = false;
                            res.events.push(GameEvent::EnemyDamaged {
                                kind: enemy.kind,
                                hits_remaining: enemy.hits_remaining,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Debris with a hit-region kills the player; pure animations are skipped
    fn effects_vs_player(&self, groups: &mut GroupRegistry, now_ms: f64, res: &mut Resolution) {
        let (players, effects) = groups.pair_mut(GroupId::Player, GroupId::Effects);
        for player in players.members.iter_mut() {
            for effect in effects.members.iter() {
                if effect.regions.is_empty() {
                    continue;
                }
                if !player.alive || !effect.alive || is_protected(player, now_ms) {
                    continue;
                }
                if touching(&effect.regions, &player.regions) {
                    self.kill_player(player, now_ms, res);
                }
            }
        }
    }

    fn enemy_shots_vs_player(&self, groups: &mut GroupRegistry, now_ms: f64, res: &mut Resolution) {
        let (players, shots) = groups.pair_mut(GroupId::Player, GroupId::EnemyShots);
        for player in players.members.iter_mut() {
            for shot in shots.members.iter_mut() {
                if !player.alive || !shot.alive || is_protected(player, now_ms) {
                    continue;
                }
                if touching(&shot.regions, &player.regions) {
                    shot.alive = false;
                    self.kill_player(player, now_ms, res);
                }
            }
        }
    }

    /// Pickups are collected even while protected
    fn pickups_vs_player(groups: &mut GroupRegistry, res: &mut Resolution) {
        let (players, pickups) = groups.pair_mut(GroupId::Player, GroupId::Pickups);
        for player in players.members.iter_mut() {
            for pickup in pickups.members.iter_mut() {
                if !player.alive || !pickup.alive {
                    continue;
                }
                let Role::Pickup(kind) = pickup.role else {
                    continue;
                };
                if touching(&pickup.regions, &player.regions) {
                    pickup.alive = false;
                    if let Some(pilot) = player.pilot_mut() {
                        pilot.apply(kind);
                    }
                    res.events.push(GameEvent::PickupCollected(kind));
                }
            }
        }
    }

    fn kill_player(&self, player: &mut Entity, now_ms: f64, res: &mut Resolution) {
        res.spawned.push(Spawned::new(GroupId::Effects, catalog::explosion(player.pos)));
        let Role::Player(pilot) = &mut player.role else {
            player.alive = false;
            return;
        };
        let game_over = pilot.die(&mut player.pos, player.size, now_ms, self.invulnerability_ms);
        let lives_left = pilot.lives;
        if game_over {
            player.alive = false;
        }
        player.sync_regions();
        log::debug!("Player died ({lives_left} lives left)");
        res.events.push(GameEvent::PlayerDied { lives_left, game_over });
    }
}

fn is_protected(player: &Entity, now_ms: f64) -> bool {
    player.pilot().is_some_and(|p| p.is_protected(now_ms))
}

/// Destroy an enemy. Points are only awarded when the player's fire did it.
fn destroy_enemy(enemy: &mut Entity, award: bool, res: &mut Resolution) {
    let pickup = enemy.drop;
    res.spawned.extend(enemy.explode());
    let points = if award { enemy.points } else { 0 };
    res.points += points;
    log::debug!("{} destroyed (+{points})", enemy.kind);
    res.events.push(GameEvent::EnemyDestroyed {
        kind: enemy.kind,
        points,
        pickup,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::behavior::Movement;
    use crate::sim::entity::Debris;
    use crate::sim::player::PilotRecord;
    use crate::sim::rect::HitRegion;
    use glam::Vec2;

    const PROTECTION_MS: f64 = 2000.0;

    fn at(mut entity: Entity, pos: Vec2) -> Entity {
        entity.pos = pos;
        entity.sync_regions();
        entity
    }

    fn target(hits: u32) -> Entity {
        Entity::new("target", Role::Enemy, Vec2::new(200.0, 100.0), Vec2::splat(16.0), "e")
            .with_hitbox(Vec2::ZERO, Vec2::splat(16.0))
            .with_movement(Movement::Still)
            .with_debris(Debris::Explosion)
            .with_score(100, hits)
    }

    fn bullet_on(enemy: &Entity) -> Spawned {
        Spawned::new(GroupId::PlayerShots, catalog::player_bullet(enemy.center()))
    }

    fn with_player() -> GroupRegistry {
        let mut groups = GroupRegistry::new();
        groups.insert(Spawned::new(GroupId::Player, catalog::player(PilotRecord::default())));
        groups
    }

    fn player_pos(groups: &GroupRegistry) -> Vec2 {
        groups.group(GroupId::Player).members[0].pos
    }

    #[test]
    fn test_two_armour_needs_three_projectiles() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let enemy = target(2);
        groups.insert(bullet_on(&enemy));
        groups.insert(Spawned::new(GroupId::Enemies, enemy.clone()));

        let res = resolver.resolve(&mut groups, SimTime(1));
        assert_eq!(
            res.events,
            [GameEvent::EnemyDamaged {
                kind: "target",
                hits_remaining: 1
            }]
        );
        // The spent projectile is never counted again
        let res = resolver.resolve(&mut groups, SimTime(2));
        assert!(res.events.is_empty());

        groups.insert(bullet_on(&enemy));
        resolver.resolve(&mut groups, SimTime(3));
        assert!(groups.group(GroupId::Enemies).members[0].alive);
        assert_eq!(groups.group(GroupId::Enemies).members[0].hits_remaining, 0);

        groups.insert(bullet_on(&enemy));
        let res = resolver.resolve(&mut groups, SimTime(4));
        assert!(!groups.group(GroupId::Enemies).members[0].alive);
        assert_eq!(res.points, 100);
    }

    #[test]
    fn test_single_armour_survives_first_shot() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let enemy = at(catalog::enemy_06(Vec2::ZERO), Vec2::new(200.0, 100.0));
        groups.insert(bullet_on(&enemy));
        groups.insert(Spawned::new(GroupId::Enemies, enemy.clone()));

        let res = resolver.resolve(&mut groups, SimTime(1));
        assert!(groups.group(GroupId::Enemies).members[0].alive);
        assert_eq!(res.points, 0);

        groups.insert(bullet_on(&enemy));
        let res = resolver.resolve(&mut groups, SimTime(2));
        assert!(!groups.group(GroupId::Enemies).members[0].alive);
        assert_eq!(res.points, enemy.points);
    }

    #[test]
    fn test_beam_consumed_by_surviving_enemy() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let enemy = at(catalog::enemy_05(Vec2::ZERO), Vec2::new(100.0, 100.0));
        let armour = enemy.hits_remaining;
        let beam = at(catalog::laser_beam(Vec2::ZERO, 0.0), enemy.center() - Vec2::new(16.0, 2.0));
        groups.insert(Spawned::new(GroupId::PlayerShots, beam));
        groups.insert(Spawned::new(GroupId::Enemies, enemy));

        let res = resolver.resolve(&mut groups, SimTime(1));
        assert_eq!(
            res.events,
            [GameEvent::EnemyDamaged {
                kind: "enemy_05",
                hits_remaining: armour - 1
            }]
        );
        assert!(!groups.group(GroupId::PlayerShots).members[0].alive);

        // A spent beam deals no further damage
        for tick in 2..10 {
            resolver.resolve(&mut groups, SimTime(tick));
        }
        assert_eq!(groups.group(GroupId::Enemies).members[0].hits_remaining, armour - 1);
    }

    #[test]
    fn test_projectile_hits_only_one_enemy() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let first = target(0);
        groups.insert(bullet_on(&first));
        groups.insert(Spawned::new(GroupId::Enemies, first.clone()));
        groups.insert(Spawned::new(GroupId::Enemies, first));

        let res = resolver.resolve(&mut groups, SimTime(1));
        let alive: Vec<_> = groups.group(GroupId::Enemies).members.iter().map(|e| e.alive).collect();
        assert_eq!(alive, [false, true]);
        assert_eq!(res.points, 100);
    }

    #[test]
    fn test_beam_passes_through_four_enemies() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let beam = at(catalog::laser_beam(Vec2::ZERO, 0.0), Vec2::new(100.0, 106.0));
        groups.insert(Spawned::new(GroupId::PlayerShots, beam));
        for x in [98.0, 104.0, 112.0, 120.0] {
            groups.insert(Spawned::new(GroupId::Enemies, at(target(0), Vec2::new(x, 100.0))));
        }

        let res = resolver.resolve(&mut groups, SimTime(1));
        assert!(groups.group(GroupId::Enemies).members.iter().all(|e| !e.alive));
        assert!(groups.group(GroupId::PlayerShots).members[0].alive);
        assert_eq!(res.points, 400);
        // One explosion per enemy
        assert_eq!(res.spawned.len(), 4);
    }

    #[test]
    fn test_armour_blocks_weak_point_takes_damage() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let boss = at(catalog::boss(Vec2::ZERO), Vec2::new(200.0, 60.0));
        let start_hits = boss.hits_remaining;
        let fin = boss.regions.iter().find(|r| r.name == "upper_fin").map(|r| r.rect.center());
        let core = boss.regions.iter().find(|r| r.name == "core").map(|r| r.rect.center());
        groups.insert(Spawned::new(GroupId::Enemies, boss));

        let shot = catalog::player_bullet(Vec2::ZERO);
        groups.insert(Spawned::new(GroupId::PlayerShots, at(shot.clone(), fin.unwrap_or_default())));
        let res = resolver.resolve(&mut groups, SimTime(1));
        assert_eq!(res.events, [GameEvent::HitBlocked { kind: "boss" }]);
        assert_eq!(groups.group(GroupId::Enemies).members[0].hits_remaining, start_hits);
        assert!(!groups.group(GroupId::PlayerShots).members[0].alive);

        // Armour stops a beam too
        let beam = catalog::laser_beam(Vec2::ZERO, 0.0);
        groups.insert(Spawned::new(
            GroupId::PlayerShots,
            at(beam, fin.unwrap_or_default() - Vec2::new(16.0, 2.0)),
        ));
        let res = resolver.resolve(&mut groups, SimTime(2));
        assert_eq!(res.events, [GameEvent::HitBlocked { kind: "boss" }]);
        assert!(!groups.group(GroupId::PlayerShots).members[1].alive);

        groups.insert(Spawned::new(
            GroupId::PlayerShots,
            at(shot, core.unwrap_or_default() - Vec2::new(4.0, 1.5)),
        ));
        resolver.resolve(&mut groups, SimTime(3));
        assert_eq!(groups.group(GroupId::Enemies).members[0].hits_remaining, start_hits - 1);
    }

    #[test]
    fn test_vulnerable_overlap_wins_over_armour() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        let enemy = target(2)
            .with_region(HitRegion::armor("shell", Vec2::ZERO, Vec2::splat(16.0)));
        groups.insert(bullet_on(&enemy));
        groups.insert(Spawned::new(GroupId::Enemies, enemy));
        let res = resolver.resolve(&mut groups, SimTime(1));
        assert!(matches!(res.events[0], GameEvent::EnemyDamaged { hits_remaining: 1, .. }));
    }

    #[test]
    fn test_invulnerability_window() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = with_player();
        let shot_at = |pos: Vec2| {
            Spawned::new(GroupId::EnemyShots, catalog::enemy_bullet(pos + Vec2::new(4.0, 8.0)))
        };

        groups.insert(shot_at(player_pos(&groups)));
        let res = resolver.resolve(&mut groups, SimTime(60));
        assert_eq!(
            res.events,
            [GameEvent::PlayerDied {
                lives_left: 2,
                game_over: false
            }]
        );

        // Glide finished, but still inside the window
        if let Some(pilot) = groups.player_mut().and_then(Entity::pilot_mut) {
            pilot.respawning = false;
        }
        groups.insert(shot_at(player_pos(&groups)));
        groups.insert(Spawned::new(GroupId::Enemies, at(target(0), player_pos(&groups))));
        for tick in 61..180 {
            let res = resolver.resolve(&mut groups, SimTime(tick));
            assert!(!res.player_died(), "died again at tick {tick}");
        }

        // The window opened by the death at 1000 ms closed at 3000 ms
        let res = resolver.resolve(&mut groups, SimTime(181));
        assert!(res.player_died());
    }

    #[test]
    fn test_body_collision() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = with_player();
        let pos = player_pos(&groups);
        groups.insert(Spawned::new(
            GroupId::Enemies,
            at(target(5).with_drop(Some(PickupKind::Spreader)), pos),
        ));
        groups.insert(Spawned::new(GroupId::PlayerShots, catalog::player_bullet(Vec2::new(250.0, 60.0))));

        let res = resolver.resolve(&mut groups, SimTime(10));
        assert!(res.player_died());
        assert!(res.events.contains(&GameEvent::EnemyDestroyed {
            kind: "target",
            points: 0,
            pickup: Some(PickupKind::Spreader),
        }));
        assert_eq!(res.points, 0);
        assert!(groups.group(GroupId::PlayerShots).members.iter().all(|s| !s.alive));
        assert!(res.spawned.iter().any(|s| s.group == GroupId::Pickups));
    }

    #[test]
    fn test_destroyed_enemy_skipped_by_later_rules() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = with_player();
        let pos = player_pos(&groups);
        let enemy = at(target(0), pos);
        groups.insert(bullet_on(&enemy));
        groups.insert(Spawned::new(GroupId::Enemies, enemy));

        let res = resolver.resolve(&mut groups, SimTime(10));
        // Rammed in rule 1; the shots were cleared and no points awarded
        assert_eq!(res.points, 0);
        let destroyed = res
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_shrapnel_kills_explosion_does_not() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = with_player();
        let center = groups.group(GroupId::Player).members[0].center();
        groups.insert(Spawned::new(GroupId::Effects, catalog::explosion(center)));
        let res = resolver.resolve(&mut groups, SimTime(10));
        assert!(!res.player_died());

        groups.insert(Spawned::new(GroupId::Effects, catalog::shrapnel(center, 0.0)));
        let res = resolver.resolve(&mut groups, SimTime(11));
        assert!(res.player_died());
    }

    #[test]
    fn test_pickup_collected_while_protected() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = with_player();
        if let Some(pilot) = groups.player_mut().and_then(Entity::pilot_mut) {
            pilot.protected_until_ms = 10_000.0;
        }
        let pos = player_pos(&groups);
        groups.insert(Spawned::new(GroupId::Pickups, catalog::pickup(PickupKind::LaserBeam, pos)));

        let res = resolver.resolve(&mut groups, SimTime(10));
        assert_eq!(res.events, [GameEvent::PickupCollected(PickupKind::LaserBeam)]);
        let pilot = groups.player().and_then(Entity::pilot).map(|p| p.weapon.kind);
        assert_eq!(pilot, Some(crate::sim::player::WeaponKind::LaserBeam));
    }

    #[test]
    fn test_last_life_game_over() {
        let resolver = CollisionResolver::new(PROTECTION_MS);
        let mut groups = GroupRegistry::new();
        groups.insert(Spawned::new(
            GroupId::Player,
            catalog::player(PilotRecord {
                lives: 1,
                ..PilotRecord::default()
            }),
        ));
        let pos = player_pos(&groups);
        groups.insert(Spawned::new(GroupId::EnemyShots, catalog::enemy_bullet(pos + Vec2::new(4.0, 8.0))));
        let res = resolver.resolve(&mut groups, SimTime(10));
        assert_eq!(
            res.events,
            [GameEvent::PlayerDied {
                lives_left: 0,
                game_over: true
            }]
        );
        assert!(groups.player().is_none());
    }
}
