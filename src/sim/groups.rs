//! Entity groups with independent update and draw orders
//!
//! Membership is snapshotted once at the start of a pass: entities created
//! during the pass are inserted immediately (so collision sees them this tick)
//! but are not updated until the next tick, whichever group they land in.
//! Dead entities are swept only after every group has been updated.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Spawned, TickContext};
use super::rect::Rect;
use crate::error::ConfigError;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    Player,
    Enemies,
    PlayerShots,
    EnemyShots,
    Pickups,
    Effects,
}

impl GroupId {
    pub const ALL: [GroupId; 6] = [
        GroupId::Player,
        GroupId::Enemies,
        GroupId::PlayerShots,
        GroupId::EnemyShots,
        GroupId::Pickups,
        GroupId::Effects,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

pub const DEFAULT_UPDATE_ORDER: [GroupId; 6] = [
    GroupId::Player,
    GroupId::PlayerShots,
    GroupId::Enemies,
    GroupId::EnemyShots,
    GroupId::Pickups,
    GroupId::Effects,
];

/// Player shots render beneath the ship, enemy shots beneath enemies
pub const DEFAULT_DRAW_ORDER: [GroupId; 6] = [
    GroupId::PlayerShots,
    GroupId::Player,
    GroupId::EnemyShots,
    GroupId::Enemies,
    GroupId::Pickups,
    GroupId::Effects,
];

#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    pub members: Vec<Entity>,
}

impl Group {
    fn new(id: GroupId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Entity> {
        self.members.iter().filter(|e| e.alive)
    }

    /// Drop dead members; returns how many were removed
    fn sweep(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(|e| e.alive);
        before - self.members.len()
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for entity in &self.members {
            entity.draw(surface);
        }
    }
}

fn is_permutation(order: &[GroupId]) -> bool {
    order.len() == GroupId::ALL.len() && GroupId::ALL.iter().all(|id| order.contains(id))
}

#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    update_order: Vec<GroupId>,
    draw_order: Vec<GroupId>,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: GroupId::ALL.iter().map(|&id| Group::new(id)).collect(),
            update_order: DEFAULT_UPDATE_ORDER.to_vec(),
            draw_order: DEFAULT_DRAW_ORDER.to_vec(),
        }
    }

    /// Both orders must name every group exactly once
    pub fn with_orders(update_order: &[GroupId], draw_order: &[GroupId]) -> Result<Self, ConfigError> {
        for order in [update_order, draw_order] {
            if !is_permutation(order) {
                return Err(ConfigError::InvalidGroupOrder(order.to_vec()));
            }
        }
        Ok(Self {
            update_order: update_order.to_vec(),
            draw_order: draw_order.to_vec(),
            ..Self::new()
        })
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.index()]
    }

    /// Mutable access to two different groups at once.
    ///
    /// # Panics
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: GroupId, b: GroupId) -> (&mut Group, &mut Group) {
        assert_ne!(a, b, "pair_mut needs two distinct groups");
        let (ia, ib) = (a.index(), b.index());
        if ia < ib {
            let (lo, hi) = self.groups.split_at_mut(ib);
            (&mut lo[ia], &mut hi[0])
        } else {
            let (lo, hi) = self.groups.split_at_mut(ia);
            (&mut hi[0], &mut lo[ib])
        }
    }

    pub fn insert(&mut self, spawned: Spawned) {
        self.groups[spawned.group.index()].members.push(spawned.entity);
    }

    pub fn insert_all(&mut self, spawned: impl IntoIterator<Item = Spawned>) {
        for s in spawned {
            self.insert(s);
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.group(GroupId::Player).alive().next()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.group_mut(GroupId::Player).members.iter_mut().find(|e| e.alive)
    }

    fn player_rect(&self) -> Option<Rect> {
        self.player().map(Entity::rect)
    }

    /// Live entity count across all groups
    pub fn population(&self) -> usize {
        self.groups.iter().map(|g| g.alive().count()).sum()
    }

    /// Update every group in update order, then remove the dead
    pub fn update(&mut self, ctx: &TickContext) {
        // Members added during this pass wait for the next tick, whichever
        // group they land in
        let snapshot: Vec<usize> = self.groups.iter().map(Group::len).collect();
        for i in 0..self.update_order.len() {
            let id = self.update_order[i];
            let ctx = TickContext {
                player: self.player_rect(),
                ..*ctx
            };
            for m in 0..snapshot[id.index()] {
                let spawned = self.groups[id.index()].members[m].update(&ctx);
                self.insert_all(spawned);
            }
        }

        for group in &mut self.groups {
            let removed = group.sweep();
            if removed > 0 {
                log::debug!("Removed {removed} from {:?}", group.id);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for &id in &self.draw_order {
            self.group(id).draw(surface);
        }
    }
}
