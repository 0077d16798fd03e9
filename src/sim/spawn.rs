//! Scrolling viewport and the scroll-triggered spawn queue

use super::clock::SimTime;
use super::entity::{Entity, Spawned};
use super::groups::GroupId;
use super::rect::Rect;
use crate::consts::TICK_RATE;

/// Camera over the level. The scroll position only grows while a state is active.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Scroll speed in pixels per second
    pub velocity: f32,
    /// Ticks scrolled since activation
    ticks: u64,
    /// Scrolling stops when false (boss fights, level end)
    pub auto_scroll: bool,
}

impl Viewport {
    pub fn new(width: f32, height: f32, velocity: f32) -> Self {
        Self {
            width,
            height,
            velocity,
            ticks: 0,
            auto_scroll: true,
        }
    }

    /// Scroll by one fixed step
    pub fn advance(&mut self) {
        if self.auto_scroll {
            self.ticks += 1;
        }
    }

    /// Left edge of the view in level coordinates.
    ///
    /// Derived from the tick count rather than accumulated, so positions on
    /// tick boundaries are exact.
    pub fn position(&self) -> f64 {
        self.velocity as f64 * self.ticks as f64 / TICK_RATE as f64
    }

    pub fn right_edge(&self) -> f64 {
        self.position() + self.width as f64
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

/// An inactive entity waiting for its trigger
#[derive(Debug, Clone)]
pub struct Pending {
    pub entity: Entity,
    /// Level x at which the entity activates
    pub trigger_x: f64,
    pub group: GroupId,
}

/// Entities queued by the level loader, released as the view scrolls
#[derive(Debug, Clone, Default)]
pub struct SpawnQueue {
    pending: Vec<Pending>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity, trigger_x: f64, group: GroupId) {
        self.pending.push(Pending {
            entity,
            trigger_x,
            group,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Activate every entity whose trigger the view's right edge has reached.
    ///
    /// Released entities keep queue order.
    pub fn release(&mut self, viewport: &Viewport, playfield: &Rect, now: SimTime) -> Vec<Spawned> {
        let edge = viewport.right_edge();
        if !self.pending.iter().any(|p| edge >= p.trigger_x) {
            return Vec::new();
        }

        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| edge >= p.trigger_x);
        self.pending = waiting;

        ready
            .into_iter()
            .map(|Pending { mut entity, group, trigger_x }| {
                entity.spawn(playfield, now);
                log::debug!(
                    "Spawned {} at tick {} (trigger {trigger_x}, edge {edge})",
                    entity.kind,
                    now.ticks()
                );
                Spawned::new(group, entity)
            })
            .collect()
    }
}
