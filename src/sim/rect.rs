//! Axis-aligned rectangles and hit-regions
//!
//! A hit-region is a rectangle with a fixed offset from its owning entity's
//! position. Its world rect is recomputed from that position after every
//! movement step, so collision always sees the current geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in playfield space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap,
    /// and a zero-sized rectangle never overlaps anything.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
            && self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
    }
}

/// A named collision box attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub name: &'static str,
    /// Offset from the owning entity's position
    pub offset: Vec2,
    pub size: Vec2,
    /// Hits on a non-vulnerable region are blocked and deal no damage
    pub vulnerable: bool,
    /// World-space rect, valid after the owner's last `sync`
    pub rect: Rect,
}

impl HitRegion {
    pub fn new(name: &'static str, offset: Vec2, size: Vec2) -> Self {
        Self {
            name,
            offset,
            size,
            vulnerable: true,
            rect: Rect::new(offset.x, offset.y, size.x, size.y),
        }
    }

    /// An armoured region: overlaps register as blocked hits
    pub fn armor(name: &'static str, offset: Vec2, size: Vec2) -> Self {
        Self {
            vulnerable: false,
            ..Self::new(name, offset, size)
        }
    }

    /// Recompute the world rect from the owner's position
    #[inline]
    pub fn sync(&mut self, owner_pos: Vec2) {
        self.rect = Rect::from_pos_size(owner_pos + self.offset, self.size);
    }

    /// Zero or negative extents are a factory defect
    pub fn is_well_formed(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0 && self.size.is_finite() && self.offset.is_finite()
    }
}

/// Which region of a target a strike landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    Miss,
    /// Only armoured regions were touched
    Blocked,
    /// At least one vulnerable region was touched
    Vulnerable,
}

/// Test every region of `target` against every region of `attacker`.
///
/// All target regions are checked before concluding; a vulnerable overlap
/// wins over an armoured one.
pub fn strike(attacker: &[HitRegion], target: &[HitRegion]) -> Strike {
    let mut result = Strike::Miss;
    for region in target {
        if attacker.iter().any(|a| a.rect.overlaps(&region.rect)) {
            if region.vulnerable {
                return Strike::Vulnerable;
            }
            result = Strike::Blocked;
        }
    }
    result
}

/// True if any pair of regions overlaps, regardless of vulnerability
pub fn touching(a: &[HitRegion], b: &[HitRegion]) -> bool {
    strike(a, b) != Strike::Miss
}
