//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (speeds and timers are scaled by the tick, never by frame time)
//! - Seeded RNG only
//! - Stable iteration order (insertion order within groups and the spawn queue)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod catalog;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod factory;
pub mod groups;
pub mod player;
pub mod rect;
pub mod spawn;

pub use behavior::{Fire, Movement, Vertical};
pub use clock::{Clock, SimTime};
pub use collision::{CollisionResolver, GameEvent, Resolution};
pub use entity::{Debris, Entity, Exit, Placement, Role, Spawned, TickContext};
pub use factory::{FactoryRegistry, Level, LevelRecord};
pub use groups::{DEFAULT_DRAW_ORDER, DEFAULT_UPDATE_ORDER, Group, GroupId, GroupRegistry};
pub use player::{PickupKind, Pilot, PilotRecord, WeaponKind};
pub use rect::{HitRegion, Rect, Strike};
pub use spawn::{SpawnQueue, Viewport};
