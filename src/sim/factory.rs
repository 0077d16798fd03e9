//! Level records and entity factories
//!
//! Level data names entity types by string. Each type maps to a factory
//! callback registered here; new enemies are added by registering a factory,
//! never by touching the core.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog;
use super::entity::{Entity, Role};
use super::groups::GroupId;
use super::spawn::SpawnQueue;
use crate::consts::LEVEL_LENGTH;
use crate::error::ConfigError;

fn default_length() -> f64 {
    LEVEL_LENGTH
}

/// One entity placement from a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    #[serde(rename = "type")]
    pub kind: String,
    /// Level x; also the spawn trigger
    pub x: i32,
    pub y: i32,
    /// Force the entity to drop its pickup
    #[serde(default)]
    pub drops_pickup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Scroll position at which the level is complete
    #[serde(default = "default_length")]
    pub length: f64,
    pub records: Vec<LevelRecord>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::InvalidLevel)
    }
}

pub type Factory = Box<dyn Fn(Vec2) -> Entity>;

#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Factory>,
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("FactoryRegistry").field("kinds", &kinds).finish()
    }
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every catalog entity type
    pub fn standard() -> Self {
        let mut registry = Self::new();
        catalog::register_standard(&mut registry);
        registry
    }

    /// Register (or replace) the factory for `kind`
    pub fn register(&mut self, kind: impl Into<String>, factory: impl Fn(Vec2) -> Entity + 'static) {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Build the inactive entity for one record, validating what the factory produced
    pub fn build(&self, index: usize, record: &LevelRecord) -> Result<Entity, ConfigError> {
        let factory = self
            .factories
            .get(&record.kind)
            .ok_or_else(|| ConfigError::UnknownEntityType {
                index,
                kind: record.kind.clone(),
            })?;
        let entity = factory(Vec2::new(record.x as f32, record.y as f32));

        if let Some(region) = entity.regions.iter().find(|r| !r.is_well_formed()) {
            return Err(ConfigError::MalformedHitRegion {
                index,
                kind: record.kind.clone(),
                region: region.name,
            });
        }
        if matches!(entity.role, Role::Player(_)) {
            return Err(ConfigError::UnspawnableGroup {
                index,
                kind: record.kind.clone(),
                group: GroupId::Player,
            });
        }
        Ok(entity)
    }

    /// Build a spawn queue for a whole level.
    ///
    /// Every record is built before the queue is returned; the first bad record
    /// fails the whole load. `roll` decides whether an entity without a forced
    /// drop keeps its pickup.
    pub fn load(&self, level: &Level, mut roll: impl FnMut() -> bool) -> Result<SpawnQueue, ConfigError> {
        let mut queue = SpawnQueue::new();
        for (index, record) in level.records.iter().enumerate() {
            let mut entity = self.build(index, record)?;
            if entity.drop.is_some() && !record.drops_pickup && !roll() {
                entity.drop = None;
            }
            let group = entity.role.home_group();
            queue.push(entity, record.x as f64, group);
        }
        log::info!("Loaded level '{}': {} entities queued", level.name, queue.len());
        Ok(queue)
    }
}
