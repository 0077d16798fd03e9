//! Gameplay settings
//!
//! Data-driven tuning for the simulation. Every field has a default, so a
//! settings file only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::consts::{
    HUD_HEIGHT, INVULNERABILITY_MS, MESSAGE_MS, PLAYER_LIVES, SCREEN_HEIGHT, SCREEN_WIDTH,
    SCROLL_VELOCITY,
};
use crate::error::ConfigError;
use crate::sim::{
    CollisionResolver, DEFAULT_DRAW_ORDER, DEFAULT_UPDATE_ORDER, GroupId, GroupRegistry, Rect, Viewport,
};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Ships at the start of a campaign
    pub fn starting_lives(&self) -> u8 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => PLAYER_LIVES,
            Difficulty::Hard => 1,
        }
    }

    /// Chance that an enemy without a forced drop still releases its pickup
    pub fn pickup_drop_chance(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.25,
            Difficulty::Normal => 0.0,
            Difficulty::Hard => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Scrolling ===
    /// Scroll speed in pixels per second
    pub scroll_velocity: f32,
    /// Logical screen size; the playfield is the area below the HUD
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Player ===
    pub starting_lives: u8,
    /// Protection after a death, in milliseconds of simulated time
    pub invulnerability_ms: f64,

    // === Pickups ===
    pub pickup_drop_chance: f32,
    /// RNG seed for drop rolls
    pub seed: u64,

    // === Timing ===
    /// Cap on ticks simulated per frame after a stall; `None` runs them all
    pub max_ticks_per_frame: Option<u32>,
    /// Display time of level complete / game over messages
    pub message_ms: f64,

    // === Groups ===
    pub update_order: Vec<GroupId>,
    pub draw_order: Vec<GroupId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            scroll_velocity: SCROLL_VELOCITY,
            viewport_width: SCREEN_WIDTH,
            viewport_height: SCREEN_HEIGHT,

            starting_lives: PLAYER_LIVES,
            invulnerability_ms: INVULNERABILITY_MS,

            pickup_drop_chance: 0.0,
            seed: 0x5eed,

            max_ticks_per_frame: Some(8),
            message_ms: MESSAGE_MS,

            update_order: DEFAULT_UPDATE_ORDER.to_vec(),
            draw_order: DEFAULT_DRAW_ORDER.to_vec(),
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.starting_lives = preset.starting_lives();
        self.pickup_drop_chance = preset.pickup_drop_chance();
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json).map_err(ConfigError::InvalidSettings)?;
        // Fail on bad orders here rather than when the first level starts
        settings.group_registry()?;
        Ok(settings)
    }

    /// Area entities live in, below the HUD strip
    pub fn playfield(&self) -> Rect {
        Rect::new(0.0, HUD_HEIGHT, self.viewport_width, self.viewport_height - HUD_HEIGHT)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height, self.scroll_velocity)
    }

    pub fn group_registry(&self) -> Result<GroupRegistry, ConfigError> {
        GroupRegistry::with_orders(&self.update_order, &self.draw_order)
    }

    pub fn resolver(&self) -> CollisionResolver {
        CollisionResolver::new(self.invulnerability_ms)
    }
}
