//! Protostriker - runtime core of a side-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, entities, spawning, groups, collisions)
//! - `state`: Game modes and the state stack (title, gameplay, pause, scripted events)
//! - `game`: Frame driver tying the clock to the state stack
//! - `input` / `surface`: Abstract collaborators consumed by the core
//! - `settings`: Data-driven tuning

pub mod error;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;
pub mod state;
pub mod surface;

pub use error::ConfigError;
pub use game::{Campaign, Game};
pub use input::{Button, InputQuery, InputSnapshot};
pub use settings::Settings;
pub use surface::{SpriteId, Surface};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Logical screen size
    pub const SCREEN_WIDTH: f32 = 320.0;
    pub const SCREEN_HEIGHT: f32 = 240.0;
    /// HUD strip at the top of the screen; the playfield starts below it
    pub const HUD_HEIGHT: f32 = 32.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 90.0;
    pub const PLAYER_MAX_SPEED: f32 = 150.0;
    pub const PLAYER_SPEED_STEP: f32 = 20.0;
    pub const PLAYER_START: (f32, f32) = (16.0, 112.0);
    /// Respawn glide ends once the ship reaches this x
    pub const PLAYER_RESPAWN_X: f32 = 16.0;
    pub const PLAYER_LIVES: u8 = 3;
    /// Protection window after a death, in milliseconds of simulated time
    pub const INVULNERABILITY_MS: f64 = 2000.0;

    /// Scrolling defaults
    pub const SCROLL_VELOCITY: f32 = 100.0;
    pub const LEVEL_LENGTH: f64 = 10_400.0;

    /// Scripted event (level complete / game over) display time
    pub const MESSAGE_MS: f64 = 4000.0;
}

/// Milliseconds represented by a number of fixed ticks
#[inline]
pub fn ticks_to_millis(ticks: u64) -> f64 {
    ticks as f64 * 1000.0 / consts::TICK_RATE as f64
}

/// Unit vector for an angle in degrees, screen space (y grows downward)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), -radians.sin())
}

/// Truncate a fractional position to the integer display grid
#[inline]
pub fn to_display(pos: Vec2) -> (i32, i32) {
    (pos.x as i32, pos.y as i32)
}
