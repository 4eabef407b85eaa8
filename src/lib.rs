//! Tanks - simulation core of a top-down arcade tank game
//!
//! Core modules:
//! - `sim`: Gameplay state, spawning, combat and stage progression
//! - `renderer`: Draws a `GameState` onto a display surface
//! - `platform`: Collaborator traits (display, input, level, clock) and headless backends
//! - `game`: Fixed-timestep loop thread with start/stop control
//! - `settings`: Runtime configuration

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LoopError, SettingsError};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena size in pixels
    pub const WIDTH: f32 = 624.0;
    pub const HEIGHT: f32 = 624.0;
    pub const TITLE: &str = "Tanks";

    /// Simulation updates per second
    pub const UPDATE_RATE: f32 = 60.0;
    /// Nanoseconds per simulation update
    pub const UPDATE_INTERVAL_NS: f64 = 1_000_000_000.0 / UPDATE_RATE as f64;

    /// Sprite magnification applied to every entity
    pub const SCALE: f32 = 3.0;
    /// Unscaled sprite edge in the atlas
    pub const SPRITE_SCALE: f32 = 16.0;
    /// Atlas tile edge (sprite offsets are counted in these)
    pub const TILE_SCALE: u32 = 8;
    pub const SCALED_TILE_SIZE: f32 = TILE_SCALE as f32 * SCALE;
    /// On-screen tank edge
    pub const TANK_SIZE: f32 = SPRITE_SCALE * SCALE;

    /// Spawn limits per stage
    pub const MAX_CONCURRENT_ENEMIES: usize = 4;
    pub const SPAWN_BUDGET: u32 = 20;
    /// Stage 1 turns its last N spawns into infantry vehicles
    pub const STAGE_ONE_INFANTRY_TAIL: u32 = 3;
    pub const STAGE_COUNT: u8 = 3;

    /// Status timers (milliseconds of wall-clock time)
    pub const FREEZE_TIME_MS: u64 = 8000;
    pub const WIN_DELAY_MS: u64 = 5000;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_SPARE_LIVES: u32 = 2;
    pub const PLAYER_BASE_STRENGTH: u32 = 1;
    pub const PLAYER_START_X: f32 = 8.0 * SCALED_TILE_SIZE;
    pub const PLAYER_START_Y: f32 = HEIGHT - TANK_SIZE;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 6.0;
    pub const BULLET_SIZE: f32 = 4.0 * SCALE;

    /// Animation lengths (ticks)
    pub const EXPLOSION_TICKS: u32 = 12;
    pub const BULLET_IMPACT_TICKS: u32 = 6;
    pub const EVOLVE_TICKS: u32 = 60;
    pub const ANIMATION_PERIOD_TICKS: u32 = 4;

    /// Enemy AI
    pub const ENEMY_FIRE_COOLDOWN_TICKS: u32 = 45;
    pub const ENEMY_FIRE_ODDS: u32 = 24;
    pub const ENEMY_TURN_ODDS: u32 = 96;
}
