//! Platform abstraction layer
//!
//! The simulation talks to the outside world only through these traits:
//! - Drawing surface and frame presentation
//! - Per-tick input snapshots
//! - Level geometry and tile rendering
//! - Wall-clock time

pub mod headless;

use std::time::Instant;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Rect, TickInput};

pub use headless::{DisplayStats, HeadlessDisplay, ManualClock, OpenField, OpenFieldFactory, ScriptedInput};

/// A sprite region in the texture atlas, addressed in 16px sprite cells.
///
/// The atlas itself is decoded by the platform; the simulation only names
/// regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteRef {
    pub col: u32,
    pub row: u32,
}

impl SpriteRef {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub const fn offset(self, cols: u32, rows: u32) -> Self {
        Self {
            col: self.col + cols,
            row: self.row + rows,
        }
    }
}

/// Something entities can be drawn onto
pub trait Surface {
    /// Draw an atlas region with its top-left corner at `pos`, scaled to `size` pixels
    fn draw_sprite(&mut self, sprite: SpriteRef, pos: Vec2, size: f32);

    /// Draw the fixed game-over image
    fn draw_game_over(&mut self, pos: Vec2);
}

/// The window the loop presents frames to
pub trait Display: Surface + Send {
    fn clear(&mut self);

    fn swap_buffers(&mut self);

    fn set_title(&mut self, title: &str);

    /// Upcast for APIs that only draw
    fn as_surface(&mut self) -> &mut dyn Surface;
}

/// Source of per-tick input snapshots
pub trait InputSource: Send {
    fn snapshot(&mut self) -> TickInput;
}

/// What happened when a bullet touched the level geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletImpact {
    /// Nothing solid under the bullet
    Passed,
    /// A wall absorbed the bullet (and may have been damaged)
    Stopped,
    /// The base was hit; the game is lost
    BaseDestroyed,
}

/// A stage layout: tile geometry plus two-phase rendering
pub trait Level: Send {
    /// Draw tiles that sit below entities
    fn render(&self, surface: &mut dyn Surface);

    /// Draw the foreground overlay (grass) above entities
    fn render_grass(&self, surface: &mut dyn Surface);

    /// Whether a tank occupying `rect` would overlap solid tiles
    fn is_blocked(&self, rect: &Rect) -> bool;

    /// Resolve a bullet at `rect` against the tiles
    fn bullet_impact(&mut self, rect: &Rect, strength: u32) -> BulletImpact;
}

/// Builds the level for a stage number (1..=3)
pub trait LevelFactory: Send + Sync {
    fn build(&self, stage: u8) -> Box<dyn Level>;
}

/// Millisecond clock shared by the loop and UI-side calls
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}
