//! Headless collaborators
//!
//! Used by the native binary and the tests: a display that only counts what
//! it was asked to draw, scripted input, a manual clock and an open-field
//! level with optional walls and base.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec2;

use super::{BulletImpact, Clock, Display, InputSource, Level, LevelFactory, SpriteRef, Surface};
use crate::sim::{Rect, TickInput};

const WALL_SPRITE: SpriteRef = SpriteRef::new(16, 0);

/// Counters shared between a [`HeadlessDisplay`] and whoever inspects it
#[derive(Debug, Default)]
pub struct DisplayStats {
    pub frames: AtomicU64,
    pub sprites: AtomicU64,
    pub game_over_draws: AtomicU64,
    title: Mutex<String>,
}

impl DisplayStats {
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn sprites(&self) -> u64 {
        self.sprites.load(Ordering::Relaxed)
    }

    pub fn game_over_draws(&self) -> u64 {
        self.game_over_draws.load(Ordering::Relaxed)
    }

    pub fn title(&self) -> String {
        self.title
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Display that draws nowhere
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    stats: Arc<DisplayStats>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<DisplayStats> {
        Arc::clone(&self.stats)
    }
}

impl Surface for HeadlessDisplay {
    fn draw_sprite(&mut self, _sprite: SpriteRef, _pos: Vec2, _size: f32) {
        self.stats.sprites.fetch_add(1, Ordering::Relaxed);
    }

    fn draw_game_over(&mut self, _pos: Vec2) {
        self.stats.game_over_draws.fetch_add(1, Ordering::Relaxed);
    }
}

impl Display for HeadlessDisplay {
    fn clear(&mut self) {}

    fn swap_buffers(&mut self) {
        self.stats.frames.fetch_add(1, Ordering::Relaxed);
    }

    fn set_title(&mut self, title: &str) {
        log::debug!("{title}");
        *self
            .stats
            .title
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = title.to_string();
    }

    fn as_surface(&mut self) -> &mut dyn Surface {
        self
    }
}

/// Replays a fixed sequence of inputs, looping at the end
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<TickInput>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(script: Vec<TickInput>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl InputSource for ScriptedInput {
    fn snapshot(&mut self) -> TickInput {
        if self.script.is_empty() {
            return TickInput::default();
        }
        let input = self.script[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.script.len();
        input
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}

/// An arena with optional indestructible walls and a base
#[derive(Debug, Clone, Default)]
pub struct OpenField {
    pub stage: u8,
    walls: Vec<Rect>,
    base: Option<Rect>,
}

impl OpenField {
    pub fn with_walls(mut self, walls: Vec<Rect>) -> Self {
        self.walls = walls;
        self
    }

    pub fn with_base(mut self, base: Rect) -> Self {
        self.base = Some(base);
        self
    }
}

impl Level for OpenField {
    fn render(&self, surface: &mut dyn Surface) {
        for wall in &self.walls {
            surface.draw_sprite(WALL_SPRITE, Vec2::new(wall.x, wall.y), wall.w.max(wall.h));
        }
    }

    fn render_grass(&self, _surface: &mut dyn Surface) {}

    fn is_blocked(&self, rect: &Rect) -> bool {
        self.walls.iter().chain(self.base.iter()).any(|r| r.intersects(rect))
    }

    fn bullet_impact(&mut self, rect: &Rect, _strength: u32) -> BulletImpact {
        if self.base.is_some_and(|base| base.intersects(rect)) {
            BulletImpact::BaseDestroyed
        } else if self.walls.iter().any(|w| w.intersects(rect)) {
            BulletImpact::Stopped
        } else {
            BulletImpact::Passed
        }
    }
}

/// Builds the same open field for every stage
#[derive(Debug, Clone, Default)]
pub struct OpenFieldFactory {
    walls: Vec<Rect>,
    base: Option<Rect>,
}

impl OpenFieldFactory {
    pub fn new(walls: Vec<Rect>, base: Option<Rect>) -> Self {
        Self { walls, base }
    }
}

impl LevelFactory for OpenFieldFactory {
    fn build(&self, stage: u8) -> Box<dyn Level> {
        Box::new(OpenField {
            stage,
            walls: self.walls.clone(),
            base: self.base,
        })
    }
}
