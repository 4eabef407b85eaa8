//! Tank-like actors
//!
//! Player and enemies share one `Tank` type. Enemy variants differ only in
//! their constant `TankSpec` (speed, sprite offset, extra lives).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletRegistry, Owner};
use super::rect::Rect;
use super::state::EntityIds;
use crate::consts::*;
use crate::platform::{Level, SpriteRef, Surface};

/// Spawn-star animation cells (four frames)
const EVOLVE_SPRITE: SpriteRef = SpriteRef::new(16, 6);
/// Explosion animation cells (three frames)
const EXPLOSION_SPRITE: SpriteRef = SpriteRef::new(16, 8);
const EXPLOSION_FRAMES: u32 = 3;

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step in screen space (y grows downward)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::North => Vec2::new(0.0, -1.0),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::South => Vec2::new(0.0, 1.0),
            Direction::West => Vec2::new(-1.0, 0.0),
        }
    }

    /// First sprite column for this facing; each facing has two track frames
    pub fn sprite_column(self) -> u32 {
        match self {
            Direction::North => 0,
            Direction::West => 2,
            Direction::South => 4,
            Direction::East => 6,
        }
    }
}

/// Constant attributes of a tank type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSpec {
    pub speed: f32,
    /// Atlas cell of the north-facing first frame
    pub sprite: SpriteRef,
    /// Hits survived before the final one
    pub extra_lives: u32,
}

pub const PLAYER_SPEC: TankSpec = TankSpec {
    speed: PLAYER_SPEED,
    sprite: SpriteRef::new(0, 0),
    extra_lives: 0,
};

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Tank,
    GreenTank,
    InfantryVehicle,
}

impl EnemyKind {
    pub const fn spec(self) -> TankSpec {
        match self {
            EnemyKind::Tank => TankSpec {
                speed: 1.8,
                sprite: SpriteRef::new(8, 0),
                extra_lives: 0,
            },
            EnemyKind::GreenTank => TankSpec {
                speed: 1.5,
                sprite: SpriteRef::new(8, 8),
                extra_lives: 3,
            },
            EnemyKind::InfantryVehicle => TankSpec {
                speed: 2.4,
                sprite: SpriteRef::new(0, 8),
                extra_lives: 1,
            },
        }
    }
}

/// Who drives a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    Player,
    Enemy(EnemyKind),
}

/// A tank: position, facing, remaining hit points and animation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: u32,
    pub kind: TankKind,
    /// Top-left corner in arena pixels
    pub pos: Vec2,
    pub facing: Direction,
    pub scale: f32,
    spec: TankSpec,
    hit_points: u32,
    alive: bool,
    /// Ticks of spawn animation left; the tank is inert meanwhile
    evolve_ticks: u32,
    /// Explosion ticks left once dead
    explosion_ticks: u32,
    anim_tick: u32,
    /// Id of the last bullet this tank fired
    bullet: Option<u32>,
    fire_cooldown: u32,
}

impl Tank {
    pub fn new(id: u32, kind: TankKind, spec: TankSpec, pos: Vec2, scale: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            facing: Direction::North,
            scale,
            spec,
            hit_points: spec.extra_lives + 1,
            alive: true,
            evolve_ticks: 0,
            explosion_ticks: 0,
            anim_tick: 0,
            bullet: None,
            fire_cooldown: 0,
        }
    }

    /// A freshly spawned enemy, facing south and playing its spawn animation
    pub fn enemy(id: u32, kind: EnemyKind, pos: Vec2, scale: f32) -> Self {
        let mut tank = Self::new(id, TankKind::Enemy(kind), kind.spec(), pos, scale);
        tank.facing = Direction::South;
        tank.evolve_ticks = EVOLVE_TICKS;
        tank
    }

    pub fn spec(&self) -> &TankSpec {
        &self.spec
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        match self.kind {
            TankKind::Enemy(kind) => Some(kind),
            TankKind::Player => None,
        }
    }

    pub fn size(&self) -> f32 {
        SPRITE_SCALE * self.scale
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size())
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_evolving(&self) -> bool {
        self.evolve_ticks > 0
    }

    /// Force the spawn animation state (the level layer may re-trigger it)
    pub fn set_evolving(&mut self, ticks: u32) {
        self.evolve_ticks = ticks;
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn has_more_lives(&self) -> bool {
        self.hit_points > 0
    }

    /// Apply `damage` hits; a tank with no hit points left dies
    pub fn fix_hitting(&mut self, damage: u32) {
        self.hit_points = self.hit_points.saturating_sub(damage);
        if self.hit_points == 0 {
            self.set_dead();
        }
    }

    /// Kill the tank and start its explosion. Idempotent.
    pub fn set_dead(&mut self) {
        if self.alive {
            self.alive = false;
            self.explosion_ticks = EXPLOSION_TICKS;
        }
    }

    pub fn advance_explosion(&mut self) {
        if !self.alive {
            self.explosion_ticks = self.explosion_ticks.saturating_sub(1);
        }
    }

    pub fn explosion_finished(&self) -> bool {
        !self.alive && self.explosion_ticks == 0
    }

    /// Face `dir` and advance by `speed`, staying inside the arena and off
    /// solid tiles. Returns false when the move was cut short.
    pub fn step(&mut self, dir: Direction, level: &dyn Level) -> bool {
        self.facing = dir;
        let size = self.size();
        let wanted = self.pos + dir.vector() * self.spec.speed;
        let clamped = wanted.clamp(Vec2::ZERO, Vec2::new(WIDTH - size, HEIGHT - size));
        if level.is_blocked(&Rect::square(clamped, size)) {
            return false;
        }
        self.pos = clamped;
        self.anim_tick = self.anim_tick.wrapping_add(1);
        clamped == wanted
    }

    /// Top-left corner for a bullet leaving the middle of the front edge
    fn muzzle(&self) -> Vec2 {
        let half = self.size() / 2.0;
        let center = self.pos + Vec2::splat(half);
        center + self.facing.vector() * half - Vec2::splat(BULLET_SIZE / 2.0)
    }

    /// Fire a bullet unless this tank's previous one is still in flight
    pub fn fire(
        &mut self,
        bullet_id: u32,
        owner: Owner,
        strength: u32,
        bullets: &BulletRegistry,
    ) -> Option<Bullet> {
        if !self.alive || self.is_evolving() {
            return None;
        }
        if self.bullet.is_some_and(|id| bullets.is_live(owner, id)) {
            return None;
        }
        self.bullet = Some(bullet_id);
        Some(Bullet::new(
            bullet_id,
            owner,
            self.id,
            self.muzzle(),
            self.facing,
            strength,
        ))
    }

    /// Forget the in-flight bullet (used when bullet lists are cleared)
    pub fn forget_bullet(&mut self) {
        self.bullet = None;
    }

    /// Enemy AI: spawn animation, patrol, turn when blocked, fire at random
    pub(crate) fn update_enemy(
        &mut self,
        target: Option<Vec2>,
        level: &dyn Level,
        rng: &mut Pcg32,
        bullets: &mut BulletRegistry,
        ids: &mut EntityIds,
    ) {
        if !self.alive {
            return;
        }
        if self.evolve_ticks > 0 {
            self.evolve_ticks -= 1;
            self.anim_tick = self.anim_tick.wrapping_add(1);
            return;
        }

        let wants_turn = rng.random_ratio(1, ENEMY_TURN_ODDS);
        let moved = self.step(self.facing, level);
        if !moved || wants_turn {
            self.facing = self.choose_direction(target, rng);
        }

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if self.fire_cooldown == 0 && rng.random_ratio(1, ENEMY_FIRE_ODDS) {
            if let Some(bullet) = self.fire(ids.next(), Owner::Enemy, 1, bullets) {
                bullets.register(Owner::Enemy, bullet);
                self.fire_cooldown = ENEMY_FIRE_COOLDOWN_TICKS;
            }
        }
    }

    /// Half the time close in on the target along the longer axis
    fn choose_direction(&self, target: Option<Vec2>, rng: &mut Pcg32) -> Direction {
        if let Some(target) = target {
            if rng.random_bool(0.5) {
                let d = target - self.pos;
                return if d.x.abs() > d.y.abs() {
                    if d.x > 0.0 { Direction::East } else { Direction::West }
                } else if d.y > 0.0 {
                    Direction::South
                } else {
                    Direction::North
                };
            }
        }
        Direction::ALL[rng.random_range(0..Direction::ALL.len())]
    }

    /// Current animation cell
    pub fn sprite(&self) -> SpriteRef {
        if self.is_evolving() {
            let frame = (self.anim_tick / ANIMATION_PERIOD_TICKS) % 4;
            return EVOLVE_SPRITE.offset(frame, 0);
        }
        let frame = (self.anim_tick / ANIMATION_PERIOD_TICKS) % 2;
        self.spec
            .sprite
            .offset(self.facing.sprite_column() + frame, 0)
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.draw_sprite(self.sprite(), self.pos, self.size());
    }

    /// Draw the current explosion frame; the owner removes the tank once
    /// [`Tank::explosion_finished`] holds
    pub fn draw_explosion(&self, surface: &mut dyn Surface) {
        let elapsed = EXPLOSION_TICKS - self.explosion_ticks.min(EXPLOSION_TICKS);
        let frame = (elapsed * EXPLOSION_FRAMES / EXPLOSION_TICKS).min(EXPLOSION_FRAMES - 1);
        surface.draw_sprite(EXPLOSION_SPRITE.offset(frame, 0), self.pos, self.size());
    }
}
