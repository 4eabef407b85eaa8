//! Projectiles and the per-owner bullet lists

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Direction;
use super::rect::Rect;
use crate::consts::*;
use crate::platform::{BulletImpact, Level, SpriteRef, Surface};

const BULLET_SPRITE: SpriteRef = SpriteRef::new(20, 6);
const IMPACT_SPRITE: SpriteRef = SpriteRef::new(16, 8);

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A moving projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub owner: Owner,
    /// Id of the tank that fired it
    pub shooter: u32,
    /// Top-left corner in arena pixels
    pub pos: Vec2,
    pub dir: Direction,
    /// Damage dealt on hit
    pub strength: u32,
    active: bool,
    /// Impact animation ticks left once inactive
    impact_ticks: u32,
}

impl Bullet {
    pub fn new(id: u32, owner: Owner, shooter: u32, pos: Vec2, dir: Direction, strength: u32) -> Self {
        Self {
            id,
            owner,
            shooter,
            pos,
            dir,
            strength,
            active: true,
            impact_ticks: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, BULLET_SIZE)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop the bullet and start its impact animation. Idempotent.
    pub fn set_inactive(&mut self) {
        if self.active {
            self.active = false;
            self.impact_ticks = BULLET_IMPACT_TICKS;
        }
    }

    /// Inactive and done animating; safe to drop from its list
    pub fn is_spent(&self) -> bool {
        !self.active && self.impact_ticks == 0
    }

    /// Advance one tick: fly, leave the arena, or hit level geometry
    pub fn update(&mut self, level: &mut dyn Level) -> BulletImpact {
        if !self.active {
            self.impact_ticks = self.impact_ticks.saturating_sub(1);
            return BulletImpact::Passed;
        }

        self.pos += self.dir.vector() * BULLET_SPEED;
        let rect = self.rect();
        if !rect.within(WIDTH, HEIGHT) {
            self.set_inactive();
            return BulletImpact::Stopped;
        }

        let impact = level.bullet_impact(&rect, self.strength);
        if impact != BulletImpact::Passed {
            self.set_inactive();
        }
        impact
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let sprite = if self.active {
            BULLET_SPRITE
        } else {
            IMPACT_SPRITE
        };
        surface.draw_sprite(sprite, self.pos, BULLET_SIZE);
    }
}

/// Live bullets, one ordered list per owner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulletRegistry {
    player: Vec<Bullet>,
    enemy: Vec<Bullet>,
}

impl BulletRegistry {
    pub fn get(&self, owner: Owner) -> &[Bullet] {
        match owner {
            Owner::Player => &self.player,
            Owner::Enemy => &self.enemy,
        }
    }

    pub fn get_mut(&mut self, owner: Owner) -> &mut Vec<Bullet> {
        match owner {
            Owner::Player => &mut self.player,
            Owner::Enemy => &mut self.enemy,
        }
    }

    /// Append a bullet; a bullet with the same id is not added twice
    pub fn register(&mut self, owner: Owner, bullet: Bullet) {
        let list = self.get_mut(owner);
        if list.iter().all(|b| b.id != bullet.id) {
            list.push(bullet);
        }
    }

    /// Remove a bullet by id; no-op when the list is empty or the id unknown
    pub fn unregister(&mut self, owner: Owner, id: u32) {
        let list = self.get_mut(owner);
        if let Some(index) = list.iter().position(|b| b.id == id) {
            list.remove(index);
        }
    }

    /// Bullet `id` is still registered and flying
    pub fn is_live(&self, owner: Owner, id: u32) -> bool {
        self.get(owner).iter().any(|b| b.id == id && b.active)
    }

    /// Update one owner's bullets in order, then drop the spent ones.
    /// Returns true if any bullet destroyed the base.
    pub fn update(&mut self, owner: Owner, level: &mut dyn Level) -> bool {
        let list = self.get_mut(owner);
        let mut base_destroyed = false;
        for bullet in list.iter_mut() {
            if bullet.update(level) == BulletImpact::BaseDestroyed {
                base_destroyed = true;
            }
        }
        list.retain(|b| !b.is_spent());
        base_destroyed
    }

    pub fn clear(&mut self) {
        self.player.clear();
        self.enemy.clear();
    }

    pub fn len(&self) -> usize {
        self.player.len() + self.enemy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
