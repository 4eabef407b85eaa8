//! The human-controlled tank

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{BulletRegistry, Owner};
use super::entity::{Direction, PLAYER_SPEC, Tank, TankKind};
use super::rect::Rect;
use super::state::EntityIds;
use super::tick::TickInput;
use crate::consts::*;
use crate::platform::{Level, Surface};

/// Player tank plus the state that survives deaths and stage changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    tank: Tank,
    /// Respawns left after the current tank is destroyed
    spare_lives: u32,
    /// Damage dealt by the player's bullets
    strength: u32,
}

impl Player {
    pub fn new(id: u32) -> Self {
        Self {
            tank: Self::fresh_tank(id),
            spare_lives: PLAYER_SPARE_LIVES,
            strength: PLAYER_BASE_STRENGTH,
        }
    }

    fn fresh_tank(id: u32) -> Tank {
        Tank::new(id, TankKind::Player, PLAYER_SPEC, start_position(), SCALE)
    }

    pub fn tank(&self) -> &Tank {
        &self.tank
    }

    pub fn pos(&self) -> Vec2 {
        self.tank.pos
    }

    pub fn rect(&self) -> Rect {
        self.tank.rect()
    }

    pub fn is_alive(&self) -> bool {
        self.tank.is_alive()
    }

    pub fn spare_lives(&self) -> u32 {
        self.spare_lives
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Power-ups live in the level layer; they raise strength through here
    pub fn set_strength(&mut self, strength: u32) {
        self.strength = strength.max(PLAYER_BASE_STRENGTH);
    }

    /// False once the last tank has been destroyed and its explosion played
    pub fn has_more_lives(&self) -> bool {
        self.spare_lives > 0 || !self.tank.explosion_finished()
    }

    /// One tick of player logic: enemy fire, input-driven movement, firing,
    /// or the death explosion and respawn
    pub fn update(
        &mut self,
        input: &TickInput,
        level: &dyn Level,
        bullets: &mut BulletRegistry,
        ids: &mut EntityIds,
    ) {
        if !self.tank.is_alive() {
            self.tank.advance_explosion();
            if self.tank.explosion_finished() && self.spare_lives > 0 {
                self.spare_lives -= 1;
                self.tank = Self::fresh_tank(self.tank.id);
                log::info!("Player respawned ({} spare lives)", self.spare_lives);
            }
            return;
        }

        let rect = self.tank.rect();
        if let Some(bullet) = bullets
            .get_mut(Owner::Enemy)
            .iter_mut()
            .find(|b| b.is_active() && b.rect().intersects(&rect))
        {
            bullet.set_inactive();
            self.tank.fix_hitting(1);
            log::info!("Player hit");
            return;
        }

        if let Some(dir) = input.direction() {
            self.tank.step(dir, level);
        }

        if input.fire {
            if let Some(bullet) = self.tank.fire(ids.next(), Owner::Player, self.strength, bullets) {
                bullets.register(Owner::Player, bullet);
            }
        }
    }

    /// Carry the player into a new stage: back to the start, facing north
    pub fn move_on_next_level(&mut self) {
        self.tank.pos = start_position();
        self.tank.facing = Direction::North;
        self.tank.forget_bullet();
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.tank.is_alive() {
            self.tank.render(surface);
        } else {
            self.tank.draw_explosion(surface);
        }
    }
}

fn start_position() -> Vec2 {
    Vec2::new(PLAYER_START_X, PLAYER_START_Y)
}

/// Whether a controllable player still exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerSlot {
    Active(Player),
    Eliminated,
}

impl PlayerSlot {
    pub fn active(&self) -> Option<&Player> {
        match self {
            PlayerSlot::Active(player) => Some(player),
            PlayerSlot::Eliminated => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut Player> {
        match self {
            PlayerSlot::Active(player) => Some(player),
            PlayerSlot::Eliminated => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PlayerSlot::Active(_))
    }

    pub fn has_more_lives(&self) -> bool {
        self.active().is_some_and(Player::has_more_lives)
    }

    /// Damage dealt by player bullets, even after elimination
    pub fn strength(&self) -> u32 {
        self.active()
            .map_or(PLAYER_BASE_STRENGTH, Player::strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OpenField;
    use crate::sim::bullet::Bullet;

    fn enemy_bullet_on(player: &Player, id: u32) -> Bullet {
        Bullet::new(id, Owner::Enemy, 99, player.pos() + Vec2::splat(10.0), Direction::South, 1)
    }

    #[test]
    fn test_moves_by_input() {
        let level = OpenField::default();
        let mut bullets = BulletRegistry::default();
        let mut ids = EntityIds::default();
        let mut player = Player::new(ids.next());
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        player.update(&input, &level, &mut bullets, &mut ids);
        assert_eq!(player.pos(), Vec2::new(PLAYER_START_X - PLAYER_SPEED, PLAYER_START_Y));
        assert_eq!(player.tank().facing, Direction::West);
    }

    #[test]
    fn test_fire_registers_player_bullet_with_strength() {
        let level = OpenField::default();
        let mut bullets = BulletRegistry::default();
        let mut ids = EntityIds::default();
        let mut player = Player::new(ids.next());
        player.set_strength(2);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        player.update(&input, &level, &mut bullets, &mut ids);
        player.update(&input, &level, &mut bullets, &mut ids);

        let fired = bullets.get(Owner::Player);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].strength, 2);
        assert_eq!(fired[0].dir, Direction::North);
    }

    #[test]
    fn test_enemy_bullet_kills_then_respawns() {
        let level = OpenField::default();
        let mut bullets = BulletRegistry::default();
        let mut ids = EntityIds::default();
        let mut player = Player::new(ids.next());
        bullets.register(Owner::Enemy, enemy_bullet_on(&player, 50));

        player.update(&TickInput::default(), &level, &mut bullets, &mut ids);
        assert!(!player.is_alive());
        assert!(!bullets.is_live(Owner::Enemy, 50));

        for _ in 0..EXPLOSION_TICKS {
            player.update(&TickInput::default(), &level, &mut bullets, &mut ids);
        }
        assert!(player.is_alive());
        assert_eq!(player.spare_lives(), PLAYER_SPARE_LIVES - 1);
        assert_eq!(player.pos(), start_position());
    }

    #[test]
    fn test_last_life_runs_out_after_explosion() {
        let level = OpenField::default();
        let mut bullets = BulletRegistry::default();
        let mut ids = EntityIds::default();
        let mut player = Player::new(ids.next());

        for round in 0..=PLAYER_SPARE_LIVES {
            bullets.register(Owner::Enemy, enemy_bullet_on(&player, 100 + round));
            player.update(&TickInput::default(), &level, &mut bullets, &mut ids);
            assert!(!player.is_alive());
            assert!(player.has_more_lives());
            for _ in 0..EXPLOSION_TICKS {
                player.update(&TickInput::default(), &level, &mut bullets, &mut ids);
            }
        }
        assert!(!player.has_more_lives());
        assert!(PlayerSlot::Active(player).strength() >= PLAYER_BASE_STRENGTH);
        assert_eq!(PlayerSlot::Eliminated.strength(), PLAYER_BASE_STRENGTH);
    }

    #[test]
    fn test_move_on_next_level_keeps_lives() {
        let level = OpenField::default();
        let mut bullets = BulletRegistry::default();
        let mut ids = EntityIds::default();
        let mut player = Player::new(ids.next());
        let input = TickInput {
            up: true,
            ..Default::default()
        };
        for _ in 0..10 {
            player.update(&input, &level, &mut bullets, &mut ids);
        }
        player.set_strength(3);
        player.move_on_next_level();
        assert_eq!(player.pos(), start_position());
        assert_eq!(player.strength(), 3);
        assert_eq!(player.spare_lives(), PLAYER_SPARE_LIVES);
    }
}
