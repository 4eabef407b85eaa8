//! Player bullets against enemies
//!
//! Only the head of the player's bullet list is tested each tick. A player
//! with two bullets in flight therefore only lands hits with the older one;
//! the second is checked once the first has been removed.

use super::bullet::Owner;
use super::state::{GameEvent, GameState};

/// Result of one resolver pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatResult {
    /// Enemy that took the hit, if any
    pub hit: Option<u32>,
    /// Whether that hit destroyed it
    pub killed: bool,
}

/// Test the first player bullet against every non-evolving enemy in list
/// order. The first enemy it overlaps takes the player's strength in damage
/// and the bullet stops.
pub fn resolve_player_hits(state: &mut GameState) -> CombatResult {
    let strength = state.player.strength();
    let Some(bullet) = state.bullets.get_mut(Owner::Player).first_mut() else {
        return CombatResult::default();
    };

    let mut result = CombatResult::default();
    for enemy in state.enemies.iter_mut() {
        if enemy.is_evolving() || !enemy.is_alive() {
            continue;
        }
        if bullet.is_active() && enemy.rect().intersects(&bullet.rect()) {
            enemy.fix_hitting(strength);
            bullet.set_inactive();
            result.hit = Some(enemy.id);
            if !enemy.has_more_lives() {
                enemy.set_dead();
                result.killed = true;
                if let Some(kind) = enemy.enemy_kind() {
                    state.events.push(GameEvent::EnemyDestroyed { id: enemy.id, kind });
                    log::debug!("Destroyed {:?} #{}", kind, enemy.id);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::OpenFieldFactory;
    use crate::sim::{Bullet, Direction, EnemyKind, Tank};
    use glam::Vec2;
    use std::sync::Arc;

    fn state() -> GameState {
        GameState::new(1, Arc::new(OpenFieldFactory::default()))
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut tank = Tank::enemy(id, kind, pos, SCALE);
        tank.set_evolving(0);
        state.enemies.push(tank);
        id
    }

    fn add_player_bullet(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.register_bullet(
            Owner::Player,
            Bullet::new(id, Owner::Player, 1, pos, Direction::North, PLAYER_BASE_STRENGTH),
        );
        id
    }

    #[test]
    fn test_single_bullet_hits_only_first_overlapping_enemy() {
        let mut state = state();
        let first = add_enemy(&mut state, EnemyKind::Tank, Vec2::new(100.0, 100.0));
        let second = add_enemy(&mut state, EnemyKind::Tank, Vec2::new(120.0, 100.0));
        // Overlaps both tanks
        add_player_bullet(&mut state, Vec2::new(130.0, 120.0));

        let result = resolve_player_hits(&mut state);
        assert_eq!(result, CombatResult { hit: Some(first), killed: true });
        assert!(!state.enemies[0].is_alive());
        let survivor = state.enemies.iter().find(|e| e.id == second).unwrap();
        assert!(survivor.is_alive());
        assert_eq!(survivor.hit_points(), 1);
        assert!(!state.bullets(Owner::Player)[0].is_active());
    }

    #[test]
    fn test_only_head_of_list_is_checked() {
        let mut state = state();
        add_enemy(&mut state, EnemyKind::Tank, Vec2::new(100.0, 100.0));
        // Head bullet misses, second one overlaps
        add_player_bullet(&mut state, Vec2::new(500.0, 500.0));
        add_player_bullet(&mut state, Vec2::new(110.0, 110.0));

        assert_eq!(resolve_player_hits(&mut state), CombatResult::default());
        assert!(state.enemies[0].is_alive());
        assert!(state.bullets(Owner::Player).iter().all(|b| b.is_active()));
    }

    #[test]
    fn test_evolving_enemy_cannot_be_hit() {
        let mut state = state();
        let id = state.next_entity_id();
        state
            .enemies
            .push(Tank::enemy(id, EnemyKind::Tank, Vec2::new(100.0, 100.0), SCALE));
        add_player_bullet(&mut state, Vec2::new(110.0, 110.0));

        assert_eq!(resolve_player_hits(&mut state).hit, None);
        assert!(state.bullets(Owner::Player)[0].is_active());
    }

    #[test]
    fn test_armored_enemy_survives_a_hit() {
        let mut state = state();
        let id = add_enemy(&mut state, EnemyKind::GreenTank, Vec2::new(100.0, 100.0));
        add_player_bullet(&mut state, Vec2::new(110.0, 110.0));

        let result = resolve_player_hits(&mut state);
        assert_eq!(result, CombatResult { hit: Some(id), killed: false });
        assert!(state.enemies[0].is_alive());
        assert_eq!(state.enemies[0].hit_points(), 3);
    }

    #[test]
    fn test_inactive_head_bullet_deals_no_damage() {
        let mut state = state();
        add_enemy(&mut state, EnemyKind::Tank, Vec2::new(100.0, 100.0));
        add_player_bullet(&mut state, Vec2::new(110.0, 110.0));
        state.bullets.get_mut(Owner::Player)[0].set_inactive();

        assert_eq!(resolve_player_hits(&mut state).hit, None);
        assert!(state.enemies[0].is_alive());
    }
}
