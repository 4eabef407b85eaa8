//! Frame rendering
//!
//! Draws one frame of a [`GameState`] onto a [`Display`]. Draw order is
//! back to front: level tiles, player, enemies, bullets, then grass over
//! everything so tanks can hide under it. The game-over banner goes last.

use glam::Vec2;

use crate::consts::*;
use crate::platform::Display;
use crate::sim::{GameState, Owner};

/// Top-left of the game-over banner
pub fn game_over_position() -> Vec2 {
    Vec2::new(WIDTH / 2.0 - 2.0 * SCALED_TILE_SIZE, HEIGHT / 2.0)
}

/// Render one frame and present it
pub fn render_frame(state: &GameState, display: &mut dyn Display) {
    display.clear();
    {
        let surface = display.as_surface();
        state.level().render(surface);

        if let Some(player) = state.player().active() {
            player.render(surface);
        }

        for enemy in state.enemies() {
            if enemy.is_alive() {
                enemy.render(surface);
            } else {
                enemy.draw_explosion(surface);
            }
        }

        for bullet in state.bullets(Owner::Enemy) {
            bullet.render(surface);
        }
        for bullet in state.bullets(Owner::Player) {
            bullet.render(surface);
        }

        state.level().render_grass(surface);

        if state.is_game_over() {
            surface.draw_game_over(game_over_position());
        }
    }
    display.swap_buffers();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessDisplay, OpenFieldFactory};
    use crate::sim::{Bullet, Direction};
    use std::sync::Arc;

    fn state() -> GameState {
        GameState::new(3, Arc::new(OpenFieldFactory::default()))
    }

    #[test]
    fn test_frame_draws_player_and_swaps() {
        let state = state();
        let mut display = HeadlessDisplay::new();
        let stats = display.stats();

        render_frame(&state, &mut display);
        assert_eq!(stats.frames(), 1);
        // Player tank only; the open field has no walls
        assert_eq!(stats.sprites(), 1);
        assert_eq!(stats.game_over_draws(), 0);
    }

    #[test]
    fn test_bullets_are_drawn() {
        let mut state = state();
        for owner in [Owner::Player, Owner::Enemy] {
            let id = state.next_entity_id();
            state.register_bullet(
                owner,
                Bullet::new(id, owner, 0, Vec2::new(50.0, 50.0), Direction::North, 1),
            );
        }
        let mut display = HeadlessDisplay::new();
        let stats = display.stats();

        render_frame(&state, &mut display);
        assert_eq!(stats.sprites(), 3);
    }

    #[test]
    fn test_game_over_banner_follows_flag() {
        let mut state = state();
        let mut display = HeadlessDisplay::new();
        let stats = display.stats();

        render_frame(&state, &mut display);
        assert_eq!(stats.game_over_draws(), 0);

        state.set_game_over();
        render_frame(&state, &mut display);
        render_frame(&state, &mut display);
        assert_eq!(stats.game_over_draws(), 2);
        assert_eq!(stats.frames(), 3);
    }

    #[test]
    fn test_banner_is_centred() {
        assert_eq!(game_over_position(), Vec2::new(264.0, 312.0));
    }
}
