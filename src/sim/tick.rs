//! Fixed timestep simulation tick
//!
//! Order within a tick:
//! 1. Stage machine (win detection, delayed stage change)
//! 2. One spawn attempt
//! 3. Player bullet vs enemies
//! 4. Freeze expiry, then enemy updates unless frozen
//! 5. Bullet updates (enemy list, then player list)
//! 6. Player elimination check and player update
//! 7. Removal of enemies whose explosion has finished

use serde::{Deserialize, Serialize};

use super::bullet::Owner;
use super::collision::resolve_player_hits;
use super::entity::Direction;
use super::player::{Player, PlayerSlot};
use super::spawn::try_spawn;
use super::state::{GameEvent, GameState, StagePhase};
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl TickInput {
    /// Requested movement; one axis at a time, vertical keys win
    pub fn direction(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::North)
        } else if self.down {
            Some(Direction::South)
        } else if self.left {
            Some(Direction::West)
        } else if self.right {
            Some(Direction::East)
        } else {
            None
        }
    }
}

/// Stage that follows `stage` (3 wraps to 1)
pub fn next_stage(stage: u8) -> u8 {
    stage % STAGE_COUNT + 1
}

/// Advance the game state by one fixed timestep. `now_ms` is wall-clock time
/// on the same clock passed to [`GameState::freeze_enemies`].
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    state.time_ticks += 1;

    update_stage(state, now_ms);

    // Rejections are routine; nothing to report
    let _ = try_spawn(state);

    resolve_player_hits(state);

    if let Some(since) = state.frozen_since {
        if now_ms > since + FREEZE_TIME_MS {
            state.frozen_since = None;
            log::debug!("Freeze expired at {now_ms} ms");
        }
    }
    if state.frozen_since.is_none() {
        let target = state
            .player
            .active()
            .filter(|p| p.is_alive())
            .map(Player::pos);
        for enemy in state.enemies.iter_mut() {
            enemy.update_enemy(
                target,
                state.level.as_ref(),
                &mut state.rng,
                &mut state.bullets,
                &mut state.ids,
            );
        }
    }
    for enemy in state.enemies.iter_mut() {
        enemy.advance_explosion();
    }

    let enemy_hit_base = state.bullets.update(Owner::Enemy, state.level.as_mut());
    let player_hit_base = state.bullets.update(Owner::Player, state.level.as_mut());
    if enemy_hit_base || player_hit_base {
        log::info!("Base destroyed");
        state.set_game_over();
    }

    if state.player.is_active() && !state.player.has_more_lives() {
        state.player = PlayerSlot::Eliminated;
        state.events.push(GameEvent::PlayerEliminated);
        log::info!("Player eliminated on stage {}", state.stage);
        state.set_game_over();
    }
    if let PlayerSlot::Active(player) = &mut state.player {
        player.update(input, state.level.as_ref(), &mut state.bullets, &mut state.ids);
    }

    state.enemies.retain(|e| !e.explosion_finished());
}

/// Win detection and the delayed move to the next stage
fn update_stage(state: &mut GameState, now_ms: u64) {
    if state.game_over {
        return;
    }
    let cleared = state.enemies.is_empty() && state.spawn_budget == 0;
    if !cleared {
        return;
    }

    if state.phase == StagePhase::Playing {
        state.phase = StagePhase::Won { at_ms: now_ms };
        state.events.push(GameEvent::StageCleared { stage: state.stage });
        log::info!("Stage {} cleared at {} ms", state.stage, now_ms);
    }

    if state.player.has_more_lives() {
        advance_stage(state, now_ms);
    }
}

/// Start the next stage once the win delay has passed
fn advance_stage(state: &mut GameState, now_ms: u64) {
    let StagePhase::Won { at_ms } = state.phase else {
        return;
    };
    if now_ms < at_ms + WIN_DELAY_MS {
        return;
    }

    state.bullets.clear();
    state.stage = next_stage(state.stage);
    state.level = state.levels.build(state.stage);
    state.frozen_since = None;
    state.spawn_budget = SPAWN_BUDGET;
    state.enemies.clear();
    state.phase = StagePhase::Playing;
    if let Some(player) = state.player.active_mut() {
        player.move_on_next_level();
    }
    state.events.push(GameEvent::StageAdvanced { stage: state.stage });
    log::info!("Stage {} begins", state.stage);
}
