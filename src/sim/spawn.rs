//! Enemy spawner
//!
//! One attempt per tick: pick a lane at the top of the arena, reject it if
//! anything is in the way, otherwise spend one unit of the stage's budget.

use glam::Vec2;
use rand::Rng;

use super::entity::{EnemyKind, Tank};
use super::rect::Rect;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Spawn lanes: left edge, centre, right edge
pub const LANE_COUNT: usize = 3;

/// X of a lane's left edge
pub fn lane_x(lane: usize) -> f32 {
    lane as f32 * ((WIDTH - TANK_SIZE) / 2.0)
}

/// Rectangle a new enemy would occupy in `lane`
pub fn lane_rect(lane: usize) -> Rect {
    Rect::new(lane_x(lane), 0.0, TANK_SIZE, TANK_SIZE)
}

/// Why a spawn attempt produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnBlock {
    /// Concurrency cap reached
    Crowded,
    /// Budget spent for this stage
    Exhausted,
    /// An enemy is playing its spawn animation
    Evolving,
    /// Lane occupied by an enemy or the player
    LaneOccupied,
}

/// Variant for the spawn that just brought the budget down to `remaining`
pub fn choose_variant(stage: u8, remaining: u32, rng: &mut impl Rng) -> EnemyKind {
    if stage == 1 {
        if remaining < STAGE_ONE_INFANTRY_TAIL {
            EnemyKind::InfantryVehicle
        } else {
            EnemyKind::Tank
        }
    } else {
        match rng.random_range(0..4) {
            0 => EnemyKind::InfantryVehicle,
            1 => EnemyKind::GreenTank,
            _ => EnemyKind::Tank,
        }
    }
}

/// Whether `candidate` may receive a new enemy this tick
pub fn check_lane(state: &GameState, candidate: &Rect) -> Result<(), SpawnBlock> {
    for enemy in &state.enemies {
        if enemy.is_evolving() {
            return Err(SpawnBlock::Evolving);
        }
        if enemy.is_alive() && candidate.intersects(&enemy.rect()) {
            return Err(SpawnBlock::LaneOccupied);
        }
    }
    if let Some(player) = state.player.active() {
        if candidate.intersects(&player.rect()) {
            return Err(SpawnBlock::LaneOccupied);
        }
    }
    Ok(())
}

/// One spawn attempt. On success the new enemy is appended and its id returned.
pub fn try_spawn(state: &mut GameState) -> Result<u32, SpawnBlock> {
    if state.enemies.len() >= MAX_CONCURRENT_ENEMIES {
        return Err(SpawnBlock::Crowded);
    }
    if state.spawn_budget == 0 {
        return Err(SpawnBlock::Exhausted);
    }

    let lane = state.rng.random_range(0..LANE_COUNT);
    let candidate = lane_rect(lane);
    check_lane(state, &candidate)?;

    state.spawn_budget -= 1;
    let kind = choose_variant(state.stage, state.spawn_budget, &mut state.rng);
    let id = state.ids.next();
    state
        .enemies
        .push(Tank::enemy(id, kind, Vec2::new(candidate.x, candidate.y), SCALE));
    state.events.push(GameEvent::EnemySpawned { id, kind, lane });
    log::debug!(
        "Spawned {:?} #{} in lane {} ({} left)",
        kind,
        id,
        lane,
        state.spawn_budget
    );
    Ok(id)
}
