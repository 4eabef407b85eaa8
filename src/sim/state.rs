//! Game state and the operations the UI layer calls between ticks
//!
//! Everything the simulation mutates lives in one owned `GameState`; there
//! are no globals. `reset` builds a fresh state rather than patching fields.

use std::fmt;
use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletRegistry, Owner};
use super::entity::{EnemyKind, Tank};
use super::player::{Player, PlayerSlot};
use crate::consts::*;
use crate::platform::{Level, LevelFactory};

/// Monotonic id source for tanks and bullets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    /// Allocate a new entity ID (ids start at 1)
    pub fn next(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

/// Stage progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePhase {
    /// Enemies remain (alive or still to spawn)
    Playing,
    /// Stage cleared at `at_ms`; the next stage starts after the win delay
    Won { at_ms: u64 },
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind, lane: usize },
    EnemyDestroyed { id: u32, kind: EnemyKind },
    StageCleared { stage: u8 },
    StageAdvanced { stage: u8 },
    PlayerEliminated,
    GameOver,
}

/// Serializable summary for logs and tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub stage: u8,
    pub spawn_budget: u32,
    pub enemies: usize,
    pub player_bullets: usize,
    pub enemy_bullets: usize,
    pub frozen: bool,
    pub won: bool,
    pub game_over: bool,
    pub player_lives: Option<u32>,
    pub time_ticks: u64,
}

/// Complete simulation state for one session
pub struct GameState {
    /// Seed this state was built from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) ids: EntityIds,
    /// Current stage, 1..=3
    pub(crate) stage: u8,
    /// Live (and exploding) enemies in spawn order
    pub(crate) enemies: Vec<Tank>,
    pub(crate) bullets: BulletRegistry,
    /// Enemies this stage may still produce
    pub(crate) spawn_budget: u32,
    /// Time the current freeze began, if any
    pub(crate) frozen_since: Option<u64>,
    pub(crate) phase: StagePhase,
    pub(crate) game_over: bool,
    pub(crate) player: PlayerSlot,
    pub(crate) level: Box<dyn Level>,
    pub(crate) levels: Arc<dyn LevelFactory>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("seed", &self.seed)
            .field("stage", &self.stage)
            .field("spawn_budget", &self.spawn_budget)
            .field("enemies", &self.enemies.len())
            .field("bullets", &self.bullets.len())
            .field("phase", &self.phase)
            .field("frozen_since", &self.frozen_since)
            .field("game_over", &self.game_over)
            .field("time_ticks", &self.time_ticks)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Stage 1, full spawn budget, a fresh player
    pub fn new(seed: u64, levels: Arc<dyn LevelFactory>) -> Self {
        let mut ids = EntityIds::default();
        let player = Player::new(ids.next());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ids,
            stage: 1,
            enemies: Vec::new(),
            bullets: BulletRegistry::default(),
            spawn_budget: SPAWN_BUDGET,
            frozen_since: None,
            phase: StagePhase::Playing,
            game_over: false,
            player: PlayerSlot::Active(player),
            level: levels.build(1),
            levels,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Replace this state with a fresh stage-1 session.
    /// The new seed is drawn from the current RNG so restarts stay reproducible.
    pub fn reset(&mut self) {
        let seed = self.rng.next_u64();
        *self = Self::new(seed, Arc::clone(&self.levels));
        log::info!("Game reset (seed {seed})");
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn enemies(&self) -> &[Tank] {
        &self.enemies
    }

    /// Remaining spawn budget for this stage (what the HUD counts down)
    pub fn enemy_count(&self) -> u32 {
        self.spawn_budget
    }

    pub fn player(&self) -> &PlayerSlot {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerSlot {
        &mut self.player
    }

    pub fn level(&self) -> &dyn Level {
        self.level.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_since.is_some()
    }

    pub fn register_bullet(&mut self, owner: Owner, bullet: Bullet) {
        self.bullets.register(owner, bullet);
    }

    /// No-op when the list is empty or the bullet is not registered
    pub fn unregister_bullet(&mut self, owner: Owner, id: u32) {
        self.bullets.unregister(owner, id);
    }

    pub fn bullets(&self, owner: Owner) -> &[Bullet] {
        self.bullets.get(owner)
    }

    /// Allocate an id for a tank or bullet created outside the tick
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next()
    }

    /// Suspend enemy updates for `FREEZE_TIME_MS` starting at `now_ms`
    pub fn freeze_enemies(&mut self, now_ms: u64) {
        self.frozen_since = Some(now_ms);
        log::debug!("Enemies frozen at {now_ms} ms");
    }

    /// Kill every current enemy; bullets and spawn budget are untouched
    pub fn detonate_enemies(&mut self) {
        for enemy in &mut self.enemies {
            enemy.set_dead();
        }
    }

    /// Halt stage progression for good and show the game-over overlay
    pub fn set_game_over(&mut self) {
        if !self.game_over {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over on stage {}", self.stage);
        }
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            stage: self.stage,
            spawn_budget: self.spawn_budget,
            enemies: self.enemies.len(),
            player_bullets: self.bullets.get(Owner::Player).len(),
            enemy_bullets: self.bullets.get(Owner::Enemy).len(),
            frozen: self.is_frozen(),
            won: matches!(self.phase, StagePhase::Won { .. }),
            game_over: self.game_over,
            player_lives: self.player.active().map(Player::spare_lives),
            time_ticks: self.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OpenFieldFactory;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(7, Arc::new(OpenFieldFactory::default()))
    }

    #[test]
    fn test_new_state_defaults() {
        let state = state();
        assert_eq!(state.stage(), 1);
        assert_eq!(state.enemy_count(), SPAWN_BUDGET);
        assert!(state.enemies().is_empty());
        assert!(!state.is_game_over());
        assert!(state.player().is_active());
        assert_eq!(state.phase(), StagePhase::Playing);
    }

    #[test]
    fn test_reset_builds_fresh_session() {
        let mut state = state();
        state.stage = 3;
        state.spawn_budget = 4;
        let id = state.next_entity_id();
        state.enemies.push(Tank::enemy(id, EnemyKind::Tank, Vec2::ZERO, SCALE));
        state.set_game_over();
        state.player = PlayerSlot::Eliminated;

        state.reset();
        assert_eq!(state.stage(), 1);
        assert!(state.enemies().is_empty());
        assert_eq!(state.enemy_count(), SPAWN_BUDGET);
        assert!(!state.is_game_over());
        let player = state.player().active().expect("fresh player");
        assert_eq!(player.spare_lives(), PLAYER_SPARE_LIVES);
        assert!(player.is_alive());
    }

    #[test]
    fn test_detonate_leaves_bullets_and_budget() {
        let mut state = state();
        for x in [0.0, 288.0] {
            let id = state.next_entity_id();
            state.enemies.push(Tank::enemy(id, EnemyKind::Tank, Vec2::new(x, 0.0), SCALE));
        }
        let id = state.next_entity_id();
        state.register_bullet(
            Owner::Enemy,
            Bullet::new(id, Owner::Enemy, 2, Vec2::ZERO, crate::sim::Direction::South, 1),
        );
        state.spawn_budget = 11;

        state.detonate_enemies();
        assert!(state.enemies().iter().all(|e| !e.is_alive()));
        assert_eq!(state.bullets(Owner::Enemy).len(), 1);
        assert_eq!(state.enemy_count(), 11);
    }

    #[test]
    fn test_game_over_event_emitted_once() {
        let mut state = state();
        state.set_game_over();
        state.set_game_over();
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);
        assert!(state.drain_events().is_empty());
    }
}
