//! Simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic for a
//! given seed and input/clock sequence:
//! - One `tick` per fixed timestep
//! - Seeded RNG only
//! - No rendering or threading

pub mod bullet;
pub mod collision;
pub mod entity;
pub mod player;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, BulletRegistry, Owner};
pub use collision::{CombatResult, resolve_player_hits};
pub use entity::{Direction, EnemyKind, PLAYER_SPEC, Tank, TankKind, TankSpec};
pub use player::{Player, PlayerSlot};
pub use rect::Rect;
pub use spawn::{LANE_COUNT, SpawnBlock, lane_rect, lane_x, try_spawn};
pub use state::{EntityIds, GameEvent, GameState, StagePhase, StateSnapshot};
pub use tick::{TickInput, next_stage, tick};
