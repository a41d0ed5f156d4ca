//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to [`tick`] is one logical frame)
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Rect, check_collision};
pub use spawner::spawn_interval;
pub use state::{
    Body, Collectible, CollectibleKind, Field, GameState, Obstacle, ObstacleKind, Particle,
    Player, Snapshot, Spark,
};
pub use tick::{GameEvent, TickInput, tick};
