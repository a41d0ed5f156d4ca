//! Dino Bus - A side-scrolling school bus runner
//!
//! Core modules:
//! - `sim`: Simulation (physics, spawning, collisions, game state)
//! - `clock`: Fixed timestep accumulator
//! - `session`: Start/Playing/GameOver state machine and scoring
//! - `renderer`: Draw list, tessellation and WebGPU pipeline
//! - `audio`: Procedural sound cues and background music
//! - `facts`: Game-over dinosaur facts from a remote text model
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod clock;
pub mod error;
pub mod facts;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, FactError, SetupError, StorageError};
pub use highscores::HighScore;
pub use session::{FactStatus, FactTicket, Session, SessionPhase};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
///
/// All timing values are in ticks; the physics assumes `SIM_HZ` ticks per second.
pub mod consts {
    /// Logical simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.6;
    /// Upward velocity applied by a jump (pixels/tick)
    pub const JUMP_VELOCITY: f32 = -12.0;
    /// Ground band height, measured from the bottom of the field
    pub const GROUND_HEIGHT: f32 = 100.0;
    /// Grass strip drawn on top of the ground band
    pub const GRASS_HEIGHT: f32 = 20.0;

    /// Scroll speed at the start of a run (pixels/tick)
    pub const START_SPEED: f32 = 5.0;
    /// Scroll speed gained every tick (never capped)
    pub const SPEED_RAMP: f32 = 0.001;
    /// Extra scroll speed while transformed
    pub const DINO_SPEED_BONUS: f32 = 3.0;

    /// Base spawn interval for rocks and cones (ticks at start speed)
    pub const SPAWN_RATE_OBSTACLE: u32 = 120;
    /// Base spawn interval for pedestrians (rarer than obstacles)
    pub const SPAWN_RATE_PERSON: u32 = 300;
    /// Fixed spawn interval for gems
    pub const SPAWN_RATE_GEM: u32 = 180;
    /// Floor for speed-scaled spawn intervals
    pub const MIN_SPAWN_INTERVAL: u32 = 8;

    /// Horizontal position of the player
    pub const PLAYER_X: f32 = 50.0;
    /// Bus dimensions
    pub const BUS_WIDTH: f32 = 60.0;
    pub const BUS_HEIGHT: f32 = 40.0;
    /// Dino dimensions (taller than the bus)
    pub const DINO_WIDTH: f32 = 60.0;
    pub const DINO_HEIGHT: f32 = 60.0;

    /// Rock/cone size
    pub const OBSTACLE_SIZE: f32 = 40.0;
    /// Pedestrian dimensions
    pub const PERSON_WIDTH: f32 = 30.0;
    pub const PERSON_HEIGHT: f32 = 50.0;
    /// Gem size
    pub const GEM_SIZE: f32 = 40.0;
    /// Gem top edge above the ground line (low and high placement)
    pub const GEM_LOW_LIFT: f32 = 40.0;
    pub const GEM_HIGH_LIFT: f32 = 120.0;

    /// Transformed duration (~10 seconds)
    pub const DINO_DURATION: u32 = 600;

    /// Inward hitbox padding applied to both boxes
    pub const HITBOX_PADDING: f32 = 10.0;

    /// Score rewards
    pub const SMASH_BONUS: u64 = 5;
    pub const GEM_BONUS: u64 = 10;
    pub const EAT_BONUS: u64 = 50;
    pub const DISTANCE_BONUS: u64 = 1;
    /// Ticks between distance rewards
    pub const DISTANCE_INTERVAL: u64 = 10;

    /// Particle defaults
    pub const PARTICLE_SIZE: f32 = 4.0;
    pub const PARTICLE_SPREAD: f32 = 10.0;
    pub const PARTICLE_DECAY: f32 = 0.05;
    pub const MAX_PARTICLES: usize = 256;
}
