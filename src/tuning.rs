//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub jump_velocity: f32,
    pub ground_height: f32,

    // === Scrolling ===
    pub start_speed: f32,
    pub speed_ramp: f32,
    pub dino_speed_bonus: f32,

    // === Spawning ===
    pub obstacle_interval: u32,
    pub person_interval: u32,
    pub gem_interval: u32,
    pub min_spawn_interval: u32,
    /// Speed at which the speed-scaled intervals equal their base values
    pub reference_speed: f32,

    // === Dimensions ===
    pub player_x: f32,
    pub bus_size: (f32, f32),
    pub dino_size: (f32, f32),
    pub obstacle_size: f32,
    pub person_size: (f32, f32),
    pub gem_size: f32,
    pub gem_low_lift: f32,
    pub gem_high_lift: f32,

    // === Power mode ===
    pub dino_duration: u32,

    // === Collisions & scoring ===
    pub hitbox_padding: f32,
    pub smash_bonus: u64,
    pub gem_bonus: u64,
    pub eat_bonus: u64,
    pub distance_bonus: u64,
    pub distance_interval: u64,

    // === Particles ===
    pub particle_size: f32,
    pub particle_spread: f32,
    pub particle_decay: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            ground_height: GROUND_HEIGHT,

            start_speed: START_SPEED,
            speed_ramp: SPEED_RAMP,
            dino_speed_bonus: DINO_SPEED_BONUS,

            obstacle_interval: SPAWN_RATE_OBSTACLE,
            person_interval: SPAWN_RATE_PERSON,
            gem_interval: SPAWN_RATE_GEM,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            reference_speed: START_SPEED,

            player_x: PLAYER_X,
            bus_size: (BUS_WIDTH, BUS_HEIGHT),
            dino_size: (DINO_WIDTH, DINO_HEIGHT),
            obstacle_size: OBSTACLE_SIZE,
            person_size: (PERSON_WIDTH, PERSON_HEIGHT),
            gem_size: GEM_SIZE,
            gem_low_lift: GEM_LOW_LIFT,
            gem_high_lift: GEM_HIGH_LIFT,

            dino_duration: DINO_DURATION,

            hitbox_padding: HITBOX_PADDING,
            smash_bonus: SMASH_BONUS,
            gem_bonus: GEM_BONUS,
            eat_bonus: EAT_BONUS,
            distance_bonus: DISTANCE_BONUS,
            distance_interval: DISTANCE_INTERVAL,

            particle_size: PARTICLE_SIZE,
            particle_spread: PARTICLE_SPREAD,
            particle_decay: PARTICLE_DECAY,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load overrides from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Clamp values that would break the simulation's invariants
    pub fn sanitized(mut self) -> Self {
        self.min_spawn_interval = self.min_spawn_interval.max(1);
        self.obstacle_interval = self.obstacle_interval.max(1);
        self.person_interval = self.person_interval.max(1);
        self.gem_interval = self.gem_interval.max(1);
        self.distance_interval = self.distance_interval.max(1);
        self.start_speed = self.start_speed.max(0.1);
        self.reference_speed = self.reference_speed.max(0.1);
        self.speed_ramp = self.speed_ramp.max(0.0);
        self.dino_speed_bonus = self.dino_speed_bonus.max(0.0);
        self.particle_decay = self.particle_decay.max(0.001);
        self.dino_duration = self.dino_duration.max(1);

        let positive = |(w, h): (f32, f32)| (w.max(1.0), h.max(1.0));
        self.bus_size = positive(self.bus_size);
        self.dino_size = positive(self.dino_size);
        self.person_size = positive(self.person_size);
        self.obstacle_size = self.obstacle_size.max(1.0);
        self.gem_size = self.gem_size.max(1.0);
        self
    }

    /// Height gained when the bus turns into the dino
    pub fn transform_lift(&self) -> f32 {
        self.dino_size.1 - self.bus_size.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8, "eat_bonus": 100 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.eat_bonus, 100);
        assert_eq!(tuning.jump_velocity, JUMP_VELOCITY);
        assert_eq!(tuning.dino_duration, DINO_DURATION);
    }

    #[test]
    fn test_sanitize_rejects_zero_intervals() {
        let tuning = Tuning::from_json(r#"{ "min_spawn_interval": 0, "distance_interval": 0 }"#)
            .unwrap();
        assert_eq!(tuning.min_spawn_interval, 1);
        assert_eq!(tuning.distance_interval, 1);
    }

    #[test]
    fn test_sanitize_rejects_empty_sizes_and_duration() {
        let tuning = Tuning::from_json(
            r#"{
                "dino_duration": 0,
                "bus_size": [0.0, -40.0],
                "dino_size": [-1.0, 60.0],
                "person_size": [30.0, 0.0],
                "obstacle_size": -5.0,
                "gem_size": 0.0
            }"#,
        )
        .unwrap();
        assert_eq!(tuning.dino_duration, 1);
        assert_eq!(tuning.bus_size, (1.0, 1.0));
        assert_eq!(tuning.dino_size, (1.0, 60.0));
        assert_eq!(tuning.person_size, (30.0, 1.0));
        assert_eq!(tuning.obstacle_size, 1.0);
        assert_eq!(tuning.gem_size, 1.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ gravity: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_transform_lift() {
        assert_eq!(Tuning::default().transform_lift(), DINO_HEIGHT - BUS_HEIGHT);
    }
}
