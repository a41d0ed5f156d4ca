//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one logical step. The tick
//! never performs I/O; everything the outside world should react to (sounds,
//! HUD flashes) comes back as a list of [`GameEvent`]s.

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, check_collision};
use super::spawner;
use super::state::{Body, GameState, ObstacleKind, Particle, Spark};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump requested since the last tick (debounced by the caller)
    pub jump: bool,
}

/// Side effects produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Jump accepted
    Jumped,
    /// Bus ran into a rock/cone (no penalty, the bus never stops)
    Crashed { kind: ObstacleKind },
    /// Dino smashed a rock/cone
    Smashed { kind: ObstacleKind, points: u64 },
    /// Bus brushed a pedestrian, who runs off
    Honked,
    /// Dino ate a pedestrian
    Ate { points: u64 },
    /// Gem turned the bus into a dino
    Transformed { points: u64 },
    /// Gem collected while already a dino (timer refreshed)
    Recharged { points: u64 },
    /// Dino mode expired
    Reverted,
    /// Periodic distance reward
    Distance { points: u64 },
}

impl GameEvent {
    /// Score delta carried by this event
    pub fn points(&self) -> u64 {
        match *self {
            GameEvent::Smashed { points, .. }
            | GameEvent::Ate { points }
            | GameEvent::Transformed { points }
            | GameEvent::Recharged { points }
            | GameEvent::Distance { points } => points,
            GameEvent::Jumped
            | GameEvent::Crashed { .. }
            | GameEvent::Honked
            | GameEvent::Reverted => 0,
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let ground_line = state.ground_line();

    // 1. Player physics
    if input.jump && state.player.try_jump(state.tuning.jump_velocity) {
        events.push(GameEvent::Jumped);
    }
    state.player.integrate(state.tuning.gravity, ground_line);

    // Dino mode timer
    if state.player.tick_transform(&state.tuning, ground_line) {
        log::debug!("Dino mode expired at tick {}", state.ticks);
        events.push(GameEvent::Reverted);
    }

    // 2. Clock, speed ramp and spawning
    state.ticks += 1;
    state.speed += state.tuning.speed_ramp;
    let speed = state.effective_speed();
    spawner::spawn(state, speed);

    // 3. Scroll
    for obstacle in &mut state.obstacles {
        obstacle.body.scroll(speed);
    }
    for collectible in &mut state.collectibles {
        collectible.body.scroll(speed);
    }

    // 4. Collisions (marked entities stay in place until cleanup)
    resolve_obstacles(state, &mut events);
    resolve_collectibles(state, &mut events);

    // 5. Particles
    let decay = state.tuning.particle_decay;
    for particle in &mut state.particles {
        particle.update(decay);
    }

    // 6. Cleanup
    state.obstacles.retain(|o| !o.body.is_marked());
    state.collectibles.retain(|c| !c.body.is_marked());
    state.particles.retain(|p| !p.body.is_marked());

    // 7. Distance score
    if state.ticks % state.tuning.distance_interval.max(1) == 0 {
        let points = state.tuning.distance_bonus;
        state.score += points;
        events.push(GameEvent::Distance { points });
    }

    events
}

fn resolve_obstacles(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.rect;
    let transformed = state.player.transformed;
    let padding = state.tuning.hitbox_padding;

    // Collect hits first; particle bursts need the RNG
    let mut bursts: Vec<(Vec2, Spark, usize)> = Vec::new();

    for obstacle in &mut state.obstacles {
        if obstacle.body.is_marked() || !check_collision(&player, &obstacle.body.rect, padding) {
            continue;
        }
        obstacle.body.mark_for_deletion();
        let at = obstacle.body.rect.pos;
        let kind = obstacle.kind;

        match (kind.is_pedestrian(), transformed) {
            (true, true) => {
                let points = state.tuning.eat_bonus;
                state.score += points;
                events.push(GameEvent::Ate { points });
                bursts.push((at, Spark::Eat, 10));
            }
            (true, false) => {
                events.push(GameEvent::Honked);
                bursts.push((at, Spark::Honk, 5));
            }
            (false, true) => {
                let points = state.tuning.smash_bonus;
                state.score += points;
                events.push(GameEvent::Smashed { kind, points });
                bursts.push((at, Spark::Smash, 10));
            }
            (false, false) => {
                events.push(GameEvent::Crashed { kind });
                bursts.push((at, Spark::Crash, 8));
            }
        }
    }

    for (at, spark, count) in bursts {
        spawn_particles(state, at, spark, count);
    }
}

fn resolve_collectibles(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let padding = state.tuning.hitbox_padding;
    let mut bursts: Vec<Vec2> = Vec::new();

    for collectible in &mut state.collectibles {
        // Player rect is re-read: a gem earlier in this loop may have resized it
        if collectible.body.is_marked()
            || !check_collision(&state.player.rect, &collectible.body.rect, padding)
        {
            continue;
        }
        collectible.body.mark_for_deletion();

        let points = state.tuning.gem_bonus;
        state.score += points;
        if state.player.power_up(&state.tuning) {
            log::debug!("Dino mode at tick {}", state.ticks);
            events.push(GameEvent::Transformed { points });
        } else {
            events.push(GameEvent::Recharged { points });
        }
        bursts.push(collectible.body.rect.pos);
    }

    for at in bursts {
        spawn_particles(state, at, Spark::Gem, 15);
    }
}

/// Emit a burst of sparks at `at`, respecting the particle cap
fn spawn_particles(state: &mut GameState, at: Vec2, spark: Spark, count: usize) {
    let room = state.tuning.max_particles.saturating_sub(state.particles.len());
    let size = state.tuning.particle_size;
    let spread = state.tuning.particle_spread;

    for _ in 0..count.min(room) {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * spread,
            (state.rng.random::<f32>() - 0.5) * spread,
        );
        state.particles.push(Particle {
            body: Body::new(Rect::new(at.x, at.y, size, size)),
            vel,
            spark,
            life: 1.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Collectible, CollectibleKind, Field, Obstacle};
    use crate::tuning::Tuning;

    /// Tuning with spawning pushed out of the way so tests control every entity
    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_interval: 1_000_000,
            person_interval: 1_000_000,
            gem_interval: 1_000_000,
            reference_speed: START_SPEED,
            ..Tuning::default()
        }
    }

    fn quiet_state() -> GameState {
        GameState::new(quiet_tuning(), Field::new(800.0, 600.0), 12345)
    }

    /// Obstacle placed so that, after this tick's scroll, it sits on the player
    fn obstacle_on_player(state: &GameState, kind: ObstacleKind) -> Obstacle {
        let (w, h) = match kind {
            ObstacleKind::Pedestrian => state.tuning.person_size,
            _ => (OBSTACLE_SIZE, OBSTACLE_SIZE),
        };
        let x = state.player.rect.pos.x + 10.0 + state.effective_speed();
        Obstacle {
            body: Body::new(Rect::new(x, state.ground_line() - h, w, h)),
            kind,
        }
    }

    fn gem_on_player(state: &GameState) -> Collectible {
        let x = state.player.rect.pos.x + 10.0 + state.effective_speed();
        Collectible {
            body: Body::new(Rect::new(x, state.ground_line() - GEM_SIZE, GEM_SIZE, GEM_SIZE)),
            kind: CollectibleKind::Gem,
        }
    }

    #[test]
    fn test_jump_from_ground() {
        let mut state = quiet_state();
        let y0 = state.player.rect.pos.y;

        let events = tick(&mut state, &TickInput { jump: true });
        assert!(events.contains(&GameEvent::Jumped));
        assert!(!state.player.grounded);
        assert_eq!(state.player.vy, JUMP_VELOCITY + GRAVITY);
        assert!(state.player.rect.pos.y < y0);

        // Still rising on the next tick
        let y1 = state.player.rect.pos.y;
        tick(&mut state, &TickInput::default());
        assert!(state.player.rect.pos.y < y1);
    }

    #[test]
    fn test_jump_while_airborne_is_ignored() {
        let mut state = quiet_state();
        tick(&mut state, &TickInput { jump: true });
        let vy = state.player.vy;

        let events = tick(&mut state, &TickInput { jump: true });
        assert!(!events.contains(&GameEvent::Jumped));
        assert_eq!(state.player.vy, vy + GRAVITY);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let mut state = quiet_state();
        let rest = state.player.rect.pos.y;
        tick(&mut state, &TickInput { jump: true });
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.rect.pos.y, rest);
        assert_eq!(state.player.vy, 0.0);
    }

    #[test]
    fn test_bus_hits_cone_keeps_running() {
        let mut state = quiet_state();
        let cone = obstacle_on_player(&state, ObstacleKind::Cone);
        state.obstacles.push(cone);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Crashed { kind: ObstacleKind::Cone }));
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.particles.len(), 8);
        assert!(state.particles.iter().all(|p| p.spark == Spark::Crash));
        assert!(!state.player.transformed);
    }

    #[test]
    fn test_dino_smashes_rock() {
        let mut state = quiet_state();
        state.player.power_up(&state.tuning.clone());
        let rock = obstacle_on_player(&state, ObstacleKind::Rock);
        state.obstacles.push(rock);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Smashed {
            kind: ObstacleKind::Rock,
            points: SMASH_BONUS
        }));
        assert_eq!(state.score, SMASH_BONUS);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_dino_eats_pedestrian() {
        let mut state = quiet_state();
        state.player.power_up(&state.tuning.clone());
        let person = obstacle_on_player(&state, ObstacleKind::Pedestrian);
        state.obstacles.push(person);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Ate { points: EAT_BONUS }));
        assert_eq!(state.score, EAT_BONUS);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.iter().all(|p| p.spark == Spark::Eat));
    }

    #[test]
    fn test_bus_honks_at_pedestrian() {
        let mut state = quiet_state();
        let person = obstacle_on_player(&state, ObstacleKind::Pedestrian);
        state.obstacles.push(person);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Honked));
        assert_eq!(state.score, 0);
        assert_eq!(state.particles.len(), 5);
    }

    #[test]
    fn test_gem_transforms_bus() {
        let mut state = quiet_state();
        let y0 = state.player.rect.pos.y;
        let gem = gem_on_player(&state);
        state.collectibles.push(gem);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Transformed { points: GEM_BONUS }));
        assert!(state.player.transformed);
        assert_eq!(state.player.transform_ticks, DINO_DURATION);
        assert_eq!(state.player.rect.size, Vec2::new(DINO_WIDTH, DINO_HEIGHT));
        assert_eq!(state.player.rect.pos.y, y0 - (DINO_HEIGHT - BUS_HEIGHT));
        assert_eq!(state.score, GEM_BONUS);
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_second_gem_only_refreshes_timer() {
        let mut state = quiet_state();
        let gem = gem_on_player(&state);
        state.collectibles.push(gem);
        tick(&mut state, &TickInput::default());

        // Let the dino settle back onto the ground and burn some timer
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        let settled = state.player.rect;
        assert!(state.player.transform_ticks < DINO_DURATION);

        let gem = gem_on_player(&state);
        state.collectibles.push(gem);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Recharged { points: GEM_BONUS }));
        assert_eq!(state.player.transform_ticks, DINO_DURATION);
        assert_eq!(state.player.rect, settled);
    }

    #[test]
    fn test_dino_reverts_flush_with_ground() {
        let mut state = quiet_state();
        state.player.power_up(&state.tuning.clone());
        state.player.transform_ticks = 1;
        let score = state.score;

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Reverted));
        assert!(!state.player.transformed);
        assert_eq!(state.player.rect.size, Vec2::new(BUS_WIDTH, BUS_HEIGHT));
        assert_eq!(state.player.rect.bottom(), state.ground_line());
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_dino_scrolls_faster() {
        let mut state = quiet_state();
        let base = state.effective_speed();
        state.player.power_up(&state.tuning.clone());
        assert_eq!(state.effective_speed(), base + DINO_SPEED_BONUS);
    }

    #[test]
    fn test_obstacle_removed_after_right_edge_passes_zero() {
        let mut state = quiet_state();
        state.tuning.speed_ramp = 0.0;
        // After one scroll the right edge lands exactly on 0
        let x = START_SPEED - OBSTACLE_SIZE;
        state.obstacles.push(Obstacle {
            body: Body::new(Rect::new(x, 0.0, OBSTACLE_SIZE, OBSTACLE_SIZE)),
            kind: ObstacleKind::Rock,
        });

        tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].body.rect.right(), 0.0);

        tick(&mut state, &TickInput::default());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_distance_score_every_ten_ticks() {
        let mut state = quiet_state();
        for _ in 0..9 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 0);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::Distance { points: DISTANCE_BONUS }));
        assert_eq!(state.score, DISTANCE_BONUS);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = quiet_state();
        let cone = obstacle_on_player(&state, ObstacleKind::Cone);
        state.obstacles.push(cone);
        tick(&mut state, &TickInput::default());
        assert!(!state.particles.is_empty());

        // life 1.0 - 0.05/tick
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = quiet_state();
        state.tuning.max_particles = 12;
        spawn_particles(&mut state, Vec2::ZERO, Spark::Gem, 15);
        assert_eq!(state.particles.len(), 12);
        spawn_particles(&mut state, Vec2::ZERO, Spark::Gem, 15);
        assert_eq!(state.particles.len(), 12);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed produce identical runs
        let mut a = GameState::new(Tuning::default(), Field::new(1024.0, 600.0), 99999);
        let mut b = GameState::new(Tuning::default(), Field::new(1024.0, 600.0), 99999);

        for i in 0..2000 {
            let input = TickInput { jump: i % 45 == 0 };
            assert_eq!(tick(&mut a, &input), tick(&mut b, &input));
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.collectibles, b.collectibles);
        assert_eq!(a.player, b.player);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sim::state::Field;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_speed_never_decreases(seed in any::<u64>(), jumps in prop::collection::vec(any::<bool>(), 1..600)) {
            let mut state = GameState::new(Tuning::default(), Field::new(900.0, 600.0), seed);
            let mut last = state.speed;
            for jump in jumps {
                tick(&mut state, &TickInput { jump });
                prop_assert!(state.speed >= last);
                last = state.speed;
            }
        }

        #[test]
        fn prop_score_delta_matches_events(seed in any::<u64>(), jumps in prop::collection::vec(any::<bool>(), 1..800)) {
            let mut state = GameState::new(Tuning::default(), Field::new(900.0, 600.0), seed);
            for jump in jumps {
                let before = state.score;
                let events = tick(&mut state, &TickInput { jump });
                let awarded: u64 = events.iter().map(GameEvent::points).sum();
                prop_assert_eq!(state.score - before, awarded);
            }
        }

        #[test]
        fn prop_transform_timer_tracks_flag(seed in any::<u64>(), jumps in prop::collection::vec(any::<bool>(), 1..1500)) {
            let mut state = GameState::new(Tuning::default(), Field::new(900.0, 600.0), seed);
            for jump in jumps {
                tick(&mut state, &TickInput { jump });
                let p = &state.player;
                prop_assert_eq!(p.transform_ticks > 0, p.transformed);
                prop_assert!(p.rect.size.x > 0.0 && p.rect.size.y > 0.0);
                prop_assert!(p.rect.bottom() <= state.ground_line() + f32::EPSILON);
            }
        }

        #[test]
        fn prop_survivors_are_never_marked(seed in any::<u64>(), ticks in 1usize..1200) {
            // Marked entities are purged in the tick that marks them, so anything
            // still alive after a tick has never been marked
            let mut state = GameState::new(Tuning::default(), Field::new(900.0, 600.0), seed);
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default());
                prop_assert!(state.obstacles.iter().all(|o| !o.body.is_marked()));
                prop_assert!(state.collectibles.iter().all(|c| !c.body.is_marked()));
                prop_assert!(state.particles.iter().all(|p| !p.body.is_marked() && p.life > 0.0));
                prop_assert!(state.obstacles.iter().all(|o| o.body.rect.right() >= 0.0));
            }
        }
    }
}
