//! Procedural spawning
//!
//! Entities appear at the right edge of the field. Rocks, cones and
//! pedestrians spawn on speed-scaled intervals so their on-screen spacing stays
//! roughly constant as the game speeds up; gems spawn on a fixed interval.

use rand::Rng;

use super::collision::Rect;
use super::state::{Body, Collectible, CollectibleKind, GameState, Obstacle, ObstacleKind};

/// Ticks between spawns at the given speed: `floor(base / (speed / reference))`.
///
/// Clamped to `min` so unbounded speed growth can never yield a zero (or
/// negative) modulus.
pub fn spawn_interval(base: u32, speed: f32, reference_speed: f32, min: u32) -> u32 {
    let min = min.max(1);
    let scaled = (base as f32 / (speed / reference_speed)).floor();
    if scaled.is_finite() && scaled >= min as f32 {
        // Saturating float→int cast handles very slow speeds
        scaled as u32
    } else {
        min
    }
}

/// Spawn whatever is due on the current tick
pub fn spawn(state: &mut GameState, effective_speed: f32) {
    let t = &state.tuning;
    let tick = state.ticks;
    let spawn_x = state.field.width;
    let ground = state.ground_line();

    let obstacle_every = spawn_interval(
        t.obstacle_interval,
        effective_speed,
        t.reference_speed,
        t.min_spawn_interval,
    );
    let person_every = spawn_interval(
        t.person_interval,
        effective_speed,
        t.reference_speed,
        t.min_spawn_interval,
    );
    let gem_every = t.gem_interval.max(1);

    if tick % obstacle_every as u64 == 0 {
        let kind = if state.rng.random_bool(0.5) {
            ObstacleKind::Rock
        } else {
            ObstacleKind::Cone
        };
        let size = t.obstacle_size;
        state.obstacles.push(Obstacle {
            body: Body::new(Rect::new(spawn_x, ground - size, size, size)),
            kind,
        });
    }

    if tick % person_every as u64 == 0 {
        let (w, h) = t.person_size;
        state.obstacles.push(Obstacle {
            body: Body::new(Rect::new(spawn_x, ground - h, w, h)),
            kind: ObstacleKind::Pedestrian,
        });
    }

    if tick % gem_every as u64 == 0 {
        // High gems force a jump
        let lift = if state.rng.random_bool(0.5) {
            t.gem_high_lift
        } else {
            t.gem_low_lift
        };
        let size = t.gem_size;
        state.collectibles.push(Collectible {
            body: Body::new(Rect::new(spawn_x, ground - lift, size, size)),
            kind: CollectibleKind::Gem,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Field;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(Tuning::default(), Field::new(800.0, 600.0), 42)
    }

    #[test]
    fn test_interval_at_start_speed_equals_base() {
        assert_eq!(spawn_interval(120, 5.0, 5.0, 8), 120);
        assert_eq!(spawn_interval(300, 5.0, 5.0, 8), 300);
    }

    #[test]
    fn test_interval_shrinks_with_speed() {
        // Twice the reference speed halves the interval
        assert_eq!(spawn_interval(120, 10.0, 5.0, 8), 60);
        // floor, not round: 120 / (7 / 5) = 85.71
        assert_eq!(spawn_interval(120, 7.0, 5.0, 8), 85);
    }

    #[test]
    fn test_interval_is_clamped_at_extreme_speed() {
        assert_eq!(spawn_interval(120, 10_000.0, 5.0, 8), 8);
        assert_eq!(spawn_interval(120, f32::INFINITY, 5.0, 8), 8);
        assert_eq!(spawn_interval(120, 10_000.0, 5.0, 0), 1);
    }

    #[test]
    fn test_spawns_on_matching_ticks() {
        let mut s = state();
        s.ticks = 600; // multiple of 120 and 300, not of 180
        spawn(&mut s, START_SPEED);
        assert_eq!(s.obstacles.len(), 2);
        assert!(s.obstacles.iter().any(|o| o.kind == ObstacleKind::Pedestrian));
        assert!(s.collectibles.is_empty());

        let mut s = state();
        s.ticks = 180;
        spawn(&mut s, START_SPEED);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.collectibles.len(), 1);
    }

    #[test]
    fn test_spawned_entities_sit_on_the_ground_at_right_edge() {
        let mut s = state();
        s.ticks = 1800; // divisible by 120, 300 and 180
        spawn(&mut s, START_SPEED);
        let ground = s.ground_line();

        for o in &s.obstacles {
            assert_eq!(o.body.rect.pos.x, 800.0);
            assert_eq!(o.body.rect.bottom(), ground);
        }
        let gem = &s.collectibles[0].body.rect;
        assert_eq!(gem.pos.x, 800.0);
        let lift = ground - gem.pos.y;
        assert!(lift == GEM_LOW_LIFT || lift == GEM_HIGH_LIFT);
    }

    #[test]
    fn test_off_ticks_spawn_nothing() {
        let mut s = state();
        s.ticks = 7;
        spawn(&mut s, START_SPEED);
        assert!(s.obstacles.is_empty());
        assert!(s.collectibles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_interval_never_below_min(speed in 0.01f32..1.0e6, base in 1u32..2000, min in 0u32..50) {
            let interval = spawn_interval(base, speed, 5.0, min);
            prop_assert!(interval >= min.max(1));
        }

        #[test]
        fn prop_interval_non_increasing_in_speed(a in 0.5f32..500.0, b in 0.5f32..500.0) {
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(spawn_interval(120, fast, 5.0, 8) <= spawn_interval(120, slow, 5.0, 8));
        }
    }
}
