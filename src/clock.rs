//! Frame timing
//!
//! [`FixedStep`] turns variable display frame deltas into a whole number of
//! 60 Hz simulation ticks. [`FpsCounter`] feeds the optional HUD readout.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT, SIM_HZ};

/// Simulation ticks in `seconds` of game time, saturating at `u32::MAX`
pub fn ticks_in(seconds: u32) -> u32 {
    seconds.saturating_mul(SIM_HZ)
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_frame_dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_FRAME_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_frame_dt: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_frame_dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Feed one frame's elapsed seconds; returns how many ticks to run.
    ///
    /// Long stalls (tab switch, debugger) are clamped so the game doesn't fast
    /// forward. Time left over after the substep cap is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    /// Fraction of a tick left in the accumulator (0..1)
    #[cfg(test)]
    fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    /// Forget any banked time (after a restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Rolling frames-per-second over the last 60 frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp in milliseconds
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample sits at the next write position
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ticks_in_saturates() {
        assert_eq!(ticks_in(0), 0);
        assert_eq!(ticks_in(30), 1800);
        assert_eq!(ticks_in(u32::MAX / SIM_HZ), (u32::MAX / SIM_HZ) * SIM_HZ);
        assert_eq!(ticks_in(u32::MAX / SIM_HZ + 1), u32::MAX);
        assert_eq!(ticks_in(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_one_tick_per_sixtieth() {
        let mut clock = FixedStep::default();
        let mut total = 0;
        for _ in 0..60 {
            total += clock.advance(1.0 / 60.0 + 1e-6);
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_high_refresh_display_accumulates() {
        // 120 Hz display: a tick every other frame
        let mut clock = FixedStep::default();
        let ticks: Vec<u32> = (0..4).map(|_| clock.advance(1.0 / 120.0 + 1e-6)).collect();
        assert_eq!(ticks.iter().sum::<u32>(), 2);
        assert!(ticks.iter().all(|&t| t <= 1));
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FixedStep::default();
        // A 5 second stall counts as 0.1s = 6 ticks
        assert_eq!(clock.advance(5.0), 6);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_reset_drops_banked_time() {
        let mut clock = FixedStep::default();
        clock.advance(0.01);
        assert!(clock.alpha() > 0.0);
        clock.reset();
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_fps_counter_steady_rate() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_substep_cap(deltas in prop::collection::vec(-1.0f32..10.0, 1..200)) {
            let mut clock = FixedStep::new(SIM_DT, 1.0, 4);
            for dt in deltas {
                prop_assert!(clock.advance(dt) <= 4);
                prop_assert!(clock.alpha() <= 1.0);
            }
        }
    }
}
