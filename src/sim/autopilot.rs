//! Attract-mode autopilot
//!
//! Looks a few ticks ahead and jumps when something worth clearing (or
//! collecting from the air) is about to reach the player. Reads the state
//! only; the caller feeds the decision back in as a [`TickInput`].
//!
//! [`TickInput`]: super::tick::TickInput

use super::state::GameState;

/// Ticks of warning before contact that trigger a jump
const LOOKAHEAD_TICKS: f32 = 8.0;

/// Minimum lead in pixels, so slow starts still react
const MIN_LEAD: f32 = 24.0;

/// Should the player jump this tick?
pub fn wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    if !player.grounded {
        return false;
    }

    let front = player.rect.right();
    let back = player.rect.pos.x;
    let lead = (state.effective_speed() * LOOKAHEAD_TICKS).max(MIN_LEAD);
    let in_window = |x: f32, right: f32| right > back && x - front <= lead;

    // The dino plows through everything
    let hazard_ahead = !player.transformed
        && state
            .obstacles
            .iter()
            .any(|o| in_window(o.body.rect.pos.x, o.body.rect.right()));

    // Gems entirely above the player's head need a jump to reach
    let head = player.rect.pos.y;
    let gem_overhead = state.collectibles.iter().any(|c| {
        c.body.rect.bottom() - state.tuning.hitbox_padding <= head
            && in_window(c.body.rect.pos.x, c.body.rect.right())
    });

    hazard_ahead || gem_overhead
}
