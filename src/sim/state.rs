//! Game state and core simulation types
//!
//! Screen-space pixels throughout: origin at the top-left, y grows downward.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::tuning::Tuning;

/// Visible playfield dimensions (tracks the viewport)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A scrolling entity: rectangle plus a lazy-removal flag
///
/// The flag can be set but never cleared; marked bodies are purged at the end
/// of the tick that marked them.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub rect: Rect,
    marked: bool,
}

impl Body {
    pub fn new(rect: Rect) -> Self {
        Self { rect, marked: false }
    }

    #[inline]
    pub fn mark_for_deletion(&mut self) {
        self.marked = true;
    }

    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Scroll left; mark once the right edge has left the field
    pub fn scroll(&mut self, speed: f32) {
        self.rect.pos.x -= speed;
        if self.rect.right() < 0.0 {
            self.mark_for_deletion();
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Rock,
    Cone,
    /// Hazard for the bus, snack for the dino
    Pedestrian,
}

impl ObstacleKind {
    pub fn is_pedestrian(self) -> bool {
        self == ObstacleKind::Pedestrian
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub body: Body,
    pub kind: ObstacleKind,
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    /// Power-up gem (transforms the bus)
    Gem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub body: Body,
    pub kind: CollectibleKind,
}

/// Particle colour tags (one per collision outcome)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spark {
    /// Bus hits a rock/cone
    Crash,
    /// Dino smashes a rock/cone
    Smash,
    /// Bus brushes a pedestrian
    Honk,
    /// Dino eats a pedestrian
    Eat,
    /// Gem pickup
    Gem,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub body: Body,
    pub vel: Vec2,
    pub spark: Spark,
    /// 0-1, decreases every tick
    pub life: f32,
}

impl Particle {
    pub fn update(&mut self, decay: f32) {
        self.body.rect.pos += self.vel;
        self.life -= decay;
        if self.life <= 0.0 {
            self.body.mark_for_deletion();
        }
    }
}

/// The player: a school bus that can become a dinosaur
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Current hitbox (size changes with the transformation)
    pub rect: Rect,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub grounded: bool,
    /// Dino mode
    pub transformed: bool,
    /// Ticks left in dino mode (> 0 only while transformed)
    pub transform_ticks: u32,
}

impl Player {
    /// Grounded bus at the given ground line
    pub fn new(tuning: &Tuning, ground_line: f32) -> Self {
        let (w, h) = tuning.bus_size;
        Self {
            rect: Rect::new(tuning.player_x, ground_line - h, w, h),
            vy: 0.0,
            grounded: true,
            transformed: false,
            transform_ticks: 0,
        }
    }

    /// Start a jump if standing on the ground. Returns whether it took effect.
    pub fn try_jump(&mut self, jump_velocity: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vy = jump_velocity;
        self.grounded = false;
        true
    }

    /// Apply gravity and resolve ground contact
    pub fn integrate(&mut self, gravity: f32, ground_line: f32) {
        self.vy += gravity;
        self.rect.pos.y += self.vy;

        let rest_y = ground_line - self.rect.size.y;
        if self.rect.pos.y >= rest_y {
            self.rect.pos.y = rest_y;
            self.vy = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Enter dino mode or refresh its timer.
    ///
    /// Returns true when this call performed the transformation (bus → dino);
    /// a refresh only resets the timer.
    pub fn power_up(&mut self, tuning: &Tuning) -> bool {
        let first = !self.transformed;
        if first {
            let (w, h) = tuning.dino_size;
            self.transformed = true;
            self.rect.size = Vec2::new(w, h);
            self.rect.pos.y -= tuning.transform_lift();
        }
        self.transform_ticks = tuning.dino_duration;
        first
    }

    /// Count down dino mode. Returns true on the tick it expires.
    pub fn tick_transform(&mut self, tuning: &Tuning, ground_line: f32) -> bool {
        if !self.transformed {
            return false;
        }
        self.transform_ticks = self.transform_ticks.saturating_sub(1);
        if self.transform_ticks > 0 {
            return false;
        }

        let (w, h) = tuning.bus_size;
        self.transformed = false;
        self.rect.size = Vec2::new(w, h);
        // Keep the smaller hitbox flush with the ground
        self.rect.pos.y = ground_line - h;
        true
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub field: Field,
    /// Run seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub ticks: u64,
    pub score: u64,
    /// Base scroll speed (grows every tick)
    pub speed: f32,
    pub player: Player,
    /// Rocks, cones and pedestrians
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
}

impl GameState {
    /// Fresh run with the given seed
    pub fn new(tuning: Tuning, field: Field, seed: u64) -> Self {
        let ground_line = field.height - tuning.ground_height;
        let player = Player::new(&tuning, ground_line);
        let speed = tuning.start_speed;
        Self {
            tuning,
            field,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
            score: 0,
            speed,
            player,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// Top of the ground band
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.field.height - self.tuning.ground_height
    }

    /// Scroll speed including the dino bonus
    #[inline]
    pub fn effective_speed(&self) -> f32 {
        if self.player.transformed {
            self.speed + self.tuning.dino_speed_bonus
        } else {
            self.speed
        }
    }

    /// Viewport changed; keep the player above the ground
    pub fn resize(&mut self, field: Field) {
        self.field = field;
        let ground_line = self.ground_line();
        if self.player.rect.bottom() > ground_line {
            self.player.rect.pos.y = ground_line - self.player.rect.size.y;
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            field: self.field,
            ground_line: self.ground_line(),
            ticks: self.ticks,
            score: self.score,
            player: &self.player,
            obstacles: &self.obstacles,
            collectibles: &self.collectibles,
            particles: &self.particles,
        }
    }
}

/// Immutable per-frame view handed from the simulation to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub field: Field,
    pub ground_line: f32,
    pub ticks: u64,
    pub score: u64,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub particles: &'a [Particle],
}
