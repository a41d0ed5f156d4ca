//! Scene composition
//!
//! Turns a simulation [`Snapshot`] into an ordered list of [`DrawCmd`]s in
//! screen pixels. Painter's order: sky, clouds, ground, player, obstacles,
//! gems, particles.

use glam::Vec2;

use super::vertex::colors;
use crate::sim::{CollectibleKind, ObstacleKind, Rect, Snapshot, Spark};

/// Vector figures drawn inside a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Bus,
    /// Faces left unless mirrored
    Dino,
    Rock,
    Cone,
    Person,
    Gem,
}

/// One drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: [f32; 4],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Stroked circle
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: [f32; 4],
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    Glyph {
        glyph: Glyph,
        rect: Rect,
        mirrored: bool,
        alpha: f32,
    },
}

/// Presentation switches taken from the player's settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub particles: bool,
    pub reduced_motion: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            particles: true,
            reduced_motion: false,
        }
    }
}

impl From<&crate::settings::Settings> for SceneOptions {
    fn from(settings: &crate::settings::Settings) -> Self {
        Self {
            particles: settings.particles,
            reduced_motion: settings.reduced_motion,
        }
    }
}

/// Dino starts blinking when this many ticks remain
const EXPIRY_WARNING_TICKS: u32 = 120;

/// (x, y, radius) of the two cloud clusters and their parallax factor
const CLOUDS: [(&[(f32, f32, f32)], f32); 2] = [
    (&[(100.0, 80.0, 30.0), (140.0, 80.0, 40.0), (180.0, 80.0, 30.0)], 1.0),
    (&[(500.0, 120.0, 25.0), (540.0, 110.0, 35.0)], 0.8),
];

pub fn spark_color(spark: Spark) -> [f32; 4] {
    match spark {
        Spark::Crash => colors::SPARK_CRASH,
        Spark::Smash => colors::SPARK_SMASH,
        Spark::Honk => colors::SPARK_HONK,
        Spark::Eat => colors::SPARK_EAT,
        Spark::Gem => colors::SPARK_GEM,
    }
}

fn obstacle_glyph(kind: ObstacleKind) -> Glyph {
    match kind {
        ObstacleKind::Rock => Glyph::Rock,
        ObstacleKind::Cone => Glyph::Cone,
        ObstacleKind::Pedestrian => Glyph::Person,
    }
}

fn collectible_glyph(kind: CollectibleKind) -> Glyph {
    match kind {
        CollectibleKind::Gem => Glyph::Gem,
    }
}

/// Build the draw list for one frame
pub fn build_scene(snap: &Snapshot<'_>, opts: &SceneOptions) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(
        16 + snap.obstacles.len() + snap.collectibles.len() + snap.particles.len(),
    );
    let (width, height) = (snap.field.width, snap.field.height);
    let t = if opts.reduced_motion { 0.0 } else { snap.ticks as f32 };

    // Sky
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(0.0, 0.0, width, height),
        color: colors::SKY,
    });

    // Clouds drift at half a pixel per tick and wrap around the field
    let drift = t * 0.5;
    for (puffs, parallax) in CLOUDS {
        for &(x, y, radius) in puffs {
            let cx = (x - drift * parallax).rem_euclid(width.max(1.0));
            cmds.push(DrawCmd::Circle {
                center: Vec2::new(cx, y),
                radius,
                color: colors::CLOUD,
            });
        }
    }

    // Ground band: grass strip then dirt
    let grass = crate::consts::GRASS_HEIGHT.min(height - snap.ground_line).max(0.0);
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(0.0, snap.ground_line, width, grass),
        color: colors::GRASS,
    });
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(
            0.0,
            snap.ground_line + grass,
            width,
            (height - snap.ground_line - grass).max(0.0),
        ),
        color: colors::GROUND,
    });

    push_player(&mut cmds, snap, t, opts);

    for obstacle in snap.obstacles {
        cmds.push(DrawCmd::Glyph {
            glyph: obstacle_glyph(obstacle.kind),
            rect: obstacle.body.rect,
            mirrored: false,
            alpha: 1.0,
        });
    }

    let bob = (t * 0.1).sin() * 5.0;
    for collectible in snap.collectibles {
        let mut rect = collectible.body.rect;
        rect.pos.y += bob;
        cmds.push(DrawCmd::Glyph {
            glyph: collectible_glyph(collectible.kind),
            rect,
            mirrored: false,
            alpha: 1.0,
        });
    }

    if opts.particles {
        for particle in snap.particles {
            let mut color = spark_color(particle.spark);
            color[3] = particle.life.clamp(0.0, 1.0);
            cmds.push(DrawCmd::Rect {
                rect: particle.body.rect,
                color,
            });
        }
    }

    cmds
}

fn push_player(cmds: &mut Vec<DrawCmd>, snap: &Snapshot<'_>, t: f32, opts: &SceneOptions) {
    let player = snap.player;
    let rect = player.rect;

    if !player.transformed {
        cmds.push(DrawCmd::Glyph {
            glyph: Glyph::Bus,
            rect,
            mirrored: false,
            alpha: 1.0,
        });
        return;
    }

    let remaining = player.transform_ticks;
    let blinking = !opts.reduced_motion
        && remaining < EXPIRY_WARNING_TICKS
        && (remaining / 10) % 2 == 0;
    cmds.push(DrawCmd::Glyph {
        glyph: Glyph::Dino,
        rect,
        mirrored: true,
        alpha: if blinking { 0.5 } else { 1.0 },
    });

    // Rage aura
    cmds.push(DrawCmd::Ring {
        center: rect.center(),
        radius: rect.size.x / 1.2 + (t * 0.2).sin() * 5.0,
        width: 2.0,
        color: colors::RAGE_RING,
    });

    // Speed lines trailing behind
    for dy in [10.0, 40.0] {
        let y = rect.pos.y + dy;
        cmds.push(DrawCmd::Line {
            from: Vec2::new(rect.pos.x - 20.0, y),
            to: Vec2::new(rect.pos.x - 50.0, y),
            width: 2.0,
            color: colors::SPEED_LINE,
        });
    }
}
