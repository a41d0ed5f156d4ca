//! Shape generation for 2D primitives
//!
//! Everything is tessellated into a flat triangle list in screen pixels.
//! Glyphs are small vector figures authored in a unit square and stretched
//! over their target rectangle.

use glam::Vec2;
use std::f32::consts::PI;

use super::scene::{DrawCmd, Glyph};
use super::vertex::{Vertex, colors, faded};
use crate::sim::Rect;

/// Segments used for circles, ellipses and rings
pub const CIRCLE_SEGMENTS: u32 = 24;

/// Tessellate a draw list, preserving painter's order
pub fn tessellate(cmds: &[DrawCmd]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(cmds.len() * 48);
    for cmd in cmds {
        match *cmd {
            DrawCmd::Rect { rect, color } => push_rect(&mut out, rect, color),
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => push_ellipse(&mut out, center, Vec2::splat(radius), color, CIRCLE_SEGMENTS),
            DrawCmd::Ring {
                center,
                radius,
                width,
                color,
            } => push_ring(
                &mut out,
                center,
                (radius - width * 0.5).max(0.0),
                radius + width * 0.5,
                color,
                CIRCLE_SEGMENTS,
            ),
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => push_line(&mut out, from, to, width, color),
            DrawCmd::Glyph {
                glyph,
                rect,
                mirrored,
                alpha,
            } => push_glyph(&mut out, glyph, rect, mirrored, alpha),
        }
    }
    out
}

/// Axis-aligned filled rectangle (two triangles)
pub fn push_rect(out: &mut Vec<Vertex>, rect: Rect, color: [f32; 4]) {
    let (x0, y0) = (rect.pos.x, rect.pos.y);
    let (x1, y1) = (rect.right(), rect.bottom());

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

pub fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled ellipse as a triangle fan; equal radii give a circle
pub fn push_ellipse(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radii: Vec2,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }
}

/// Hollow circle between two radii
pub fn push_ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let at = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = at(inner_radius, theta1);
        let outer1 = at(outer_radius, theta1);
        let inner2 = at(inner_radius, theta2);
        let outer2 = at(outer_radius, theta2);

        push_triangle(out, inner1, outer1, inner2, color);
        push_triangle(out, inner2, outer1, outer2, color);
    }
}

/// Thick line segment as a quad
pub fn push_line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    push_triangle(out, a1, b1, a2, color);
    push_triangle(out, a2, b1, b2, color);
}

// === Glyphs ===

/// Piece of a glyph in unit coordinates (0..1 across the target rect)
#[derive(Debug, Clone, Copy)]
enum Part {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: [f32; 4],
    },
    /// Radii relative to the rect's width and height
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        color: [f32; 4],
    },
    /// Radius relative to the rect's shorter side so circles stay round
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        color: [f32; 4],
    },
    Tri {
        a: (f32, f32),
        b: (f32, f32),
        c: (f32, f32),
        color: [f32; 4],
    },
}

const fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Part {
    Part::Rect { x, y, w, h, color }
}

const fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, color: [f32; 4]) -> Part {
    Part::Ellipse {
        cx,
        cy,
        rx,
        ry,
        color,
    }
}

const fn circle(cx: f32, cy: f32, r: f32, color: [f32; 4]) -> Part {
    Part::Circle { cx, cy, r, color }
}

const fn tri(a: (f32, f32), b: (f32, f32), c: (f32, f32), color: [f32; 4]) -> Part {
    Part::Tri { a, b, c, color }
}

const BUS: &[Part] = &[
    rect(0.0, 0.1, 1.0, 0.7, colors::BUS_BODY),
    rect(0.0, 0.52, 1.0, 0.06, colors::BUS_STRIPE),
    rect(0.08, 0.2, 0.18, 0.22, colors::WINDOW),
    rect(0.32, 0.2, 0.18, 0.22, colors::WINDOW),
    rect(0.56, 0.2, 0.18, 0.22, colors::WINDOW),
    rect(0.8, 0.2, 0.16, 0.26, colors::WINDOW),
    rect(0.93, 0.6, 0.07, 0.1, colors::HEADLIGHT),
    circle(0.22, 0.8, 0.18, colors::TIRE),
    circle(0.78, 0.8, 0.18, colors::TIRE),
    circle(0.22, 0.8, 0.08, colors::HUB),
    circle(0.78, 0.8, 0.08, colors::HUB),
];

const DINO: &[Part] = &[
    tri((0.8, 0.45), (1.0, 0.75), (0.75, 0.72), colors::DINO_BODY),
    ellipse(0.55, 0.58, 0.32, 0.26, colors::DINO_BODY),
    ellipse(0.5, 0.66, 0.18, 0.14, colors::DINO_BELLY),
    rect(0.3, 0.3, 0.2, 0.2, colors::DINO_BODY),
    rect(0.05, 0.08, 0.42, 0.3, colors::DINO_BODY),
    rect(0.36, 0.78, 0.12, 0.22, colors::DINO_BODY),
    rect(0.6, 0.78, 0.12, 0.22, colors::DINO_BODY),
    circle(0.3, 0.18, 0.07, colors::EYE),
    circle(0.28, 0.18, 0.035, colors::PUPIL),
    tri((0.08, 0.38), (0.14, 0.38), (0.11, 0.45), colors::TOOTH),
    tri((0.17, 0.38), (0.23, 0.38), (0.2, 0.45), colors::TOOTH),
    tri((0.26, 0.38), (0.32, 0.38), (0.29, 0.45), colors::TOOTH),
];

const ROCK: &[Part] = &[
    ellipse(0.5, 0.6, 0.5, 0.4, colors::ROCK),
    ellipse(0.38, 0.45, 0.15, 0.1, colors::ROCK_LIGHT),
];

const CONE: &[Part] = &[
    tri((0.5, 0.0), (0.9, 0.85), (0.1, 0.85), colors::CONE),
    rect(0.31, 0.45, 0.38, 0.12, colors::CONE_STRIPE),
    rect(0.0, 0.85, 1.0, 0.15, colors::CONE_BASE),
];

const PERSON: &[Part] = &[
    rect(0.2, 0.68, 0.25, 0.32, colors::TROUSERS),
    rect(0.55, 0.68, 0.25, 0.32, colors::TROUSERS),
    rect(0.15, 0.34, 0.7, 0.36, colors::SHIRT),
    circle(0.5, 0.2, 0.2, colors::SKIN),
];

const GEM: &[Part] = &[
    tri((0.5, 0.0), (1.0, 0.4), (0.0, 0.4), colors::GEM_LIGHT),
    tri((0.0, 0.4), (1.0, 0.4), (0.5, 1.0), colors::GEM),
    circle(0.35, 0.25, 0.06, colors::GEM_GLINT),
];

fn parts(glyph: Glyph) -> &'static [Part] {
    match glyph {
        Glyph::Bus => BUS,
        Glyph::Dino => DINO,
        Glyph::Rock => ROCK,
        Glyph::Cone => CONE,
        Glyph::Person => PERSON,
        Glyph::Gem => GEM,
    }
}

/// Stretch a glyph over `rect`, optionally flipped horizontally
pub fn push_glyph(out: &mut Vec<Vertex>, glyph: Glyph, rect: Rect, mirrored: bool, alpha: f32) {
    let map = |u: f32, v: f32| {
        let u = if mirrored { 1.0 - u } else { u };
        rect.pos + Vec2::new(u, v) * rect.size
    };
    let short_side = rect.size.x.min(rect.size.y);

    for part in parts(glyph) {
        match *part {
            Part::Rect { x, y, w, h, color } => {
                // Mirroring moves the left edge to 1 - (x + w)
                let left = if mirrored { 1.0 - x - w } else { x };
                let r = Rect::new(
                    rect.pos.x + left * rect.size.x,
                    rect.pos.y + y * rect.size.y,
                    w * rect.size.x,
                    h * rect.size.y,
                );
                push_rect(out, r, faded(color, alpha));
            }
            Part::Ellipse {
                cx,
                cy,
                rx,
                ry,
                color,
            } => push_ellipse(
                out,
                map(cx, cy),
                Vec2::new(rx, ry) * rect.size,
                faded(color, alpha),
                CIRCLE_SEGMENTS,
            ),
            Part::Circle { cx, cy, r, color } => push_ellipse(
                out,
                map(cx, cy),
                Vec2::splat(r * short_side),
                faded(color, alpha),
                CIRCLE_SEGMENTS,
            ),
            Part::Tri { a, b, c, color } => push_triangle(
                out,
                map(a.0, a.1),
                map(b.0, b.1),
                map(c.0, c.1),
                faded(color, alpha),
            ),
        }
    }
}
