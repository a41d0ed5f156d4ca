//! Axis-aligned collision detection
//!
//! Every entity is a screen-space rectangle (top-left origin, y grows down).
//! Hitboxes are forgiving: both boxes shrink inward by a padding before the
//! overlap test, so grazing contacts don't count.

use glam::Vec2;

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (always positive)
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Rectangle shrunk inward by `padding` on all four sides
    #[inline]
    pub fn inset(&self, padding: f32) -> Rect {
        Rect {
            pos: self.pos + Vec2::splat(padding),
            size: self.size - Vec2::splat(2.0 * padding),
        }
    }

    /// Strict overlap (touching edges don't count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    /// Overlap after shrinking both boxes by `padding`
    #[inline]
    pub fn overlaps_padded(&self, other: &Rect, padding: f32) -> bool {
        self.inset(padding).overlaps(&other.inset(padding))
    }
}

/// Padded overlap test between two rectangles
#[inline]
pub fn check_collision(a: &Rect, b: &Rect, padding: f32) -> bool {
    a.overlaps_padded(b, padding)
}
