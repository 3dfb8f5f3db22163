use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// Used both for world bounds and as the collision shape of every body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn left(&self) -> f32 { self.x }

    #[inline]
    pub fn right(&self) -> f32 { self.x + self.width }

    #[inline]
    pub fn top(&self) -> f32 { self.y }

    #[inline]
    pub fn bottom(&self) -> f32 { self.y + self.height }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Penetration depth on each axis. A component `<= 0` means the
    /// rectangles are apart (or only touching) on that axis.
    #[inline]
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        Vec2::new(
            self.right().min(other.right()) - self.left().max(other.left()),
            self.bottom().min(other.bottom()) - self.top().max(other.top()),
        )
    }

    /// True when the rectangles share a region of positive area.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let o = self.overlap(other);
        o.x > 0.0 && o.y > 0.0
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}
