//! Axis-aligned bounds
//!
//! [`Aabb`] is the one rectangle representation used by gameplay code. The
//! `{x, y, width, height}` form ([`Rect`]) exists only for collaborators such
//! as renderers and level tables, and converts at that boundary.
//!
//! Screen convention: `y` grows downward, so `top <= bottom`.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Canonical axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Smallest x
    pub left: f32,
    /// Largest x
    pub right: f32,
    /// Smallest y
    pub top: f32,
    /// Largest y
    pub bottom: f32,
}

/// Position/extent rectangle used at collaborator boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Aabb {
    /// Create bounds from edges, normalizing inverted pairs
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }.normalize()
    }

    /// Create bounds from a top-left corner and an extent.
    ///
    /// Negative extents are allowed and normalized away.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, x + width, y, y + height)
    }

    /// Create bounds from a position and a size vector
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::from_xywh(position.x, position.y, size.x, size.y)
    }

    /// Create bounds centered on a point
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::from_xywh(center.x - width * 0.5, center.y - height * 0.5, width, height)
    }

    /// Swap edges so that `left <= right` and `top <= bottom`
    ///
    /// Needed whenever bounds are built from a moving reference point whose
    /// offset sign can flip (e.g. an attack box that extends behind a mirrored
    /// sprite).
    #[must_use]
    pub fn normalize(self) -> Self {
        Self {
            left: self.left.min(self.right),
            right: self.left.max(self.right),
            top: self.top.min(self.bottom),
            bottom: self.top.max(self.bottom),
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// Bounds moved by an offset
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            left: self.left + offset.x,
            right: self.right + offset.x,
            top: self.top + offset.y,
            bottom: self.bottom + offset.y,
        }
    }

    /// Strict overlap test (see [`crate::physics::collision::boxes_overlap`])
    pub fn overlaps(&self, other: &Self) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    /// Whether the horizontal spans overlap with nonzero length
    pub fn overlaps_horizontally(&self, other: &Self) -> bool {
        self.right > other.left && self.left < other.right
    }

    /// Convert to the collaborator-facing representation
    pub fn to_rect(&self) -> Rect {
        Rect {
            x: self.left,
            y: self.top,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl From<Rect> for Aabb {
    fn from(rect: Rect) -> Self {
        Self::from_xywh(rect.x, rect.y, rect.width, rect.height)
    }
}

impl From<Aabb> for Rect {
    fn from(bounds: Aabb) -> Self {
        bounds.to_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_swaps_inverted_edges() {
        let raw = Aabb { left: 10.0, right: 2.0, top: 8.0, bottom: -4.0 };
        let bounds = raw.normalize();
        assert_relative_eq!(bounds.left, 2.0);
        assert_relative_eq!(bounds.right, 10.0);
        assert_relative_eq!(bounds.top, -4.0);
        assert_relative_eq!(bounds.bottom, 8.0);
    }

    #[test]
    fn test_negative_extent_is_normalized() {
        // Attack box extending to the left of a facing-left player
        let bounds = Aabb::from_xywh(100.0, 50.0, -30.0, 20.0);
        assert_relative_eq!(bounds.left, 70.0);
        assert_relative_eq!(bounds.right, 100.0);
        assert_relative_eq!(bounds.width(), 30.0);
    }

    #[test]
    fn test_rect_round_trip_at_boundary() {
        let rect = Rect { x: 4.0, y: 6.0, width: 10.0, height: 12.0 };
        let bounds = Aabb::from(rect);
        assert_eq!(bounds.to_rect(), rect);
        assert_relative_eq!(bounds.center().x, 9.0);
        assert_relative_eq!(bounds.center().y, 12.0);
    }

    #[test]
    fn test_from_center() {
        let bounds = Aabb::from_center(Vec2::new(0.0, 0.0), 4.0, 2.0);
        assert_relative_eq!(bounds.left, -2.0);
        assert_relative_eq!(bounds.bottom, 1.0);
    }
}
