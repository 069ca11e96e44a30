//! Narrow-phase collision helpers for 2D action games
//!
//! Every test here is re-derived from current bounds; nothing is cached.
//! All rectangle inputs are expected to be normalized [`Aabb`]s.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{lerp, Vec2};
use crate::physics::bounds::Aabb;

/// Strict axis-aligned overlap test.
///
/// Touching edges (zero-area intersection) do not count. This is what lets a
/// body rest exactly on a platform without being reported as overlapping it.
pub fn boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.right > b.left && a.left < b.right && a.bottom > b.top && a.top < b.bottom
}

/// Predict whether a body moved to `next_x` would overlap `obstacle`.
///
/// Nothing is mutated; callers use this to turn around one frame before
/// penetrating a wall.
pub fn would_collide_horizontally(next_x: f32, y: f32, width: f32, height: f32, obstacle: &Aabb) -> bool {
    let next = Aabb::from_xywh(next_x, y, width, height);
    boxes_overlap(&next, obstacle)
}

/// A walkable line segment with a slope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagonalSegment {
    /// First endpoint
    pub start: [f32; 2],
    /// Second endpoint
    pub end: [f32; 2],
}

impl DiagonalSegment {
    /// Create a segment between two points
    pub const fn new(start: [f32; 2], end: [f32; 2]) -> Self {
        Self { start, end }
    }

    /// Leftmost x covered by the segment
    pub fn left(&self) -> f32 {
        self.start[0].min(self.end[0])
    }

    /// Rightmost x covered by the segment
    pub fn right(&self) -> f32 {
        self.start[0].max(self.end[0])
    }

    /// Horizontal span length
    pub fn span(&self) -> f32 {
        self.right() - self.left()
    }

    /// Surface height at `x`, clamped to the segment's span.
    ///
    /// Returns `None` for a vertical segment, which has no walkable surface.
    pub fn surface_y_at(&self, x: f32) -> Option<f32> {
        let dx = self.end[0] - self.start[0];
        if dx.abs() <= f32::EPSILON {
            return None;
        }
        let t = ((x - self.start[0]) / dx).clamp(0.0, 1.0);
        Some(lerp(self.start[1], self.end[1], t))
    }
}

/// Result of sampling a diagonal surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagonalHit {
    /// Interpolated surface height at the body's horizontal center
    pub surface_y: f32,
}

/// Probe a sloped platform with a body's horizontal span.
///
/// Returns the surface height at the body's horizontal center when the spans
/// overlap, `None` otherwise.
pub fn diagonal_platform_collision(
    x: f32,
    _y: f32,
    width: f32,
    _height: f32,
    platform: &DiagonalSegment,
) -> Option<DiagonalHit> {
    let body_left = x.min(x + width);
    let body_right = x.max(x + width);
    if body_right <= platform.left() || body_left >= platform.right() {
        return None;
    }
    let center_x = (body_left + body_right) * 0.5;
    platform
        .surface_y_at(center_x)
        .map(|surface_y| DiagonalHit { surface_y })
}

/// Axis along which a push-out happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Pushed left or right
    Horizontal,
    /// Pushed up or down
    Vertical,
}

/// Minimum translation that separates a mover from an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Offset to add to the mover's position
    pub offset: Vec2,
    /// Axis the offset lies on
    pub axis: Axis,
}

impl Resolution {
    /// Mover was pushed upward, i.e. it is standing on the obstacle
    pub fn is_landing(&self) -> bool {
        self.axis == Axis::Vertical && self.offset.y < 0.0
    }

    /// Mover was pushed downward, i.e. it hit the obstacle's underside
    pub fn is_ceiling(&self) -> bool {
        self.axis == Axis::Vertical && self.offset.y > 0.0
    }
}

/// Compute the push-out of `mover` from `obstacle` along the axis of least
/// penetration.
///
/// Only one axis is ever moved. Ties resolve vertically so a body sliding
/// into a corner lands rather than snagging. Returns `None` when the boxes do
/// not strictly overlap.
pub fn resolve_collision(mover: &Aabb, obstacle: &Aabb) -> Option<Resolution> {
    if !boxes_overlap(mover, obstacle) {
        return None;
    }

    let push_left = mover.right - obstacle.left;
    let push_right = obstacle.right - mover.left;
    let push_up = mover.bottom - obstacle.top;
    let push_down = obstacle.bottom - mover.top;

    let overlap_x = push_left.min(push_right);
    let overlap_y = push_up.min(push_down);

    let resolution = if overlap_x < overlap_y {
        let dx = if push_left < push_right { -push_left } else { push_right };
        Resolution { offset: Vec2::new(dx, 0.0), axis: Axis::Horizontal }
    } else {
        let dy = if push_up <= push_down { -push_up } else { push_down };
        Resolution { offset: Vec2::new(0.0, dy), axis: Axis::Vertical }
    };
    Some(resolution)
}

/// Horizontal offset that moves `mover` out of `obstacle` through the nearer
/// side wall, or `None` when they do not strictly overlap.
///
/// For bodies that must never be lifted onto or pushed under a block, such as
/// a patrolling enemy thrown sideways.
pub fn resolve_horizontal(mover: &Aabb, obstacle: &Aabb) -> Option<f32> {
    if !boxes_overlap(mover, obstacle) {
        return None;
    }
    let push_left = mover.right - obstacle.left;
    let push_right = obstacle.right - mover.left;
    Some(if push_left <= push_right { -push_left } else { push_right })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            (Aabb::from_xywh(0.0, 0.0, 10.0, 10.0), Aabb::from_xywh(5.0, 5.0, 10.0, 10.0)),
            (Aabb::from_xywh(0.0, 0.0, 10.0, 10.0), Aabb::from_xywh(10.0, 0.0, 10.0, 10.0)),
            (Aabb::from_xywh(0.0, 0.0, 10.0, 10.0), Aabb::from_xywh(50.0, 50.0, 1.0, 1.0)),
            (Aabb::from_xywh(-5.0, -5.0, 30.0, 30.0), Aabb::from_xywh(0.0, 0.0, 1.0, 1.0)),
        ];
        for (a, b) in cases {
            assert_eq!(boxes_overlap(&a, &b), boxes_overlap(&b, &a));
        }
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let right_neighbor = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        let below_neighbor = Aabb::from_xywh(0.0, 10.0, 10.0, 10.0);
        let corner_neighbor = Aabb::from_xywh(10.0, 10.0, 10.0, 10.0);
        assert!(!boxes_overlap(&a, &right_neighbor));
        assert!(!boxes_overlap(&a, &below_neighbor));
        assert!(!boxes_overlap(&a, &corner_neighbor));
    }

    #[test]
    fn test_containment_collides() {
        let outer = Aabb::from_xywh(0.0, 0.0, 100.0, 100.0);
        let inner = Aabb::from_xywh(40.0, 40.0, 5.0, 5.0);
        assert!(boxes_overlap(&outer, &inner));
    }

    #[test]
    fn test_would_collide_horizontally_predicts_wall() {
        let wall = Aabb::from_xywh(100.0, 0.0, 20.0, 100.0);
        assert!(!would_collide_horizontally(80.0, 50.0, 20.0, 20.0, &wall));
        assert!(would_collide_horizontally(81.0, 50.0, 20.0, 20.0, &wall));
        // Entirely above the wall
        assert!(!would_collide_horizontally(90.0, -30.0, 20.0, 20.0, &wall));
    }

    #[test]
    fn test_diagonal_surface_at_center() {
        // Ramp rising to the right: y goes from 100 down to 50 over x 0..100
        let ramp = DiagonalSegment::new([0.0, 100.0], [100.0, 50.0]);
        let hit = diagonal_platform_collision(40.0, 0.0, 20.0, 30.0, &ramp).unwrap();
        assert_relative_eq!(hit.surface_y, 75.0);
    }

    #[test]
    fn test_diagonal_endpoint_order_does_not_matter() {
        let forward = DiagonalSegment::new([0.0, 100.0], [100.0, 50.0]);
        let backward = DiagonalSegment::new([100.0, 50.0], [0.0, 100.0]);
        let a = diagonal_platform_collision(10.0, 0.0, 20.0, 30.0, &forward).unwrap();
        let b = diagonal_platform_collision(10.0, 0.0, 20.0, 30.0, &backward).unwrap();
        assert_relative_eq!(a.surface_y, b.surface_y);
    }

    #[test]
    fn test_diagonal_outside_span_misses() {
        let ramp = DiagonalSegment::new([0.0, 100.0], [100.0, 50.0]);
        assert!(diagonal_platform_collision(100.0, 0.0, 20.0, 30.0, &ramp).is_none());
        assert!(diagonal_platform_collision(-20.0, 0.0, 20.0, 30.0, &ramp).is_none());
    }

    #[test]
    fn test_diagonal_partial_span_clamps_to_endpoint() {
        let ramp = DiagonalSegment::new([0.0, 100.0], [100.0, 50.0]);
        // Center at x=105, past the end; surface clamps to the end height
        let hit = diagonal_platform_collision(95.0, 0.0, 20.0, 30.0, &ramp).unwrap();
        assert_relative_eq!(hit.surface_y, 50.0);
    }

    #[test]
    fn test_vertical_segment_has_no_surface() {
        let wall = DiagonalSegment::new([10.0, 0.0], [10.0, 100.0]);
        assert!(wall.surface_y_at(10.0).is_none());
    }

    #[test]
    fn test_resolve_pushes_along_least_penetration() {
        let block = Aabb::from_xywh(0.0, 0.0, 100.0, 100.0);
        // Deep vertically, shallow from the left side
        let mover = Aabb::from_xywh(-8.0, 40.0, 10.0, 20.0);
        let resolution = resolve_collision(&mover, &block).unwrap();
        assert_eq!(resolution.axis, Axis::Horizontal);
        assert_relative_eq!(resolution.offset.x, -2.0);
        assert_relative_eq!(resolution.offset.y, 0.0);
    }

    #[test]
    fn test_resolve_landing_on_top() {
        let block = Aabb::from_xywh(0.0, 100.0, 200.0, 50.0);
        let mover = Aabb::from_xywh(50.0, 70.0, 20.0, 33.0);
        let resolution = resolve_collision(&mover, &block).unwrap();
        assert!(resolution.is_landing());
        assert_relative_eq!(resolution.offset.y, -3.0);
        let resolved = mover.translated(resolution.offset);
        assert!(!boxes_overlap(&resolved, &block));
    }

    #[test]
    fn test_resolve_ceiling_hit() {
        let block = Aabb::from_xywh(0.0, 0.0, 200.0, 50.0);
        let mover = Aabb::from_xywh(50.0, 48.0, 20.0, 30.0);
        let resolution = resolve_collision(&mover, &block).unwrap();
        assert!(resolution.is_ceiling());
        assert_relative_eq!(resolution.offset.y, 2.0);
    }

    #[test]
    fn test_resolve_without_overlap() {
        let block = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let mover = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(resolve_collision(&mover, &block).is_none());
    }

    #[test]
    fn test_resolve_horizontal_ignores_shallow_vertical_overlap() {
        // Barely overlapping vertically, 21 deep from the left
        let wall = Aabb::from_xywh(162.0, 0.0, 40.0, 100.0);
        let mover = Aabb::from_xywh(155.0, 98.0, 28.0, 28.0);
        assert_eq!(resolve_collision(&mover, &wall).map(|r| r.axis), Some(Axis::Vertical));
        assert_relative_eq!(resolve_horizontal(&mover, &wall).unwrap(), -21.0);
        assert!(resolve_horizontal(&mover.translated(Vec2::new(-21.0, 0.0)), &wall).is_none());
    }
}
