//! Physics module for 2D collision detection and response
//!
//! Axis-aligned rectangles plus one sloped-surface special case. There is no
//! broad phase; callers iterate the handful of collections they own.

pub mod bounds;
pub mod collision;

pub use bounds::{Aabb, Rect};
pub use collision::{
    boxes_overlap,
    diagonal_platform_collision,
    resolve_collision,
    resolve_horizontal,
    would_collide_horizontally,
    Axis,
    DiagonalHit,
    DiagonalSegment,
    Resolution,
};
