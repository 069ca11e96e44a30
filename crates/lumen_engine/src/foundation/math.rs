//! Math utilities and types
//!
//! Provides the 2D math types used by gameplay code.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Direction sign of a value: `1.0`, `-1.0`, or `0.0` for zero
///
/// Unlike [`f32::signum`] this treats `0.0` and `-0.0` as having no direction.
pub fn direction_of(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Move `value` toward zero by `amount` without crossing it
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}
