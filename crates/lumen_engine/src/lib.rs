//! # Lumen Engine
//!
//! A small, deterministic 2D foundation for frame-stepped action games.
//!
//! ## Features
//!
//! - **Canonical bounds**: one axis-aligned rectangle type with strict overlap rules
//! - **Narrow-phase helpers**: predictive checks, sloped surfaces, push-out resolution
//! - **Deferred events**: a simulation-clock event queue instead of host timers
//! - **Configuration**: TOML/RON loading for any serde type
//!
//! ## Quick Start
//!
//! ```rust
//! use lumen_engine::prelude::*;
//!
//! let wall = Aabb::from_xywh(100.0, 0.0, 20.0, 100.0);
//! let walker = Aabb::from_xywh(78.0, 50.0, 20.0, 20.0);
//!
//! assert!(!boxes_overlap(&walker, &wall));
//! assert!(would_collide_horizontally(82.0, 50.0, 20.0, 20.0, &wall));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod physics;
pub mod events;
pub mod config;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        events::EventQueue,
        foundation::{
            math::{Vec2, Point2},
            time::{Countdown, FrameTimer},
        },
        physics::{
            bounds::{Aabb, Rect},
            collision::{
                boxes_overlap, diagonal_platform_collision, resolve_collision,
                would_collide_horizontally, Axis, DiagonalHit, DiagonalSegment,
            },
        },
    };
}
