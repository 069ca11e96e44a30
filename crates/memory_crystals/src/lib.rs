//! # Memory Crystals
//!
//! Collision and combat core of a side-scrolling action platformer.
//!
//! Each frame the [`World`](world::World) steps its entities and hands them to
//! the [`CollisionSystem`](collision_system::CollisionSystem), which resolves
//! attacks, pickups, contact damage, landings and wall turns in a fixed
//! order. Everything with presentation value (freeze-frames, camera shake,
//! sparks, combo and MP) is pushed into an explicitly owned
//! [`Feedback`](effects::Feedback) bundle rather than global state.
//!
//! ```rust
//! use memory_crystals::prelude::*;
//!
//! let mut world = World::new(GameConfig::default(), 7);
//! world.load_level(&LevelData::demo()).unwrap();
//! world.update(1.0 / 60.0, &PlayerInput::default());
//! assert_eq!(world.frame(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod chain_reaction;
pub mod collision_system;
pub mod components;
pub mod config;
pub mod crystal;
pub mod effects;
pub mod enemy;
pub mod level;
pub mod player;
pub mod world;

#[cfg(test)]
mod tests;

/// Common imports for game users
pub mod prelude {
    pub use crate::{
        chain_reaction::ChainReactionManager,
        collision_system::{CollisionReport, CollisionSystem},
        components::{DiagonalPlatform, ExperiencePickup, Platform, Projectile, SolidBlock},
        config::GameConfig,
        crystal::{CrystalId, CrystalKind, MemoryCrystal},
        effects::{Feedback, FeedbackEvent, HitTier},
        enemy::{Enemy, EnemyKind, Movement},
        level::{LevelData, LevelError},
        player::{Player, PlayerInput},
        world::{Scene, World},
    };
}
