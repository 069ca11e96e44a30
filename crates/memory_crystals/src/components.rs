//! Static geometry, pickups and projectiles
//!
//! These are plain data with a liveness flag and a bounds query; the
//! collision system does all of the interesting work with them.

use lumen_engine::foundation::math::Vec2;
use lumen_engine::foundation::time::Countdown;
use lumen_engine::physics::{Aabb, DiagonalSegment};

/// One-way platform: can be landed on from above, passed through otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Surface rectangle
    pub bounds: Aabb,
}

impl Platform {
    /// Create a platform from its top-left corner and extent
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { bounds: Aabb::from_xywh(x, y, width, height) }
    }
}

/// Fully solid block: pushes bodies out on every side
#[derive(Debug, Clone, PartialEq)]
pub struct SolidBlock {
    /// Block rectangle
    pub bounds: Aabb,
}

impl SolidBlock {
    /// Create a block from its top-left corner and extent
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { bounds: Aabb::from_xywh(x, y, width, height) }
    }
}

/// Sloped walkable surface
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalPlatform {
    /// Surface line
    pub segment: DiagonalSegment,
}

impl DiagonalPlatform {
    /// Create a slope between two points
    pub const fn new(start: [f32; 2], end: [f32; 2]) -> Self {
        Self { segment: DiagonalSegment::new(start, end) }
    }
}

/// Collectible experience orb
#[derive(Debug, Clone, PartialEq)]
pub struct ExperiencePickup {
    /// Top-left corner
    pub position: Vec2,
    /// Extent
    pub size: Vec2,
    /// Experience granted on collection
    pub value: u32,
    /// Liveness flag; cleared on collection
    pub active: bool,
    /// Seconds since spawn (drives the idle bob)
    pub age: f32,
}

impl ExperiencePickup {
    /// Orb edge length
    pub const SIZE: f32 = 12.0;

    /// Spawn an orb centered on `center`
    pub fn centered_at(center: Vec2, value: u32) -> Self {
        let half = Self::SIZE * 0.5;
        Self {
            position: Vec2::new(center.x - half, center.y - half),
            size: Vec2::new(Self::SIZE, Self::SIZE),
            value,
            active: true,
            age: 0.0,
        }
    }

    /// Current bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Advance the idle animation
    pub fn update(&mut self, delta_time: f32) {
        self.age += delta_time;
    }

    /// Collect the orb, returning its value.
    ///
    /// A second collection yields nothing.
    pub fn collect(&mut self) -> u32 {
        if !self.active {
            return 0;
        }
        self.active = false;
        self.value
    }
}

/// Player-fired projectile moving at constant velocity
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Top-left corner
    pub position: Vec2,
    /// Extent
    pub size: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Damage dealt to the first enemy hit
    pub damage: i32,
    /// Remaining flight time
    pub lifetime: Countdown,
    /// Liveness flag
    pub active: bool,
}

impl Projectile {
    /// Fire a projectile from `origin` (its center)
    pub fn new(origin: Vec2, velocity: Vec2, damage: i32, lifetime: f32) -> Self {
        let size = Vec2::new(10.0, 6.0);
        Self {
            position: origin - size * 0.5,
            size,
            velocity,
            damage,
            lifetime: Countdown::started(lifetime),
            active: true,
        }
    }

    /// Current bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    /// Move and age the projectile; it expires when its lifetime runs out
    pub fn update(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }
        self.position += self.velocity * delta_time;
        if self.lifetime.tick(delta_time) {
            self.active = false;
        }
    }
}
