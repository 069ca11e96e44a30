//! Memory crystals
//!
//! A crystal goes `Idle → Breaking → Removed`. Breaking spawns ballistic
//! shatter pieces and drops one experience orb worth its tier's value. The
//! break routine is guarded so a second call, from a duplicate chain trigger
//! for instance, does nothing and drops nothing.
//!
//! Neighbour scanning is done by [`crate::chain_reaction::ChainReactionManager`],
//! which owns the schedule; the crystal only records whether a chain put it
//! on that schedule.

use std::f32::consts::TAU;

use lumen_engine::foundation::math::Vec2;
use lumen_engine::foundation::time::Countdown;
use lumen_engine::physics::Aabb;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::ExperiencePickup;
use crate::config::CrystalConfig;
use crate::effects::{Feedback, FeedbackEvent};

/// Stable crystal handle, valid across frames and sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrystalId(pub u32);

/// Crystal tiers in ascending value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalKind {
    /// Common blue
    Azure,
    /// Green
    Verdant,
    /// Gold
    Amber,
    /// Rare purple
    Violet,
}

impl CrystalKind {
    /// Every tier, lowest first
    pub const ALL: [Self; 4] = [Self::Azure, Self::Verdant, Self::Amber, Self::Violet];

    /// Experience dropped when broken
    pub const fn experience(self) -> u32 {
        match self {
            Self::Azure => 5,
            Self::Verdant => 10,
            Self::Amber => 20,
            Self::Violet => 50,
        }
    }

    /// Theme color as `0xRRGGBB`
    pub const fn color(self) -> u32 {
        match self {
            Self::Azure => 0x4f_c3_f7,
            Self::Verdant => 0x66_bb_6a,
            Self::Amber => 0xff_b3_00,
            Self::Violet => 0xab_47_bc,
        }
    }
}

/// Crystal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalState {
    /// Waiting to be struck
    Idle,
    /// Shatter animation running
    Breaking,
    /// Finished; swept at the end of the frame
    Removed,
}

/// One falling, spinning fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ShatterPiece {
    /// Center
    pub position: Vec2,
    /// Units/s
    pub velocity: Vec2,
    /// Radians
    pub rotation: f32,
    /// Radians/s
    pub spin: f32,
}

/// Breakable crystal
#[derive(Debug, Clone)]
pub struct MemoryCrystal {
    /// Stable handle
    pub id: CrystalId,
    /// Tier
    pub kind: CrystalKind,
    /// Top-left corner
    pub position: Vec2,
    /// Extent
    pub size: Vec2,
    /// Liveness flag; cleared once the break animation ends
    pub active: bool,
    state: CrystalState,
    triggered_by_chain: bool,
    break_timer: Countdown,
    pieces: Vec<ShatterPiece>,
}

impl MemoryCrystal {
    /// Crystal edge length
    pub const SIZE: f32 = 24.0;

    /// Place an idle crystal with its top-left corner at `position`
    pub fn new(id: CrystalId, kind: CrystalKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            size: Vec2::new(Self::SIZE, Self::SIZE),
            active: true,
            state: CrystalState::Idle,
            triggered_by_chain: false,
            break_timer: Countdown::idle(),
            pieces: Vec::new(),
        }
    }

    /// Current bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    /// Center point, where the orb drops
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Lifecycle stage
    pub const fn state(&self) -> CrystalState {
        self.state
    }

    /// Shatter animation running
    pub fn is_breaking(&self) -> bool {
        self.state == CrystalState::Breaking
    }

    /// Whether a neighbour's chain reaction scheduled this crystal
    pub const fn is_triggered_by_chain(&self) -> bool {
        self.triggered_by_chain
    }

    /// Active and not yet breaking
    pub fn can_break(&self) -> bool {
        self.active && self.state == CrystalState::Idle
    }

    /// Fragments still in flight
    pub fn pieces(&self) -> &[ShatterPiece] {
        &self.pieces
    }

    /// Fragment opacity, fading over the break
    pub fn piece_alpha(&self) -> f32 {
        1.0 - self.break_timer.progress()
    }

    pub(crate) fn mark_chain_triggered(&mut self) {
        self.triggered_by_chain = true;
    }

    /// Shatter the crystal and return its drops.
    ///
    /// Only the first call has any effect. A directly broken crystal may
    /// request a freeze-frame; a chain-triggered one never does.
    pub fn break_crystal(
        &mut self,
        config: &CrystalConfig,
        feedback: &mut Feedback,
        rng: &mut impl Rng,
    ) -> Vec<ExperiencePickup> {
        if !self.can_break() {
            return Vec::new();
        }

        self.state = CrystalState::Breaking;
        self.break_timer.start(config.break_duration);

        let center = self.center();
        self.pieces = (0..config.shatter_pieces)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let speed = config.piece_speed * rng.gen_range(0.5..1.0);
                ShatterPiece {
                    position: center,
                    // Bias upward so fragments arc before falling
                    velocity: Vec2::new(angle.cos() * speed, angle.sin() * speed - config.piece_speed * 0.5),
                    rotation: 0.0,
                    spin: rng.gen_range(-8.0..8.0),
                }
            })
            .collect();

        if !self.triggered_by_chain {
            feedback.hit_pause.request(config.hit_pause);
        }
        feedback.emit(FeedbackEvent::CrystalShattered {
            position: center,
            chained: self.triggered_by_chain,
        });
        log::debug!(
            "Crystal {:?} ({:?}) shattered{}",
            self.id,
            self.kind,
            if self.triggered_by_chain { " by chain" } else { "" }
        );

        vec![ExperiencePickup::centered_at(center, self.kind.experience())]
    }

    /// Animate fragments; retire the crystal when the break finishes
    pub fn update(&mut self, delta_time: f32, config: &CrystalConfig) {
        if self.state != CrystalState::Breaking {
            return;
        }

        for piece in &mut self.pieces {
            piece.velocity.y += config.piece_gravity * delta_time;
            piece.position += piece.velocity * delta_time;
            piece.rotation += piece.spin * delta_time;
        }

        self.break_timer.tick(delta_time);
        if !self.break_timer.is_running() {
            self.state = CrystalState::Removed;
            self.active = false;
            self.pieces.clear();
        }
    }
}
