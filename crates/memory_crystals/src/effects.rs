//! Effect fan-out
//!
//! The combat core never owns feedback state; it pushes requests into the
//! collaborators bundled in [`Feedback`]: freeze-frames, camera shake,
//! particles, the combo counter and the MP economy. A renderer or audio layer
//! drains [`FeedbackEvent`]s once per frame.

use std::collections::HashMap;

use lumen_engine::foundation::math::Vec2;
use lumen_engine::foundation::time::Countdown;
use rand::Rng;

use crate::config::{AbilityConfig, CombatConfig, GameConfig};

/// Global freeze-frame
///
/// While active, the world skips gameplay updates but keeps rendering.
/// Overlapping requests do not stack: the most recent request wins.
#[derive(Debug, Clone, Default)]
pub struct HitPause {
    timer: Countdown,
    requests: u32,
}

impl HitPause {
    /// Request a freeze of `duration` seconds, replacing any pause in progress
    pub fn request(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.timer.start(duration);
        self.requests += 1;
    }

    /// Whether gameplay is currently frozen
    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    /// Remaining freeze time
    pub const fn remaining(&self) -> f32 {
        self.timer.remaining()
    }

    /// Total number of accepted requests this session
    pub const fn request_count(&self) -> u32 {
        self.requests
    }

    /// Advance the freeze timer
    pub fn tick(&mut self, delta_time: f32) {
        self.timer.tick(delta_time);
    }
}

/// Camera shake request holder; the camera itself reads [`CameraShake::intensity`]
#[derive(Debug, Clone, Default)]
pub struct CameraShake {
    strength: f32,
    timer: Countdown,
}

impl CameraShake {
    /// Start a shake, replacing any shake in progress
    pub fn request(&mut self, strength: f32, duration: f32) {
        self.strength = strength;
        self.timer.start(duration);
    }

    /// Current shake amplitude, decaying linearly to zero
    pub fn intensity(&self) -> f32 {
        if self.timer.is_running() {
            self.strength * (1.0 - self.timer.progress())
        } else {
            0.0
        }
    }

    /// Advance the shake
    pub fn tick(&mut self, delta_time: f32) {
        self.timer.tick(delta_time);
    }
}

/// Cosmetic particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Spark at the contact edge of a hit
    HitSpark,
    /// Puff left behind by a dying enemy
    Poof,
}

/// Single cosmetic particle
#[derive(Debug, Clone)]
pub struct Particle {
    /// What it looks like
    pub kind: ParticleKind,
    /// Current position
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Remaining life
    pub life: Countdown,
}

impl Particle {
    /// Opacity in `0.0..=1.0`, fading over the particle's life
    pub fn alpha(&self) -> f32 {
        1.0 - self.life.progress()
    }
}

/// Short-lived particle pool
#[derive(Debug, Clone, Default)]
pub struct Particles {
    particles: Vec<Particle>,
}

impl Particles {
    const SPARK_LIFE: f32 = 0.18;
    const POOF_LIFE: f32 = 0.45;

    /// Scatter sparks at a contact point, biased along `direction` (`±1`)
    pub fn spawn_hit_spark(&mut self, position: Vec2, direction: f32, tier: HitTier, rng: &mut impl Rng) {
        let count = match tier {
            HitTier::Normal => 4,
            HitTier::Combo | HitTier::Charged => 6,
            HitTier::Critical => 10,
        };
        for _ in 0..count {
            let speed = rng.gen_range(80.0..220.0);
            let spread = rng.gen_range(-0.9_f32..0.9);
            let velocity = Vec2::new(direction * speed * spread.cos(), speed * spread.sin());
            self.particles.push(Particle {
                kind: ParticleKind::HitSpark,
                position,
                velocity,
                life: Countdown::started(Self::SPARK_LIFE),
            });
        }
    }

    /// Leave a death puff at `center`
    pub fn spawn_poof(&mut self, center: Vec2) {
        self.particles.push(Particle {
            kind: ParticleKind::Poof,
            position: center,
            velocity: Vec2::new(0.0, -20.0),
            life: Countdown::started(Self::POOF_LIFE),
        });
    }

    /// Move particles and drop expired ones
    pub fn update(&mut self, delta_time: f32) {
        for particle in &mut self.particles {
            particle.position += particle.velocity * delta_time;
            particle.life.tick(delta_time);
        }
        self.particles.retain(|particle| particle.life.is_running());
    }

    /// Live particles
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Number of live particles of a kind
    pub fn count(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|particle| particle.kind == kind).count()
    }
}

/// Consecutive-hit counter with a timeout
#[derive(Debug, Clone)]
pub struct ComboCounter {
    count: u32,
    best: u32,
    window: f32,
    timer: Countdown,
}

impl ComboCounter {
    /// Create a counter that resets after `window` seconds without a hit
    pub fn new(window: f32) -> Self {
        Self {
            count: 0,
            best: 0,
            window,
            timer: Countdown::idle(),
        }
    }

    /// Register a hit, returning the new count
    pub fn increment(&mut self) -> u32 {
        self.count += 1;
        self.best = self.best.max(self.count);
        self.timer.start(self.window);
        self.count
    }

    /// Current count
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Longest combo this session
    pub const fn best(&self) -> u32 {
        self.best
    }

    /// Drop the combo
    pub fn reset(&mut self) {
        self.count = 0;
        self.timer.cancel();
    }

    /// Advance the timeout
    pub fn tick(&mut self, delta_time: f32) {
        if self.timer.tick(delta_time) {
            log::trace!("Combo of {} expired", self.count);
            self.count = 0;
        }
    }
}

/// MP economy with an explicit ability registry
#[derive(Debug, Clone)]
pub struct AbilitySystem {
    mp: u32,
    max_mp: u32,
    registry: HashMap<String, u32>,
}

impl AbilitySystem {
    /// Build from configuration
    pub fn new(config: &AbilityConfig) -> Self {
        Self {
            mp: config.starting_mp.min(config.max_mp),
            max_mp: config.max_mp,
            registry: config
                .registry
                .iter()
                .map(|def| (def.name.clone(), def.cost))
                .collect(),
        }
    }

    /// Current MP
    pub const fn mp(&self) -> u32 {
        self.mp
    }

    /// MP cap
    pub const fn max_mp(&self) -> u32 {
        self.max_mp
    }

    /// Register or replace an ability
    pub fn register(&mut self, name: impl Into<String>, cost: u32) {
        self.registry.insert(name.into(), cost);
    }

    /// Add MP, clamped to the cap
    pub fn award(&mut self, amount: u32) {
        self.mp = self.mp.saturating_add(amount).min(self.max_mp);
    }

    /// Spend MP if enough is available
    pub fn spend(&mut self, amount: u32) -> bool {
        if amount > self.mp {
            return false;
        }
        self.mp -= amount;
        true
    }

    /// Activate an ability by name.
    ///
    /// Unknown abilities and insufficient MP are reported with a warning and
    /// leave MP unchanged.
    pub fn activate(&mut self, name: &str) -> bool {
        let Some(&cost) = self.registry.get(name) else {
            log::warn!("Ability '{name}' is not registered");
            return false;
        };
        if !self.spend(cost) {
            log::warn!("Ability '{name}' needs {cost} MP, have {}", self.mp);
            return false;
        }
        log::debug!("Activated '{name}' for {cost} MP");
        true
    }
}

/// Severity of a successful hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTier {
    /// Plain hit
    Normal,
    /// Hit landed while a combo is running
    Combo,
    /// Partially charged attack
    Charged,
    /// Full charge, or a hit on a nearly dead enemy
    Critical,
}

impl HitTier {
    /// Classify a hit.
    ///
    /// Precedence is critical, charged, combo, normal. `target_health_fraction`
    /// is the struck enemy's remaining health over its maximum (crystals pass
    /// `None`).
    pub fn classify(
        charge_level: f32,
        combo_count: u32,
        target_health_fraction: Option<f32>,
        config: &CombatConfig,
    ) -> Self {
        let low_health = target_health_fraction
            .is_some_and(|fraction| fraction <= config.critical_health_fraction);
        if charge_level >= config.critical_charge || low_health {
            Self::Critical
        } else if charge_level > 0.0 {
            Self::Charged
        } else if combo_count >= config.combo_threshold {
            Self::Combo
        } else {
            Self::Normal
        }
    }

    /// Damage this tier deals
    pub const fn damage(self, config: &CombatConfig) -> i32 {
        match self {
            Self::Normal | Self::Combo => config.damage_normal,
            Self::Charged => config.damage_charged,
            Self::Critical => config.damage_critical,
        }
    }

    /// Freeze-frame this tier requests on an enemy
    pub const fn hit_pause(self, config: &CombatConfig) -> f32 {
        match self {
            Self::Critical => config.critical_hit_pause,
            _ => config.hit_pause,
        }
    }
}

/// What was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// An enemy
    Enemy,
    /// A breakable crystal
    Crystal,
}

/// Per-frame notification for presentation layers
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    /// Player attack connected
    Hit {
        /// Classified severity
        tier: HitTier,
        /// What was struck
        target: HitTarget,
        /// Contact point
        position: Vec2,
    },
    /// An enemy entered its death fade
    EnemyKilled {
        /// Enemy center
        position: Vec2,
        /// Experience awarded
        experience: u32,
    },
    /// A crystal started breaking
    CrystalShattered {
        /// Crystal center
        position: Vec2,
        /// Whether a neighbour's chain reaction broke it
        chained: bool,
    },
    /// Player took contact damage
    PlayerHurt {
        /// Damage taken
        damage: i32,
    },
    /// Player picked up experience
    ExperienceCollected {
        /// Experience gained
        value: u32,
    },
}

/// Bundle of externally owned feedback systems, passed into the combat core
#[derive(Debug, Clone)]
pub struct Feedback {
    /// Freeze-frame gate
    pub hit_pause: HitPause,
    /// Camera shake requests
    pub shake: CameraShake,
    /// Sparks and poofs
    pub particles: Particles,
    /// Combo counter
    pub combo: ComboCounter,
    /// MP economy
    pub abilities: AbilitySystem,
    events: Vec<FeedbackEvent>,
}

impl Feedback {
    /// Build every collaborator from configuration
    pub fn new(config: &GameConfig) -> Self {
        Self {
            hit_pause: HitPause::default(),
            shake: CameraShake::default(),
            particles: Particles::default(),
            combo: ComboCounter::new(config.combo.window),
            abilities: AbilitySystem::new(&config.abilities),
            events: Vec::new(),
        }
    }

    /// Queue a presentation event
    pub fn emit(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance gameplay-time collaborators (not the hit-pause)
    pub fn update(&mut self, delta_time: f32) {
        self.particles.update(delta_time);
        self.combo.tick(delta_time);
    }
}
