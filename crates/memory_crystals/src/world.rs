//! Session world
//!
//! [`Scene`] owns every entity collection. [`World`] owns the scene plus the
//! collaborators the combat core calls into, and steps them in this order:
//!
//! 1. hit-pause gate (a frozen frame only ticks the pause and the camera)
//! 2. player intent, dash and arc bolt
//! 3. entity updates
//! 4. chain triggers that came due
//! 5. the collision pipeline
//! 6. sweep of everything whose liveness flag dropped this frame

use lumen_engine::foundation::math::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chain_reaction::ChainReactionManager;
use crate::collision_system::{CollisionReport, CollisionSystem};
use crate::components::{DiagonalPlatform, ExperiencePickup, Platform, Projectile, SolidBlock};
use crate::config::GameConfig;
use crate::crystal::MemoryCrystal;
use crate::effects::Feedback;
use crate::enemy::Enemy;
use crate::level::{LevelData, LevelError};
use crate::player::{Player, PlayerInput};

/// Ability names looked up in the MP registry
pub const DASH: &str = "dash";
/// See [`DASH`]
pub const ARC_BOLT: &str = "arc_bolt";

/// Every entity of the loaded level
#[derive(Debug)]
pub struct Scene {
    /// The player
    pub player: Player,
    /// Enemies, including ones still fading out
    pub enemies: Vec<Enemy>,
    /// Crystals, including ones mid-shatter
    pub crystals: Vec<MemoryCrystal>,
    /// One-way platforms
    pub platforms: Vec<Platform>,
    /// Solid blocks
    pub solid_blocks: Vec<SolidBlock>,
    /// Slopes
    pub diagonal_platforms: Vec<DiagonalPlatform>,
    /// Experience orbs on the ground
    pub pickups: Vec<ExperiencePickup>,
    /// Player projectiles in flight
    pub projectiles: Vec<Projectile>,
}

impl Scene {
    /// Empty scene around a player
    pub const fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Vec::new(),
            crystals: Vec::new(),
            platforms: Vec::new(),
            solid_blocks: Vec::new(),
            diagonal_platforms: Vec::new(),
            pickups: Vec::new(),
            projectiles: Vec::new(),
        }
    }

    /// Drop every entity whose liveness flag is cleared
    pub fn sweep(&mut self) {
        self.enemies.retain(|enemy| enemy.active);
        self.crystals.retain(|crystal| crystal.active);
        self.pickups.retain(|pickup| pickup.active);
        self.projectiles.retain(|projectile| projectile.active);
    }
}

/// Frame-stepped game session
#[derive(Debug)]
pub struct World {
    /// Entities
    pub scene: Scene,
    /// Effect collaborators
    pub feedback: Feedback,
    config: GameConfig,
    chain: ChainReactionManager,
    collisions: CollisionSystem,
    rng: StdRng,
    level_name: String,
    frame: u64,
    paused_frames: u64,
}

impl World {
    /// Create a world with an empty scene.
    ///
    /// `seed` drives cosmetic randomness only; gameplay is deterministic.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(Vec2::zeros(), &config.player);
        Self {
            scene: Scene::new(player),
            feedback: Feedback::new(&config),
            chain: ChainReactionManager::new(&config.chain),
            collisions: CollisionSystem::new(),
            rng: StdRng::seed_from_u64(seed),
            level_name: String::new(),
            frame: 0,
            paused_frames: 0,
            config,
        }
    }

    /// Replace the scene with a level and drop any pending chain triggers
    pub fn load_level(&mut self, level: &LevelData) -> Result<(), LevelError> {
        let scene = level.build_scene(&self.config.player)?;
        self.scene = scene;
        self.chain.clear();
        self.feedback.combo.reset();
        self.feedback.drain_events();
        self.level_name.clone_from(&level.name);
        log::info!(
            "Loaded level '{}': {} enemies, {} crystals",
            level.name,
            self.scene.enemies.len(),
            self.scene.crystals.len()
        );
        Ok(())
    }

    /// Active tuning
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Chain reaction schedule
    pub const fn chain(&self) -> &ChainReactionManager {
        &self.chain
    }

    /// Collision report of the last unpaused frame
    pub const fn last_report(&self) -> &CollisionReport {
        self.collisions.report()
    }

    /// Name of the loaded level
    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    /// Frames simulated, excluding frozen ones
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames skipped by hit-pause
    pub const fn paused_frames(&self) -> u64 {
        self.paused_frames
    }

    /// Step the world by one frame
    pub fn update(&mut self, delta_time: f32, input: &PlayerInput) {
        self.feedback.shake.tick(delta_time);
        if self.feedback.hit_pause.is_active() {
            self.feedback.hit_pause.tick(delta_time);
            self.paused_frames += 1;
            return;
        }
        self.frame += 1;

        self.apply_input(delta_time, input);
        self.update_entities(delta_time);

        let drops = self.chain.update(
            delta_time,
            &mut self.scene.crystals,
            &self.config.crystal,
            &mut self.feedback,
            &mut self.rng,
        );
        self.scene.pickups.extend(drops);

        self.collisions.update(
            &mut self.scene,
            &mut self.feedback,
            &mut self.chain,
            &mut self.rng,
            &self.config,
            delta_time,
        );

        self.scene.sweep();
    }

    fn apply_input(&mut self, delta_time: f32, input: &PlayerInput) {
        let player = &mut self.scene.player;
        player.apply_input(input, delta_time);

        if input.dash && self.feedback.abilities.activate(DASH) {
            player.dash();
        }

        if input.cast && self.feedback.abilities.activate(ARC_BOLT) {
            let config = &self.config.player;
            let velocity = Vec2::new(player.facing * config.bolt_speed, 0.0);
            self.scene.projectiles.push(Projectile::new(
                player.center(),
                velocity,
                config.bolt_damage,
                config.bolt_lifetime,
            ));
        }
    }

    fn update_entities(&mut self, delta_time: f32) {
        let scene = &mut self.scene;
        scene.player.update(delta_time, &self.config.physics);
        for enemy in &mut scene.enemies {
            enemy.update(delta_time, &self.config.combat, &scene.solid_blocks);
        }
        for crystal in &mut scene.crystals {
            crystal.update(delta_time, &self.config.crystal);
        }
        for pickup in &mut scene.pickups {
            pickup.update(delta_time);
        }
        for projectile in &mut scene.projectiles {
            projectile.update(delta_time);
        }
        self.feedback.update(delta_time);
    }
}
