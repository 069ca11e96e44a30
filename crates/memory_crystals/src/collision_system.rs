//! Per-frame collision and combat resolution
//!
//! [`CollisionSystem::update`] runs six stages in a fixed order, each
//! re-deriving bounds from current positions:
//!
//! 1. player attack vs crystals
//! 2. player vs experience pickups
//! 3. player vs enemies (contact damage, then attack)
//! 4. player vs platforms, solid blocks and slopes
//! 5. enemies vs solid blocks (predictive turn-around)
//! 6. projectiles vs enemies, crystals and solid blocks
//!
//! Entities that go inactive in one stage are skipped by later ones through
//! their liveness flags. Nothing is removed here; the world sweeps at the end
//! of the frame.

use lumen_engine::foundation::math::Vec2;
use lumen_engine::physics::{diagonal_platform_collision, resolve_collision, would_collide_horizontally, Aabb, Axis};
use rand::Rng;

use crate::chain_reaction::ChainReactionManager;
use crate::config::GameConfig;
use crate::effects::{Feedback, FeedbackEvent, HitTarget, HitTier};
use crate::player::Player;
use crate::world::Scene;

/// What happened during the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Crystals shattered directly, by swing or projectile
    pub crystals_broken: u32,
    /// Experience orbs picked up
    pub pickups_collected: u32,
    /// Swings that damaged an enemy
    pub enemy_hits: u32,
    /// Enemies that started dying this frame
    pub enemies_killed: u32,
    /// Player took contact damage
    pub player_hurt: bool,
    /// Player came to rest on a surface
    pub landed: bool,
    /// Enemies that turned around before a wall
    pub enemy_turns: u32,
    /// Projectiles that hit something and expired
    pub projectile_impacts: u32,
}

/// Fixed-order collision orchestrator
///
/// Holds only the report of the frame it last ran.
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    report: CollisionReport,
}

impl CollisionSystem {
    /// Empty system with a zeroed report
    pub fn new() -> Self {
        Self::default()
    }

    /// Report from the most recent [`CollisionSystem::update`]
    pub const fn report(&self) -> &CollisionReport {
        &self.report
    }

    /// Run every stage once
    pub fn update(
        &mut self,
        scene: &mut Scene,
        feedback: &mut Feedback,
        chain: &mut ChainReactionManager,
        rng: &mut impl Rng,
        config: &GameConfig,
        delta_time: f32,
    ) -> CollisionReport {
        self.report = CollisionReport::default();

        self.attack_crystals(scene, feedback, chain, rng, config);
        self.collect_pickups(scene, feedback);
        self.player_enemies(scene, feedback, rng, config);
        self.static_geometry(scene, config);
        self.enemy_walls(scene, delta_time);
        self.projectiles(scene, feedback, chain, rng, config);

        self.report
    }

    /// Stage 1
    fn attack_crystals(
        &mut self,
        scene: &mut Scene,
        feedback: &mut Feedback,
        chain: &mut ChainReactionManager,
        rng: &mut impl Rng,
        config: &GameConfig,
    ) {
        let Some(attack) = scene.player.attack() else {
            return;
        };

        for index in 0..scene.crystals.len() {
            let crystal = &scene.crystals[index];
            if !crystal.can_break() || !attack.bounds.overlaps(&crystal.bounds()) {
                continue;
            }
            let position = crystal.center();
            let tier = HitTier::classify(attack.charge_level, feedback.combo.count(), None, &config.combat);

            let drops = chain.shatter(&mut scene.crystals, index, &config.crystal, feedback, rng);
            scene.pickups.extend(drops);
            feedback.emit(FeedbackEvent::Hit { tier, target: HitTarget::Crystal, position });
            self.report.crystals_broken += 1;
        }
    }

    /// Stage 2
    fn collect_pickups(&mut self, scene: &mut Scene, feedback: &mut Feedback) {
        let bounds = scene.player.bounds();
        for pickup in scene.pickups.iter_mut().filter(|pickup| pickup.active) {
            if !bounds.overlaps(&pickup.bounds()) {
                continue;
            }
            let value = pickup.collect();
            scene.player.gain_experience(value);
            feedback.emit(FeedbackEvent::ExperienceCollected { value });
            self.report.pickups_collected += 1;
        }
    }

    /// Stage 3
    fn player_enemies(&mut self, scene: &mut Scene, feedback: &mut Feedback, rng: &mut impl Rng, config: &GameConfig) {
        let combat = &config.combat;

        for enemy in scene.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            let enemy_bounds = enemy.bounds();

            if scene.player.bounds().overlaps(&enemy_bounds)
                && scene
                    .player
                    .take_contact_damage(combat.contact_damage, enemy_bounds.center().x, combat)
            {
                feedback.emit(FeedbackEvent::PlayerHurt { damage: combat.contact_damage });
                log::debug!("Player hurt, health {}", scene.player.health);
                self.report.player_hurt = true;
            }

            let Some(attack) = scene.player.attack() else {
                continue;
            };
            if enemy.is_hit() || !attack.bounds.overlaps(&enemy_bounds) {
                continue;
            }

            let tier = HitTier::classify(
                attack.charge_level,
                feedback.combo.count(),
                Some(enemy.health_fraction()),
                combat,
            );
            let Some(hit) = enemy.handle_player_attack(&attack, tier, combat, feedback, rng) else {
                continue;
            };

            feedback.combo.increment();
            feedback.abilities.award(combat.mp_per_hit);
            feedback.emit(FeedbackEvent::Hit { tier, target: HitTarget::Enemy, position: hit.contact });
            self.report.enemy_hits += 1;

            if hit.damage.killed {
                scene.player.gain_experience(hit.damage.experience);
                feedback.emit(FeedbackEvent::EnemyKilled {
                    position: enemy.center(),
                    experience: hit.damage.experience,
                });
                self.report.enemies_killed += 1;
            }
        }
    }

    /// Stage 4
    fn static_geometry(&mut self, scene: &mut Scene, config: &GameConfig) {
        let Scene { player, platforms, solid_blocks, diagonal_platforms, .. } = scene;
        let tolerance = config.physics.snap_tolerance;

        for platform in platforms.iter() {
            if land_on(player, platform.bounds.top, &platform.bounds, tolerance) {
                self.report.landed = true;
            }
        }

        for block in solid_blocks.iter() {
            let Some(resolution) = resolve_collision(&player.bounds(), &block.bounds) else {
                continue;
            };
            player.position += resolution.offset;
            match resolution.axis {
                Axis::Horizontal => player.velocity.x = 0.0,
                Axis::Vertical if resolution.is_landing() => {
                    player.velocity.y = player.velocity.y.min(0.0);
                    player.grounded = true;
                    self.report.landed = true;
                }
                Axis::Vertical => player.velocity.y = player.velocity.y.max(0.0),
            }
        }

        for slope in diagonal_platforms.iter() {
            let bounds = player.bounds();
            let Some(hit) = diagonal_platform_collision(
                bounds.left,
                bounds.top,
                bounds.width(),
                bounds.height(),
                &slope.segment,
            ) else {
                continue;
            };
            // A slope has no horizontal extent to overlap, only the sampled point
            let surface = Aabb::new(bounds.left, bounds.right, hit.surface_y, hit.surface_y);
            if land_on(player, hit.surface_y, &surface, tolerance) {
                self.report.landed = true;
            }
        }
    }

    /// Stage 5
    fn enemy_walls(&mut self, scene: &mut Scene, delta_time: f32) {
        for enemy in scene.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            let bounds = enemy.bounds();
            let next_x = enemy.body.next_x(delta_time);
            let blocked = scene.solid_blocks.iter().any(|block| {
                would_collide_horizontally(next_x, bounds.top, bounds.width(), bounds.height(), &block.bounds)
            });
            if blocked {
                enemy.reverse();
                self.report.enemy_turns += 1;
            }
        }
    }

    /// Stage 6
    fn projectiles(
        &mut self,
        scene: &mut Scene,
        feedback: &mut Feedback,
        chain: &mut ChainReactionManager,
        rng: &mut impl Rng,
        config: &GameConfig,
    ) {
        for projectile in scene.projectiles.iter_mut().filter(|projectile| projectile.active) {
            let bounds = projectile.bounds();
            let direction = projectile.velocity.x.signum();

            if let Some(enemy) = scene
                .enemies
                .iter_mut()
                .find(|enemy| enemy.is_alive() && bounds.overlaps(&enemy.bounds()))
            {
                let contact = bounds.center();
                let outcome = enemy.take_damage(projectile.damage, &config.combat, feedback);
                feedback.particles.spawn_hit_spark(contact, direction, HitTier::Normal, rng);
                feedback.combo.increment();
                feedback.abilities.award(config.combat.mp_per_hit);
                feedback.emit(FeedbackEvent::Hit {
                    tier: HitTier::Normal,
                    target: HitTarget::Enemy,
                    position: contact,
                });
                if outcome.killed {
                    scene.player.gain_experience(outcome.experience);
                    feedback.emit(FeedbackEvent::EnemyKilled {
                        position: enemy.center(),
                        experience: outcome.experience,
                    });
                    self.report.enemies_killed += 1;
                }
                projectile.active = false;
                self.report.projectile_impacts += 1;
                continue;
            }

            if let Some(index) = scene
                .crystals
                .iter()
                .position(|crystal| crystal.can_break() && bounds.overlaps(&crystal.bounds()))
            {
                let position: Vec2 = scene.crystals[index].center();
                let drops = chain.shatter(&mut scene.crystals, index, &config.crystal, feedback, rng);
                scene.pickups.extend(drops);
                feedback.emit(FeedbackEvent::Hit {
                    tier: HitTier::Normal,
                    target: HitTarget::Crystal,
                    position,
                });
                projectile.active = false;
                self.report.crystals_broken += 1;
                self.report.projectile_impacts += 1;
                continue;
            }

            if scene.solid_blocks.iter().any(|block| bounds.overlaps(&block.bounds)) {
                projectile.active = false;
                self.report.projectile_impacts += 1;
            }
        }
    }
}

/// Snap a falling player onto a surface at height `top`.
///
/// Requires downward (or zero) vertical velocity, strict horizontal overlap
/// with `surface`, and the player's bottom within `tolerance` of `top`.
fn land_on(player: &mut Player, top: f32, surface: &Aabb, tolerance: f32) -> bool {
    if player.velocity.y < 0.0 {
        return false;
    }
    let bounds = player.bounds();
    if !bounds.overlaps_horizontally(surface) || (bounds.bottom - top).abs() > tolerance {
        return false;
    }
    player.position.y = top - player.size.y;
    player.velocity.y = 0.0;
    player.grounded = true;
    true
}
