//! Enemies
//!
//! Every enemy shares one state machine:
//!
//! ```text
//! Moving ──hit──▶ Hit (timed) ──▶ Moving
//!    │                 │
//!    └──health ≤ 0─────┴──▶ Dying (timed) ──▶ removed
//! ```
//!
//! Only the way an enemy moves differs, and that is a [`Movement`] strategy.
//! A dying enemy stops moving but keeps animating its damage numbers; it is
//! marked inactive only after the fade has finished *and* every number has
//! faded out.

use std::fmt::Debug;

use lumen_engine::foundation::math::{approach_zero, Vec2};
use lumen_engine::foundation::time::Countdown;
use lumen_engine::physics::{resolve_horizontal, Aabb};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::SolidBlock;
use crate::config::CombatConfig;
use crate::effects::{Feedback, HitTier};
use crate::player::PlayerAttack;

/// Position and patrol state shared with movement strategies
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyBody {
    /// Top-left corner
    pub position: Vec2,
    /// Extent
    pub size: Vec2,
    /// Patrol direction, `1.0` or `-1.0`
    pub direction: f32,
    /// Patrol speed (units/s)
    pub speed: f32,
}

impl EnemyBody {
    /// Current bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    /// Where the next patrol step would put the left edge
    pub fn next_x(&self, delta_time: f32) -> f32 {
        self.position.x + self.direction * self.speed * delta_time
    }
}

/// Per-kind movement strategy
pub trait Movement: Debug {
    /// Advance the body by one frame of patrol
    fn advance(&mut self, body: &mut EnemyBody, delta_time: f32);
}

/// Walk back and forth between two x limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    /// Leftmost x the left edge may reach
    pub min_x: f32,
    /// Rightmost x the right edge may reach
    pub max_x: f32,
}

impl Movement for Patrol {
    fn advance(&mut self, body: &mut EnemyBody, delta_time: f32) {
        body.position.x = body.next_x(delta_time);
        if body.position.x <= self.min_x {
            body.position.x = self.min_x;
            body.direction = 1.0;
        } else if body.position.x + body.size.x >= self.max_x {
            body.position.x = self.max_x - body.size.x;
            body.direction = -1.0;
        }
    }
}

/// Patrol while bobbing around an anchor height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    /// Horizontal patrol
    pub patrol: Patrol,
    /// Rest height of the top edge
    pub anchor_y: f32,
    /// Bob amplitude
    pub amplitude: f32,
    /// Bob frequency (radians/s)
    pub frequency: f32,
    /// Accumulated bob phase
    pub phase: f32,
}

impl Movement for Hover {
    fn advance(&mut self, body: &mut EnemyBody, delta_time: f32) {
        self.patrol.advance(body, delta_time);
        self.phase += self.frequency * delta_time;
        body.position.y = self.anchor_y + self.amplitude * self.phase.sin();
    }
}

/// Built-in enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground walker
    Shade,
    /// Floating bobber
    Wisp,
}

impl EnemyKind {
    /// Starting health
    pub const fn health(self) -> i32 {
        match self {
            Self::Shade => 3,
            Self::Wisp => 2,
        }
    }

    /// Experience awarded on death
    pub const fn experience(self) -> u32 {
        match self {
            Self::Shade => 15,
            Self::Wisp => 20,
        }
    }

    /// Body extent
    pub fn size(self) -> Vec2 {
        match self {
            Self::Shade => Vec2::new(28.0, 28.0),
            Self::Wisp => Vec2::new(24.0, 24.0),
        }
    }

    /// Patrol speed
    pub const fn speed(self) -> f32 {
        match self {
            Self::Shade => 60.0,
            Self::Wisp => 40.0,
        }
    }
}

/// Floating damage number
#[derive(Debug, Clone, PartialEq)]
pub struct DamageIndicator {
    /// Damage shown
    pub amount: i32,
    /// Height risen above the spawn point
    pub rise: f32,
    /// Remaining life
    pub life: Countdown,
}

impl DamageIndicator {
    const RISE_SPEED: f32 = 40.0;

    /// Opacity in `0.0..=1.0`
    pub fn alpha(&self) -> f32 {
        1.0 - self.life.progress()
    }
}

/// Result of a [`Enemy::take_damage`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage was applied (false once dying)
    pub applied: bool,
    /// This call started the death
    pub killed: bool,
    /// Experience to award for the kill
    pub experience: u32,
}

/// Result of a successful player attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Damage bookkeeping
    pub damage: DamageOutcome,
    /// Contact point on the enemy's edge
    pub contact: Vec2,
}

/// An enemy with the shared hit/dying state machine
#[derive(Debug)]
pub struct Enemy {
    /// Position and patrol state
    pub body: EnemyBody,
    /// Current health
    pub health: i32,
    /// Starting health
    pub max_health: i32,
    /// Experience awarded on death
    pub experience_value: u32,
    /// Liveness flag; cleared once fully faded out
    pub active: bool,
    movement: Box<dyn Movement>,
    hit_stun: Countdown,
    dying: bool,
    death_fade: Countdown,
    knockback: Vec2,
    hop: f32,
    indicators: Vec<DamageIndicator>,
}

impl Enemy {
    /// Create an enemy with a custom movement strategy
    pub fn new(body: EnemyBody, health: i32, experience_value: u32, movement: Box<dyn Movement>) -> Self {
        Self {
            body,
            health,
            max_health: health,
            experience_value,
            active: true,
            movement,
            hit_stun: Countdown::idle(),
            dying: false,
            death_fade: Countdown::idle(),
            knockback: Vec2::zeros(),
            hop: 0.0,
            indicators: Vec::new(),
        }
    }

    /// Spawn a built-in kind patrolling between `min_x` and `max_x`
    pub fn spawn(kind: EnemyKind, position: Vec2, min_x: f32, max_x: f32) -> Self {
        let body = EnemyBody {
            position,
            size: kind.size(),
            direction: 1.0,
            speed: kind.speed(),
        };
        let patrol = Patrol { min_x, max_x };
        let movement: Box<dyn Movement> = match kind {
            EnemyKind::Shade => Box::new(patrol),
            EnemyKind::Wisp => Box::new(Hover {
                patrol,
                anchor_y: position.y,
                amplitude: 10.0,
                frequency: 3.0,
                phase: 0.0,
            }),
        };
        Self::new(body, kind.health(), kind.experience(), movement)
    }

    /// Current bounds, including any knockback hop
    pub fn bounds(&self) -> Aabb {
        self.body.bounds().translated(Vec2::new(0.0, self.hop))
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Whether the enemy is in hit-stun
    pub fn is_hit(&self) -> bool {
        self.hit_stun.is_running()
    }

    /// Whether the enemy is fading out
    pub const fn is_dying(&self) -> bool {
        self.dying
    }

    /// Can be struck or deal contact damage
    pub const fn is_alive(&self) -> bool {
        self.active && !self.dying
    }

    /// Remaining health as a fraction of the starting health
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health.max(0) as f32 / self.max_health as f32
    }

    /// Floating damage numbers still on screen
    pub fn damage_indicators(&self) -> &[DamageIndicator] {
        &self.indicators
    }

    /// Turn the patrol around without moving
    pub fn reverse(&mut self) {
        self.body.direction = -self.body.direction;
    }

    /// Advance one frame.
    ///
    /// Dying enemies only run their fade and damage numbers. Everyone else
    /// moves, carries knockback and ticks hit-stun. Knockback stops at the
    /// first of `walls` it would push the enemy into.
    pub fn update(&mut self, delta_time: f32, config: &CombatConfig, walls: &[SolidBlock]) {
        if !self.active {
            return;
        }

        self.update_indicators(delta_time);

        if self.dying {
            self.death_fade.tick(delta_time);
            if !self.death_fade.is_running() && self.indicators.is_empty() {
                self.active = false;
            }
            return;
        }

        self.movement.advance(&mut self.body, delta_time);
        self.apply_knockback(delta_time, config.knockback_damping, walls);
        self.hit_stun.tick(delta_time);
    }

    fn update_indicators(&mut self, delta_time: f32) {
        for indicator in &mut self.indicators {
            indicator.rise += DamageIndicator::RISE_SPEED * delta_time;
            indicator.life.tick(delta_time);
        }
        self.indicators.retain(|indicator| indicator.life.is_running());
    }

    fn apply_knockback(&mut self, delta_time: f32, damping: f32, walls: &[SolidBlock]) {
        let before = self.bounds();
        self.body.position.x += self.knockback.x * delta_time;
        // Walls already overlapped (a bob dipping into the floor) don't count
        for wall in walls.iter().filter(|wall| !before.overlaps(&wall.bounds)) {
            if let Some(offset_x) = resolve_horizontal(&self.bounds(), &wall.bounds) {
                self.body.position.x = if offset_x < 0.0 {
                    wall.bounds.left - self.body.size.x
                } else {
                    wall.bounds.right
                };
                self.knockback.x = 0.0;
            }
        }
        self.knockback.x = approach_zero(self.knockback.x, damping * delta_time);

        // Vertical impulse is a hop that lands back on the patrol line
        self.hop += self.knockback.y * delta_time;
        self.knockback.y += damping * delta_time;
        if self.hop >= 0.0 {
            self.hop = 0.0;
            self.knockback.y = 0.0;
        }
    }

    /// Apply damage.
    ///
    /// Crossing zero starts the death fade, leaves a poof and reports the
    /// experience owed. Once dying, further calls change nothing.
    pub fn take_damage(&mut self, amount: i32, config: &CombatConfig, feedback: &mut Feedback) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::default();
        }

        self.health = (self.health - amount).max(0);
        self.indicators.push(DamageIndicator {
            amount,
            rise: 0.0,
            life: Countdown::started(config.damage_indicator_lifetime),
        });

        if self.health > 0 {
            return DamageOutcome { applied: true, killed: false, experience: 0 };
        }

        self.dying = true;
        self.hit_stun.cancel();
        self.knockback = Vec2::zeros();
        self.death_fade.start(config.death_fade);
        feedback.particles.spawn_poof(self.center());
        log::debug!("Enemy at {:?} defeated", self.center());

        DamageOutcome {
            applied: true,
            killed: true,
            experience: self.experience_value,
        }
    }

    /// Resolve a player swing against this enemy.
    ///
    /// Requires the swing to overlap and the enemy to be alive and not in
    /// hit-stun, so one swing deals at most one damage instance. On a hit:
    /// damage, hit-stun, knockback in the swing direction, a spark at the
    /// contact edge, a freeze-frame and a camera shake.
    pub fn handle_player_attack(
        &mut self,
        attack: &PlayerAttack,
        tier: HitTier,
        config: &CombatConfig,
        feedback: &mut Feedback,
        rng: &mut impl Rng,
    ) -> Option<HitOutcome> {
        if !self.is_alive() || self.is_hit() {
            return None;
        }
        let bounds = self.bounds();
        if !attack.bounds.overlaps(&bounds) {
            return None;
        }

        let contact = Vec2::new(
            if attack.facing >= 0.0 { bounds.left } else { bounds.right },
            attack.bounds.center().y.clamp(bounds.top, bounds.bottom),
        );

        let damage = self.take_damage(tier.damage(config), config, feedback);
        if !damage.killed {
            self.hit_stun.start(config.hit_stun);
            self.knockback = Vec2::new(
                attack.facing * config.enemy_knockback[0],
                config.enemy_knockback[1],
            );
        }

        feedback.particles.spawn_hit_spark(contact, attack.facing, tier, rng);
        feedback.hit_pause.request(tier.hit_pause(config));
        feedback.shake.request(config.shake_intensity, config.shake_duration);

        Some(HitOutcome { damage, contact })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::effects::ParticleKind;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Enemy, GameConfig, Feedback) {
        let config = GameConfig::default();
        let feedback = Feedback::new(&config);
        let enemy = Enemy::spawn(EnemyKind::Shade, Vec2::new(100.0, 100.0), 0.0, 400.0);
        (enemy, config, feedback)
    }

    fn swing_at(enemy: &Enemy) -> PlayerAttack {
        let bounds = enemy.bounds();
        PlayerAttack {
            bounds: Aabb::from_xywh(bounds.left - 20.0, bounds.top, 30.0, bounds.height()),
            charge_level: 0.0,
            facing: 1.0,
        }
    }

    #[test]
    fn test_three_hits_kill_and_fourth_is_noop() {
        let (mut enemy, config, mut feedback) = setup();
        assert_eq!(enemy.health, 3);

        assert!(!enemy.take_damage(1, &config.combat, &mut feedback).killed);
        assert!(!enemy.take_damage(1, &config.combat, &mut feedback).killed);
        let third = enemy.take_damage(1, &config.combat, &mut feedback);
        assert!(third.killed);
        assert_eq!(third.experience, 15);
        assert!(enemy.is_dying());

        let fourth = enemy.take_damage(1, &config.combat, &mut feedback);
        assert_eq!(fourth, DamageOutcome::default());
        assert_eq!(enemy.health, 0);
        assert_eq!(feedback.particles.count(ParticleKind::Poof), 1);
    }

    #[test]
    fn test_overkill_does_not_go_negative() {
        let (mut enemy, config, mut feedback) = setup();
        enemy.take_damage(10, &config.combat, &mut feedback);
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_hit_stun_blocks_second_hit() {
        let (mut enemy, config, mut feedback) = setup();
        let mut rng = StdRng::seed_from_u64(1);
        let attack = swing_at(&enemy);

        assert!(enemy
            .handle_player_attack(&attack, HitTier::Normal, &config.combat, &mut feedback, &mut rng)
            .is_some());
        assert!(enemy.is_hit());
        assert!(enemy
            .handle_player_attack(&attack, HitTier::Normal, &config.combat, &mut feedback, &mut rng)
            .is_none());
        assert_eq!(enemy.health, 2);
        assert!(feedback.hit_pause.is_active());
        assert!(feedback.shake.intensity() > 0.0);
        assert_eq!(feedback.particles.count(ParticleKind::HitSpark), 4);
    }

    #[test]
    fn test_hit_stun_expires() {
        let (mut enemy, config, mut feedback) = setup();
        let mut rng = StdRng::seed_from_u64(1);
        let attack = swing_at(&enemy);
        enemy.handle_player_attack(&attack, HitTier::Normal, &config.combat, &mut feedback, &mut rng);
        for _ in 0..30 {
            enemy.update(1.0 / 60.0, &config.combat, &[]);
        }
        assert!(!enemy.is_hit());
    }

    #[test]
    fn test_knockback_pushes_along_swing() {
        let (mut enemy, config, mut feedback) = setup();
        enemy.body.speed = 0.0;
        let mut rng = StdRng::seed_from_u64(1);
        let attack = swing_at(&enemy);
        let start_x = enemy.body.position.x;
        enemy.handle_player_attack(&attack, HitTier::Normal, &config.combat, &mut feedback, &mut rng);
        enemy.update(1.0 / 60.0, &config.combat, &[]);
        assert!(enemy.body.position.x > start_x);
        assert!(enemy.bounds().top < enemy.body.bounds().top);
    }

    #[test]
    fn test_knockback_stops_at_wall() {
        let (mut enemy, config, mut feedback) = setup();
        enemy.body.speed = 0.0;
        let mut rng = StdRng::seed_from_u64(1);
        // Right edge at 128, wall face at 130
        let walls = [SolidBlock::new(130.0, 0.0, 40.0, 200.0)];
        let attack = swing_at(&enemy);
        enemy.handle_player_attack(&attack, HitTier::Normal, &config.combat, &mut feedback, &mut rng);

        for _ in 0..30 {
            enemy.update(1.0 / 60.0, &config.combat, &walls);
            assert!(!enemy.bounds().overlaps(&walls[0].bounds));
        }
        assert_relative_eq!(enemy.bounds().right, 130.0);
    }

    #[test]
    fn test_missed_swing_does_nothing() {
        let (mut enemy, config, mut feedback) = setup();
        let mut rng = StdRng::seed_from_u64(1);
        let attack = PlayerAttack {
            bounds: Aabb::from_xywh(0.0, 0.0, 10.0, 10.0),
            charge_level: 0.0,
            facing: 1.0,
        };
        assert!(enemy
            .handle_player_attack(&attack, HitTier::Normal, &config.combat, &mut feedback, &mut rng)
            .is_none());
        assert_eq!(enemy.health, 3);
        assert!(!feedback.hit_pause.is_active());
    }

    #[test]
    fn test_removal_waits_for_fade_and_indicators() {
        let (mut enemy, mut config, mut feedback) = setup();
        config.combat.death_fade = 0.2;
        config.combat.damage_indicator_lifetime = 0.5;
        enemy.take_damage(3, &config.combat, &mut feedback);

        enemy.update(0.3, &config.combat, &[]);
        // Fade done, but the damage number is still floating
        assert!(enemy.active);
        assert_eq!(enemy.damage_indicators().len(), 1);

        enemy.update(0.3, &config.combat, &[]);
        assert!(enemy.damage_indicators().is_empty());
        assert!(!enemy.active);
    }

    #[test]
    fn test_dying_enemy_does_not_move() {
        let (mut enemy, config, mut feedback) = setup();
        enemy.take_damage(3, &config.combat, &mut feedback);
        let x = enemy.body.position.x;
        enemy.update(0.1, &config.combat, &[]);
        assert_relative_eq!(enemy.body.position.x, x);
    }

    #[test]
    fn test_patrol_turns_at_limits() {
        let mut patrol = Patrol { min_x: 0.0, max_x: 100.0 };
        let mut body = EnemyBody {
            position: Vec2::new(70.0, 0.0),
            size: Vec2::new(20.0, 20.0),
            direction: 1.0,
            speed: 60.0,
        };
        patrol.advance(&mut body, 0.5);
        assert_relative_eq!(body.position.x, 80.0);
        assert_relative_eq!(body.direction, -1.0);
    }

    #[test]
    fn test_hover_bobs_around_anchor() {
        let mut enemy = Enemy::spawn(EnemyKind::Wisp, Vec2::new(100.0, 50.0), 0.0, 400.0);
        let config = CombatConfig::default();
        enemy.update(0.25, &config, &[]);
        assert!((enemy.body.position.y - 50.0).abs() <= 10.0);
        assert!((enemy.body.position.y - 50.0).abs() > 0.0);
    }
}
