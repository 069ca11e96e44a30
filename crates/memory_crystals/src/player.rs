//! Player body and attack contract
//!
//! Input polling lives outside the core; the player receives an already
//! resolved [`PlayerInput`] each frame. The collision system only consumes
//! [`Player::attack`] and mutates position, velocity, health and experience.

use lumen_engine::foundation::math::{direction_of, Vec2};
use lumen_engine::foundation::time::Countdown;
use lumen_engine::physics::Aabb;

use crate::config::{CombatConfig, PhysicsConfig, PlayerConfig};

/// Player intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal steering in `-1.0..=1.0`
    pub move_axis: f32,
    /// Jump pressed this frame
    pub jump: bool,
    /// Quick attack pressed this frame
    pub attack: bool,
    /// Attack held for a charged swing; releasing it swings
    pub charging: bool,
    /// Dash pressed this frame
    pub dash: bool,
    /// Arc bolt pressed this frame
    pub cast: bool,
}

/// Live attack hitbox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAttack {
    /// Hitbox in world space
    pub bounds: Aabb,
    /// Charge locked in when the swing started, `0.0..=1.0`
    pub charge_level: f32,
    /// `1.0` facing right, `-1.0` facing left
    pub facing: f32,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub position: Vec2,
    /// Extent
    pub size: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Standing on something this frame
    pub grounded: bool,
    /// `1.0` facing right, `-1.0` facing left
    pub facing: f32,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Total experience collected
    pub experience: u32,
    config: PlayerConfig,
    invulnerability: Countdown,
    control_lock: Countdown,
    swing: Countdown,
    swing_charge: f32,
    charge_held: f32,
}

impl Player {
    /// Spawn a player with its top-left corner at `position`
    pub fn new(position: Vec2, config: &PlayerConfig) -> Self {
        Self {
            position,
            size: Vec2::new(config.width, config.height),
            velocity: Vec2::zeros(),
            grounded: false,
            facing: 1.0,
            health: config.max_health,
            max_health: config.max_health,
            experience: 0,
            config: config.clone(),
            invulnerability: Countdown::idle(),
            control_lock: Countdown::idle(),
            swing: Countdown::idle(),
            swing_charge: 0.0,
            charge_held: 0.0,
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

    /// Whether contact damage is currently ignored
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability.is_running()
    }

    /// Whether the player is out of health
    pub const fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Charge built up by holding attack, `0.0..=1.0`
    pub fn charge_level(&self) -> f32 {
        if self.config.charge_time <= 0.0 {
            return 1.0;
        }
        (self.charge_held / self.config.charge_time).min(1.0)
    }

    /// Whether a swing is in its active frames
    pub fn is_attacking(&self) -> bool {
        self.swing.is_running()
    }

    /// The live attack hitbox, if a swing is active
    pub fn attack(&self) -> Option<PlayerAttack> {
        if !self.is_attacking() {
            return None;
        }
        let body = self.bounds();
        let edge = if self.facing >= 0.0 { body.right } else { body.left };
        let top = body.center().y - self.config.attack_height * 0.5;
        // Reach is signed by facing; the box normalizes itself
        let bounds = Aabb::from_xywh(edge, top, self.config.attack_reach * self.facing, self.config.attack_height);
        Some(PlayerAttack {
            bounds,
            charge_level: self.swing_charge,
            facing: self.facing,
        })
    }

    /// Begin a swing unless one is already active
    pub fn start_attack(&mut self, charge_level: f32) -> bool {
        if self.is_attacking() {
            return false;
        }
        self.swing_charge = charge_level.clamp(0.0, 1.0);
        self.swing.start(self.config.attack_duration);
        true
    }

    /// Apply one frame of intent.
    ///
    /// Dashing and casting need MP and are resolved by the world; this only
    /// handles steering, jumping and swings.
    pub fn apply_input(&mut self, input: &PlayerInput, delta_time: f32) {
        if !self.control_lock.is_running() {
            self.velocity.x = input.move_axis.clamp(-1.0, 1.0) * self.config.run_speed;
            let direction = direction_of(input.move_axis);
            if direction != 0.0 {
                self.facing = direction;
            }
        }

        if input.jump && self.grounded {
            self.velocity.y = -self.config.jump_speed;
            self.grounded = false;
        }

        if input.charging {
            self.charge_held += delta_time;
        } else if self.charge_held > 0.0 {
            let charge = self.charge_level();
            self.charge_held = 0.0;
            self.start_attack(charge);
        }

        if input.attack {
            self.start_attack(0.0);
        }
    }

    /// Burst forward in the facing direction
    pub fn dash(&mut self) {
        self.velocity.x = self.facing * self.config.dash_speed;
        self.control_lock.start(self.config.dash_time);
    }

    /// Integrate gravity and velocity, and tick timers.
    ///
    /// Clears `grounded`; the collision pass sets it again on landing.
    pub fn update(&mut self, delta_time: f32, physics: &PhysicsConfig) {
        self.velocity.y = (self.velocity.y + physics.gravity * delta_time).min(physics.max_fall_speed);
        self.position += self.velocity * delta_time;
        self.grounded = false;

        self.invulnerability.tick(delta_time);
        self.control_lock.tick(delta_time);
        self.swing.tick(delta_time);
    }

    /// Take contact damage from something centered at `source_x`.
    ///
    /// Ignored while invulnerable. Knocks the player away from the source.
    pub fn take_contact_damage(&mut self, damage: i32, source_x: f32, config: &CombatConfig) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = (self.health - damage).max(0);

        let away = if self.center().x < source_x { -1.0 } else { 1.0 };
        self.velocity = Vec2::new(away * config.player_knockback[0], config.player_knockback[1]);
        self.grounded = false;
        self.invulnerability.start(config.invulnerability_time);
        self.control_lock.start(config.invulnerability_time * 0.25);
        true
    }

    /// Add collected or awarded experience
    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), &PlayerConfig::default())
    }

    #[test]
    fn test_no_attack_without_swing() {
        assert!(player().attack().is_none());
    }

    #[test]
    fn test_attack_box_faces_right() {
        let mut p = player();
        p.start_attack(0.0);
        let attack = p.attack().unwrap();
        assert_relative_eq!(attack.bounds.left, p.bounds().right);
        assert_relative_eq!(attack.bounds.width(), 36.0);
    }

    #[test]
    fn test_attack_box_faces_left_normalized() {
        let mut p = player();
        p.facing = -1.0;
        p.start_attack(0.0);
        let attack = p.attack().unwrap();
        assert_relative_eq!(attack.bounds.right, p.bounds().left);
        assert!(attack.bounds.left < attack.bounds.right);
    }

    #[test]
    fn test_swing_expires() {
        let mut p = player();
        p.start_attack(0.0);
        p.update(0.25, &PhysicsConfig::default());
        assert!(!p.is_attacking());
    }

    #[test]
    fn test_charge_release_swings_with_charge() {
        let mut p = player();
        let hold = PlayerInput { charging: true, ..PlayerInput::default() };
        p.apply_input(&hold, 0.5);
        assert_relative_eq!(p.charge_level(), 0.5);
        p.apply_input(&PlayerInput::default(), 0.016);
        let attack = p.attack().unwrap();
        assert_relative_eq!(attack.charge_level, 0.5);
        assert_relative_eq!(p.charge_level(), 0.0);
    }

    #[test]
    fn test_contact_damage_and_invulnerability() {
        let config = CombatConfig::default();
        let mut p = player();
        // Source to the right of the player's center
        assert!(p.take_contact_damage(1, 200.0, &config));
        assert_eq!(p.health, 4);
        assert!(p.velocity.x < 0.0);
        assert!(p.velocity.y < 0.0);
        assert!(!p.take_contact_damage(1, 200.0, &config));
        assert_eq!(p.health, 4);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut p = player();
        p.apply_input(&PlayerInput { jump: true, ..PlayerInput::default() }, 0.016);
        assert_relative_eq!(p.velocity.y, 0.0);
        p.grounded = true;
        p.apply_input(&PlayerInput { jump: true, ..PlayerInput::default() }, 0.016);
        assert!(p.velocity.y < 0.0);
    }
}
