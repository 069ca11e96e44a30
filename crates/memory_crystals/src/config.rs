//! Game configuration
//!
//! Every tuning constant of the combat core lives here so a designer can
//! override it from a `.toml` or `.ron` file. Missing fields fall back to the
//! defaults below.

use lumen_engine::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Top-level game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Default log filter for the runner (`RUST_LOG` wins when set)
    pub log_level: LogLevel,

    /// Movement and landing settings
    pub physics: PhysicsConfig,

    /// Player body and attack settings
    pub player: PlayerConfig,

    /// Damage, knockback and feedback settings
    pub combat: CombatConfig,

    /// Breakable crystal settings
    pub crystal: CrystalConfig,

    /// Chain reaction settings
    pub chain: ChainConfig,

    /// Combo counter settings
    pub combo: ComboConfig,

    /// MP economy and ability registry
    pub abilities: AbilityConfig,
}

/// Log filter wrapper so the default is `"info"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

/// Movement and landing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (units/s²)
    pub gravity: f32,

    /// Terminal fall speed (units/s)
    pub max_fall_speed: f32,

    /// Maximum gap between a falling body's bottom and a surface for a landing to register
    pub snap_tolerance: f32,
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Body width
    pub width: f32,

    /// Body height
    pub height: f32,

    /// Starting and maximum health
    pub max_health: i32,

    /// Horizontal run speed (units/s)
    pub run_speed: f32,

    /// Initial upward speed of a jump (units/s)
    pub jump_speed: f32,

    /// Length of one attack swing (seconds); the hitbox is live for the whole swing
    pub attack_duration: f32,

    /// Attack hitbox reach in front of the body
    pub attack_reach: f32,

    /// Attack hitbox height
    pub attack_height: f32,

    /// Seconds of holding attack to reach a full charge
    pub charge_time: f32,

    /// Horizontal speed of a dash (units/s)
    pub dash_speed: f32,

    /// Length of a dash, during which input does not steer (seconds)
    pub dash_time: f32,

    /// Arc bolt projectile speed (units/s)
    pub bolt_speed: f32,

    /// Arc bolt damage
    pub bolt_damage: i32,

    /// Arc bolt flight time (seconds)
    pub bolt_lifetime: f32,
}

/// Combat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Damage dealt to the player by touching an enemy
    pub contact_damage: i32,

    /// Invulnerability window after the player is hurt (seconds)
    pub invulnerability_time: f32,

    /// Knockback applied to the player: horizontal magnitude and vertical impulse
    pub player_knockback: [f32; 2],

    /// Knockback applied to an enemy: horizontal magnitude and vertical impulse
    pub enemy_knockback: [f32; 2],

    /// Rate at which knockback velocity bleeds off (units/s²)
    pub knockback_damping: f32,

    /// Hit-stun window during which an enemy ignores further hits (seconds)
    pub hit_stun: f32,

    /// Death fade duration before an enemy can be removed (seconds)
    pub death_fade: f32,

    /// Lifetime of a floating damage number (seconds)
    pub damage_indicator_lifetime: f32,

    /// Damage for a normal or combo hit
    pub damage_normal: i32,

    /// Damage for a partially charged hit
    pub damage_charged: i32,

    /// Damage for a critical hit
    pub damage_critical: i32,

    /// Charge level at or above which a hit is critical
    pub critical_charge: f32,

    /// Remaining-health fraction at or below which a hit on an enemy is critical
    pub critical_health_fraction: f32,

    /// Combo count at or above which a hit is classified as a combo hit
    pub combo_threshold: u32,

    /// MP awarded per successful hit on an enemy
    pub mp_per_hit: u32,

    /// Hit-pause requested by a regular enemy hit (seconds)
    pub hit_pause: f32,

    /// Hit-pause requested by a critical enemy hit (seconds)
    pub critical_hit_pause: f32,

    /// Camera shake intensity for an enemy hit
    pub shake_intensity: f32,

    /// Camera shake duration for an enemy hit (seconds)
    pub shake_duration: f32,
}

/// Crystal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalConfig {
    /// Time a crystal spends breaking before it is removed (seconds)
    pub break_duration: f32,

    /// Number of shatter fragments spawned on break
    pub shatter_pieces: usize,

    /// Launch speed of shatter fragments (units/s)
    pub piece_speed: f32,

    /// Gravity applied to shatter fragments (units/s²)
    pub piece_gravity: f32,

    /// Hit-pause requested when a crystal is broken directly; `0` disables it.
    ///
    /// Chain-triggered breaks never request one.
    pub hit_pause: f32,
}

/// Chain reaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Maximum center-to-center distance between chain-adjacent crystals
    pub radius: f32,

    /// Delay between a crystal breaking and its neighbours breaking (seconds)
    pub delay: f32,
}

/// Combo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Seconds without a hit after which the combo resets
    pub window: f32,
}

/// A registered ability and its MP cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDef {
    /// Registry key
    pub name: String,

    /// MP spent on activation
    pub cost: u32,
}

/// MP economy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// MP cap
    pub max_mp: u32,

    /// MP at session start
    pub starting_mp: u32,

    /// Abilities available for activation
    pub registry: Vec<AbilityDef>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            max_fall_speed: 900.0,
            snap_tolerance: 8.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 40.0,
            max_health: 5,
            run_speed: 220.0,
            jump_speed: 620.0,
            attack_duration: 0.2,
            attack_reach: 36.0,
            attack_height: 28.0,
            charge_time: 1.0,
            dash_speed: 640.0,
            dash_time: 0.15,
            bolt_speed: 480.0,
            bolt_damage: 1,
            bolt_lifetime: 0.9,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            contact_damage: 1,
            invulnerability_time: 1.0,
            player_knockback: [260.0, -220.0],
            enemy_knockback: [200.0, -150.0],
            knockback_damping: 900.0,
            hit_stun: 0.3,
            death_fade: 0.5,
            damage_indicator_lifetime: 0.8,
            damage_normal: 1,
            damage_charged: 2,
            damage_critical: 3,
            critical_charge: 1.0,
            critical_health_fraction: 0.25,
            combo_threshold: 3,
            mp_per_hit: 2,
            hit_pause: 0.05,
            critical_hit_pause: 0.1,
            shake_intensity: 4.0,
            shake_duration: 0.15,
        }
    }
}

impl Default for CrystalConfig {
    fn default() -> Self {
        Self {
            break_duration: 0.6,
            shatter_pieces: 8,
            piece_speed: 180.0,
            piece_gravity: 900.0,
            hit_pause: 0.0,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            radius: 96.0,
            delay: 0.15,
        }
    }
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self { window: 1.5 }
    }
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            max_mp: 100,
            starting_mp: 0,
            registry: vec![
                AbilityDef { name: "dash".to_string(), cost: 10 },
                AbilityDef { name: "arc_bolt".to_string(), cost: 30 },
            ],
        }
    }
}

impl GameConfig {
    /// Check ranges a parser cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physics.snap_tolerance <= 0.0 {
            return Err(ConfigError::Invalid("snap_tolerance must be positive".to_string()));
        }
        if self.player.width <= 0.0 || self.player.height <= 0.0 {
            return Err(ConfigError::Invalid("player size must be positive".to_string()));
        }
        let durations = [
            ("attack_duration", self.player.attack_duration),
            ("charge_time", self.player.charge_time),
            ("dash_time", self.player.dash_time),
            ("bolt_lifetime", self.player.bolt_lifetime),
            ("invulnerability_time", self.combat.invulnerability_time),
            ("hit_stun", self.combat.hit_stun),
            ("death_fade", self.combat.death_fade),
            ("damage_indicator_lifetime", self.combat.damage_indicator_lifetime),
            ("hit_pause", self.combat.hit_pause),
            ("critical_hit_pause", self.combat.critical_hit_pause),
            ("shake_duration", self.combat.shake_duration),
            ("break_duration", self.crystal.break_duration),
            ("crystal.hit_pause", self.crystal.hit_pause),
            ("chain.delay", self.chain.delay),
            ("combo.window", self.combo.window),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must not be negative")));
        }
        // A swing must not outlast the stun it causes, or it lands twice
        if self.combat.hit_stun < self.player.attack_duration {
            return Err(ConfigError::Invalid("hit_stun must be at least attack_duration".to_string()));
        }
        if self.abilities.starting_mp > self.abilities.max_mp {
            return Err(ConfigError::Invalid("starting_mp exceeds max_mp".to_string()));
        }
        Ok(())
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumen_engine::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_str_with(
            "log_level = \"debug\"\n[chain]\nradius = 64.0\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.log_level.0, "debug");
        assert_relative_eq!(config.chain.radius, 64.0);
        assert_relative_eq!(config.chain.delay, 0.15);
        assert_relative_eq!(config.physics.snap_tolerance, 8.0);
    }

    #[test]
    fn test_ron_abilities() {
        let config = GameConfig::from_str_with(
            "(abilities: (max_mp: 50, registry: [(name: \"blink\", cost: 5)]))",
            ConfigFormat::Ron,
        )
        .unwrap();
        assert_eq!(config.abilities.max_mp, 50);
        assert_eq!(config.abilities.registry.len(), 1);
        assert_eq!(config.abilities.registry[0].name, "blink");
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut config = GameConfig::default();
        config.chain.delay = -0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_hit_stun_shorter_than_swing_rejected() {
        let mut config = GameConfig::default();
        config.combat.hit_stun = 0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.combat.hit_stun = config.player.attack_duration;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_snap_tolerance_rejected() {
        let mut config = GameConfig::default();
        config.physics.snap_tolerance = 0.0;
        assert!(config.validate().is_err());
    }
}
