//! Level layouts
//!
//! A level is a static table of rectangles and spawn points, written in RON
//! (or TOML) with `{x, y, width, height}` rectangles. Conversion to the
//! gameplay [`Aabb`](lumen_engine::physics::Aabb) form happens here and
//! nowhere else.

use lumen_engine::config::{Config, ConfigError};
use lumen_engine::foundation::math::Vec2;
use lumen_engine::physics::{Aabb, DiagonalSegment, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{DiagonalPlatform, Platform, SolidBlock};
use crate::config::PlayerConfig;
use crate::crystal::{CrystalId, CrystalKind, MemoryCrystal};
use crate::enemy::{Enemy, EnemyKind};
use crate::player::Player;
use crate::world::Scene;

/// Level loading errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// Reading or decoding a level file failed
    #[error("Level file error: {0}")]
    Config(#[from] ConfigError),

    /// RON source did not parse
    #[error("Level parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Geometry or spawn data the pipeline cannot handle
    #[error("Invalid level '{level}': {reason}")]
    Invalid {
        /// Level name
        level: String,
        /// What is wrong
        reason: String,
    },
}

/// Enemy placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Which enemy
    pub kind: EnemyKind,
    /// Top-left corner
    pub position: [f32; 2],
    /// Patrol limits `[min_x, max_x]`
    pub patrol: [f32; 2],
}

/// Crystal placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalSpawn {
    /// Tier
    pub kind: CrystalKind,
    /// Top-left corner
    pub position: [f32; 2],
}

/// Static level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Display name
    pub name: String,
    /// Player top-left corner
    pub player_spawn: [f32; 2],
    /// One-way platforms
    #[serde(default)]
    pub platforms: Vec<Rect>,
    /// Solid blocks, floors and walls included
    #[serde(default)]
    pub solid_blocks: Vec<Rect>,
    /// Slopes
    #[serde(default)]
    pub diagonal_platforms: Vec<DiagonalSegment>,
    /// Enemy placements
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    /// Crystal placements
    #[serde(default)]
    pub crystals: Vec<CrystalSpawn>,
}

/// A missing level file falls back to the built-in demo
impl Default for LevelData {
    fn default() -> Self {
        Self::demo()
    }
}

impl Config for LevelData {}

impl LevelData {
    /// Parse a RON level description
    pub fn from_ron_str(source: &str) -> Result<Self, LevelError> {
        Ok(ron::from_str(source)?)
    }

    /// Load a `.ron` or `.toml` level from disk
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, LevelError> {
        let level = Self::load_from_file(path)?;
        level.validate()?;
        Ok(level)
    }

    fn invalid(&self, reason: impl Into<String>) -> LevelError {
        LevelError::Invalid {
            level: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Reject geometry the collision pipeline cannot handle
    pub fn validate(&self) -> Result<(), LevelError> {
        let mut rects = self.platforms.iter().chain(&self.solid_blocks);
        if rects.any(|rect| rect.width <= 0.0 || rect.height <= 0.0) {
            return Err(self.invalid("platforms and blocks need a positive size"));
        }
        if let Some(index) = self.diagonal_platforms.iter().position(|slope| slope.span() <= 0.0) {
            return Err(self.invalid(format!("diagonal platform {index} has no horizontal span")));
        }
        for (index, spawn) in self.enemies.iter().enumerate() {
            let [min_x, max_x] = spawn.patrol;
            if max_x - min_x < spawn.kind.size().x {
                return Err(self.invalid(format!("enemy {index} patrol range is narrower than its body")));
            }
        }
        Ok(())
    }

    /// Build the entity collections for a session
    pub fn build_scene(&self, player: &PlayerConfig) -> Result<Scene, LevelError> {
        self.validate()?;

        let [x, y] = self.player_spawn;
        let mut scene = Scene::new(Player::new(Vec2::new(x, y), player));

        scene.platforms = self
            .platforms
            .iter()
            .map(|&rect| Platform { bounds: Aabb::from(rect) })
            .collect();
        scene.solid_blocks = self
            .solid_blocks
            .iter()
            .map(|&rect| SolidBlock { bounds: Aabb::from(rect) })
            .collect();
        scene.diagonal_platforms = self
            .diagonal_platforms
            .iter()
            .map(|&segment| DiagonalPlatform { segment })
            .collect();
        scene.enemies = self
            .enemies
            .iter()
            .map(|spawn| {
                let [x, y] = spawn.position;
                let [min_x, max_x] = spawn.patrol;
                Enemy::spawn(spawn.kind, Vec2::new(x, y), min_x, max_x)
            })
            .collect();
        scene.crystals = self
            .crystals
            .iter()
            .zip(0..)
            .map(|(spawn, id)| {
                let [x, y] = spawn.position;
                MemoryCrystal::new(CrystalId(id), spawn.kind, Vec2::new(x, y))
            })
            .collect();

        Ok(scene)
    }

    /// Built-in level used by the runner and tests
    pub fn demo() -> Self {
        let rect = |x, y, width, height| Rect { x, y, width, height };
        Self {
            name: "Hall of Echoes".to_string(),
            player_spawn: [60.0, 440.0],
            platforms: vec![rect(200.0, 380.0, 160.0, 12.0), rect(520.0, 300.0, 160.0, 12.0)],
            solid_blocks: vec![
                rect(0.0, 500.0, 960.0, 40.0),
                rect(0.0, 0.0, 20.0, 500.0),
                rect(940.0, 0.0, 20.0, 500.0),
            ],
            diagonal_platforms: vec![DiagonalSegment::new([720.0, 500.0], [900.0, 420.0])],
            enemies: vec![
                EnemySpawn {
                    kind: EnemyKind::Shade,
                    position: [300.0, 472.0],
                    patrol: [20.0, 700.0],
                },
                EnemySpawn {
                    kind: EnemyKind::Wisp,
                    position: [560.0, 240.0],
                    patrol: [520.0, 680.0],
                },
            ],
            crystals: vec![
                CrystalSpawn { kind: CrystalKind::Azure, position: [380.0, 476.0] },
                CrystalSpawn { kind: CrystalKind::Verdant, position: [444.0, 476.0] },
                CrystalSpawn { kind: CrystalKind::Amber, position: [508.0, 476.0] },
                CrystalSpawn { kind: CrystalKind::Violet, position: [600.0, 276.0] },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_builds() {
        let scene = LevelData::demo().build_scene(&PlayerConfig::default()).unwrap();
        assert_eq!(scene.enemies.len(), 2);
        assert_eq!(scene.crystals.len(), 4);
        assert_eq!(scene.solid_blocks.len(), 3);
        assert_eq!(scene.crystals[3].id, CrystalId(3));
    }

    #[test]
    fn test_parse_ron_level() {
        let source = r#"(
            name: "Ledge",
            player_spawn: (10.0, 20.0),
            platforms: [(x: 0.0, y: 100.0, width: 200.0, height: 10.0)],
            diagonal_platforms: [(start: (0.0, 50.0), end: (100.0, 0.0))],
            crystals: [(kind: Amber, position: (40.0, 76.0))],
        )"#;
        let level = LevelData::from_ron_str(source).unwrap();
        assert_eq!(level.name, "Ledge");
        assert!(level.solid_blocks.is_empty());
        assert_eq!(level.crystals[0].kind, CrystalKind::Amber);
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result = LevelData::from_ron_str("(name: \"Broken\"");
        assert!(matches!(result, Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_vertical_slope_rejected() {
        let mut level = LevelData::demo();
        level.diagonal_platforms.push(DiagonalSegment::new([50.0, 0.0], [50.0, 100.0]));
        assert!(matches!(level.validate(), Err(LevelError::Invalid { .. })));
    }

    #[test]
    fn test_narrow_patrol_rejected() {
        let mut level = LevelData::demo();
        level.enemies[0].patrol = [100.0, 110.0];
        let error = level.build_scene(&PlayerConfig::default()).unwrap_err();
        assert!(error.to_string().contains("patrol"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = LevelData::load("/definitely/not/here.ron");
        assert!(matches!(result, Err(LevelError::Config(ConfigError::Io(_)))));
    }
}
