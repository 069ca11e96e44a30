//! Cross-module scenarios driven through [`World`]


use lumen_engine::foundation::math::Vec2;

use crate::config::GameConfig;
use crate::crystal::{CrystalId, MemoryCrystal};
use crate::player::{Player, PlayerInput};
use crate::world::{Scene, World};

const DT: f32 = 1.0 / 60.0;

/// World whose player stands at (100, 100) with no level loaded
fn world_with_player(config: GameConfig) -> World {
    let mut world = World::new(config, 42);
    let player = Player::new(Vec2::new(100.0, 100.0), &world.config().player);
    world.scene = Scene::new(player);
    world
}

/// Step `frames` frames with the same input
fn run(world: &mut World, frames: usize, input: &PlayerInput) {
    for _ in 0..frames {
        world.update(DT, input);
    }
}

fn crystal(world: &World, id: u32) -> Option<&MemoryCrystal> {
    world.scene.crystals.iter().find(|crystal| crystal.id == CrystalId(id))
}

fn swing() -> PlayerInput {
    PlayerInput { attack: true, ..PlayerInput::default() }
}
