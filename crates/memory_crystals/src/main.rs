//! Headless runner
//!
//! Plays a level with scripted input and logs a summary, which is handy for
//! profiling and for checking that two runs with the same seed agree.
//!
//! ```text
//! memory_crystals [config.toml|config.ron] [level.ron] [frames]
//! ```

use std::error::Error;

use lumen_engine::config::Config;
use lumen_engine::foundation::logging;
use lumen_engine::foundation::time::FrameTimer;
use memory_crystals::prelude::*;

const DEFAULT_FRAMES: u32 = 600;
const FRAME_TIME: f32 = 1.0 / 60.0;
const SEED: u64 = 0x5eed;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;
    logging::init_with_filter(&config.log_level.0);

    let level = match args.next() {
        Some(path) => LevelData::load(path)?,
        None => LevelData::demo(),
    };
    let frames = args.next().map(|arg| arg.parse::<u32>()).transpose()?.unwrap_or(DEFAULT_FRAMES);

    let mut world = World::new(config, SEED);
    world.load_level(&level)?;

    let mut timer = FrameTimer::new();
    let mut events = 0usize;
    for frame in 0..frames {
        world.update(FRAME_TIME, &scripted_input(frame));
        events += world.feedback.drain_events().len();
        timer.update();

        if world.scene.player.is_defeated() {
            log::warn!("Player defeated on frame {frame}");
            break;
        }
    }

    let player = &world.scene.player;
    log::info!(
        "'{}' finished: {} frames simulated, {} frozen, {} events",
        world.level_name(),
        world.frame(),
        world.paused_frames(),
        events
    );
    log::info!(
        "Player: health {}/{}, experience {}, MP {}/{}, best combo {}",
        player.health,
        player.max_health,
        player.experience,
        world.feedback.abilities.mp(),
        world.feedback.abilities.max_mp(),
        world.feedback.combo.best()
    );
    log::info!(
        "Remaining: {} enemies, {} crystals, {} chain triggers fired; {:.0} fps",
        world.scene.enemies.len(),
        world.scene.crystals.len(),
        world.chain().triggers_fired(),
        timer.average_fps()
    );

    Ok(())
}

/// Walk right swinging, then charge, dash and cast on the way back
fn scripted_input(frame: u32) -> PlayerInput {
    let heading_right = frame < 360;
    PlayerInput {
        move_axis: if heading_right { 1.0 } else { -1.0 },
        jump: frame % 150 == 100,
        attack: frame % 12 == 0,
        charging: (380..440).contains(&frame),
        dash: frame == 300,
        cast: frame % 90 == 45,
    }
}
