//! Surfmove - headless demo driver
//!
//! Runs the test arena with one scripted player and logs its movement.
//!
//! ```text
//! surfmove [CONFIG.json] [TICKS]
//! ```
//!
//! Set `RUST_LOG=debug` to see regime changes (ladders, slides, crouching).

use anyhow::{Context, Result};
use glam::Vec3;
use surfmove_game::input::{ActionInput, MovementInput};
use surfmove_game::{Level, PlayerInput, Simulation, SimulationConfig};

const DEFAULT_TICKS: u64 = 600;

/// What the scripted player does on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Walk,
    Jump,
    Sprint,
    Slide,
    Ladder,
}

impl Phase {
    fn at(tick: u64) -> Self {
        match tick % 400 {
            0..=59 => Phase::Walk,
            60..=149 => Phase::Jump,
            150..=189 => Phase::Sprint,
            190..=249 => Phase::Slide,
            _ => Phase::Ladder,
        }
    }

    fn input(self, tick: u64) -> PlayerInput {
        let actions = match self {
            Phase::Walk | Phase::Ladder => ActionInput::default(),
            // Tap jump every half second
            Phase::Jump => ActionInput {
                jump: tick % 30 < 3,
                ..Default::default()
            },
            Phase::Sprint => ActionInput {
                sprint: true,
                ..Default::default()
            },
            Phase::Slide => ActionInput {
                sprint: true,
                crouch: true,
                ..Default::default()
            },
        };

        PlayerInput {
            movement: MovementInput {
                forward: true,
                ..Default::default()
            },
            mouse_delta: (0.0, 0.0),
            actions,
            frame: tick as u32,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::load(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => SimulationConfig::default(),
    };
    let ticks = match args.next() {
        Some(ticks) => ticks
            .parse::<u64>()
            .with_context(|| format!("invalid tick count: {ticks}"))?,
        None => DEFAULT_TICKS,
    };

    let level = Level::test_arena().context("failed to build test arena")?;
    let ladder_foot = level
        .marker("ladder")
        .map(|m| m.position)
        .context("test arena has no ladder")?;

    let mut simulation = Simulation::new(config, level);
    let player_id = simulation.add_player("Player1");

    log::info!(
        "running {ticks} ticks at {} Hz",
        simulation.config.tick_rate
    );

    let mut phase = None;
    for tick in 0..ticks {
        let next = Phase::at(tick);
        if phase != Some(next) {
            log::info!("tick {tick}: {next:?}");
            let player = simulation
                .get_player_mut(player_id)
                .context("player disappeared")?;
            match next {
                Phase::Walk => player.reset(),
                // Start at the foot of the ladder facing its face
                Phase::Ladder => {
                    player.character.reset_position(ladder_foot);
                    player.character.aim.yaw = 180.0;
                }
                _ => {}
            }
            phase = Some(next);
        }

        let outcomes = simulation.tick(&[next.input(tick)])?;

        if tick % 10 == 0 {
            let player = simulation
                .get_player(player_id)
                .context("player disappeared")?;
            let velocity = player.velocity();
            let horizontal = Vec3::new(velocity.x, 0.0, velocity.z).length();
            log::info!(
                "tick {tick:4} pos {:>6.2} {:>6.2} {:>6.2} speed {horizontal:5.2} vy {:>6.2} ground {} crouch {} slide {} ladder {} substeps {}",
                player.position().x,
                player.position().y,
                player.position().z,
                velocity.y,
                player.on_ground(),
                player.is_crouching(),
                player.is_sliding(),
                player.character.state.climbing_ladder,
                outcomes.first().map_or(0, |o| o.substeps),
            );
        }
    }

    let player = simulation
        .get_player(player_id)
        .context("player disappeared")?;
    log::info!(
        "finished at {} after {} ticks",
        player.position(),
        simulation.frame
    );

    Ok(())
}
