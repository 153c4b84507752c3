//! Game simulation - the fixed tick loop.
//!
//! Every tick each player aims, picks up water state, applies its input and
//! moves. Pushes against dynamic bodies are collected during the tick and
//! applied to the world once all players have moved.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use surfmove_physics::movement::InvalidConfig;
use surfmove_physics::{CollisionError, ImpulseQueue, MoveOutcome, MovementConfig};
use thiserror::Error;

use crate::input::PlayerInput;
use crate::level::Level;
use crate::player::{EntityId, Player};

/// Errors that can occur while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

impl From<InvalidConfig> for ConfigError {
    fn from(err: InvalidConfig) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,

    /// Largest look angle above or below the horizon, in degrees.
    pub pitch_limit: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            movement: MovementConfig::default(),
            mouse_sensitivity: 2.0,
            pitch_limit: 89.0,
        }
    }
}

impl SimulationConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }
        if !(0.0..=90.0).contains(&self.pitch_limit) {
            return Err(ConfigError::Invalid(
                "pitch_limit must be within [0, 90] degrees".into(),
            ));
        }
        self.movement.validate()?;
        Ok(())
    }

    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    /// Pushes collected during a tick.
    impulses: ImpulseQueue,

    /// Next entity ID to assign.
    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        Self {
            frame: 0,
            config,
            level,
            players: Vec::new(),
            impulses: ImpulseQueue::new(),
            next_entity_id: 1,
        }
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Result<Self, CollisionError> {
        Ok(Self::new(SimulationConfig::default(), Level::test_arena()?))
    }

    /// Add a player to the simulation.
    ///
    /// Returns the player's ID.
    pub fn add_player(&mut self, name: &str) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;

        let spawn = self.level.player_spawn(self.players.len());
        let player = Player::new(id, name.to_string(), spawn, &self.config.movement);
        log::info!("player {id} ({name}) spawned at {}", spawn.position);

        self.players.push(player);
        id
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get a mutable reference to a player by ID.
    pub fn get_player_mut(&mut self, player_id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Send a player back to its spawn point.
    ///
    /// Returns `false` if there is no such player.
    pub fn reset_player(&mut self, player_id: EntityId) -> bool {
        match self.get_player_mut(player_id) {
            Some(player) => {
                player.reset();
                true
            }
            None => false,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Player inputs indexed by player position in the `players` array
    ///
    /// Returns each player's movement outcome in the same order.
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> Result<Vec<MoveOutcome>, CollisionError> {
        let delta_time = self.config.delta_time();
        let mut outcomes = Vec::with_capacity(self.players.len());

        for (i, player) in self.players.iter_mut().enumerate() {
            // Get input for this player (default if not provided)
            let input = inputs.get(i).cloned().unwrap_or_default();

            let outcome = player.update(
                &input,
                &self.config,
                &self.level.collision,
                &mut self.impulses,
            )?;
            outcomes.push(outcome);
        }

        if !self.impulses.is_empty() {
            log::trace!("applying {} impulses", self.impulses.len());
        }
        self.level.collision.apply_impulses(&mut self.impulses);
        self.level.collision.step_bodies(delta_time);

        self.frame += 1;
        Ok(outcomes)
    }

    /// Position of a level marker's body, if it still exists.
    pub fn marker_body_position(&self, name: &str) -> Option<Vec3> {
        let body = self.level.marker(name)?.body?;
        self.level.collision.body(body).map(|b| b.position())
    }
}

// ============================================================================
// Tests
// ============================================================================
