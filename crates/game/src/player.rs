//! Player entity and state.

use glam::Vec3;
use surfmove_physics::{
    CollisionError, CollisionWorld, ImpulseQueue, MoveOutcome, MovementConfig,
    MovementController,
};

use crate::character::SurfCharacter;
use crate::input::{InputMapper, PlayerInput};
use crate::level::SpawnPoint;
use crate::simulation::SimulationConfig;

/// Unique identifier for entities.
pub type EntityId = u32;

/// A player in the game.
///
/// Pairs a [`SurfCharacter`] with the controller that moves it and the
/// input edge detector feeding it.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    pub character: SurfCharacter,

    /// Where the player entered the level and returns on reset.
    pub spawn: SpawnPoint,

    controller: MovementController,
    input: InputMapper,
}

impl Player {
    /// Create a new player at the given spawn point.
    pub fn new(id: EntityId, name: String, spawn: SpawnPoint, config: &MovementConfig) -> Self {
        Self {
            id,
            name,
            character: SurfCharacter::new(spawn.position, spawn.facing),
            spawn,
            controller: MovementController::new(config),
            input: InputMapper::new(),
        }
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.character.position()
    }

    /// Get the player's eye position (for camera).
    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.character.eye_position()
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.character.state.velocity
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.character.on_ground()
    }

    /// Check if the player is crouching.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.controller.is_crouched()
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.controller.is_sliding()
    }

    /// Run one tick for this player.
    ///
    /// Aims, refreshes the water flags, applies input, then crouches and
    /// moves. Pushes against dynamic bodies are queued in `impulses`.
    pub fn update(
        &mut self,
        input: &PlayerInput,
        config: &SimulationConfig,
        world: &CollisionWorld,
        impulses: &mut ImpulseQueue,
    ) -> Result<MoveOutcome, CollisionError> {
        let delta_time = config.delta_time();

        self.character
            .aim
            .turn(input.mouse_delta, config.mouse_sensitivity, config.pitch_limit);
        self.character.update_water(world);

        let move_input = self.input.map(input);
        self.character.state.apply_input(&move_input, &config.movement);

        self.controller.crouch(&mut self.character, delta_time, world)?;
        self.controller.process_movement(
            &mut self.character,
            &config.movement,
            delta_time,
            world,
            impulses,
        )
    }

    /// Return to the spawn point at rest.
    pub fn reset(&mut self) {
        self.character.reset_position(self.spawn.position);
        log::debug!("player {} reset to {}", self.id, self.spawn.position);
    }
}
