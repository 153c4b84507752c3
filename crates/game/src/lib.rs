//! Surfmove Game Logic
//!
//! The host side of the movement core:
//!
//! - Characters that implement [`Controllable`]
//! - Mouse aiming and key input mapping
//! - Water detection from level volumes
//! - Level construction and the fixed-tick simulation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Game Simulation                          │
//! │  ┌─────────┐    ┌──────────────┐    ┌──────────────────────┐  │
//! │  │ Input   │───►│ Movement     │───►│ Level                │  │
//! │  │ (keys,  │    │ (crouch,     │    │ (collision world,    │  │
//! │  │  mouse) │    │  controller) │    │  pushed bodies)      │  │
//! │  └─────────┘    └──────────────┘    └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod aim;
pub mod character;
pub mod input;
pub mod level;
pub mod player;
pub mod simulation;

// Re-export main types
pub use aim::Aim;
pub use character::SurfCharacter;
pub use input::{InputMapper, PlayerInput};
pub use level::{Level, SpawnPoint};
pub use player::{EntityId, Player};
pub use simulation::{ConfigError, Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use surfmove_physics::{
    CollisionError, CollisionWorld, ContentFlags, Controllable, MoveOutcome, MoveState,
    MovementConfig, MovementController,
};
