//! Actor movement physics.
//!
//! This module implements surf-style first person movement with:
//!
//! - Ground and air movement with different physics
//! - Air strafing and bunny hopping
//! - Crouching and crouch sliding
//! - Ladders and swimming
//! - Bump-and-slide collision response with substepped depenetration
//! - Step climbing
//!
//! # Design
//!
//! Movement is driven by a [`MovementController`], one per actor, through
//! the [`Controllable`] interface. The actor owns its [`MoveState`]; the
//! controller only keeps what has to survive between ticks. Geometry is
//! reached through [`CollisionQuery`](crate::collision::CollisionQuery) so
//! any backend can host the core.
//!
//! Everything is synchronous. One call in, one result out.

mod accelerate;
mod actor;
mod config;
mod controller;
mod crouch;
mod depenetrate;
mod input;
mod ladder;
mod slide;
mod slide_move;
mod state;
mod water;

pub use accelerate::{accelerate, accelerate_planar, air_accelerate, friction, FRICTION_EPSILON};
pub use actor::{BasicActor, Controllable};
pub use config::{InvalidConfig, MovementConfig, DEFAULT_MAX_OVERLAPS, MAX_CLIP_PLANES};
pub use controller::{
    MoveOutcome, MovementController, GROUND_PROBE_DISTANCE, MAX_SUBSTEP_DISTANCE,
};
pub use depenetrate::{resolve_collisions, step_offset};
pub use input::{InputButtons, MoveInput};
pub use slide_move::{clip_velocity, reflect, BlockedFlags, ReflectResult, FLOOR_NORMAL_Y};
pub use state::{MoveState, MoveType};
