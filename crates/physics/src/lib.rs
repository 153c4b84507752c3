//! Surfmove Physics
//!
//! The movement core of a surf-style first person controller: air strafing,
//! bunny hopping, sliding, ladders and swimming on top of swept shape
//! queries.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: the query contract the core consumes (shape sweeps,
//!   overlaps, penetration) and a parry3d-backed reference world
//! - **Movement**: uses those queries to implement actor movement physics
//!
//! # Design Principles
//!
//! 1. **Host agnostic**: geometry is only reached through [`CollisionQuery`]
//! 2. **Owned state**: each actor's [`MoveState`] is mutated by one call at a time
//! 3. **Bounded motion**: integration is substepped so fast actors cannot
//!    tunnel through thin geometry

pub mod collision;
pub mod movement;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use collision::{
    BodyId, BodyKind, CollisionError, CollisionQuery, CollisionShape, CollisionWorld,
    ContentFlags, ImpulseQueue, ImpulseSink, TraceResult,
};
pub use movement::{
    BasicActor, Controllable, InputButtons, MoveInput, MoveOutcome, MoveState, MoveType,
    MovementConfig, MovementController,
};
