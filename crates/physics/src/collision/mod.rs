//! Collision queries for character movement.
//!
//! The movement core talks to geometry only through the [`CollisionQuery`]
//! trait. [`CollisionWorld`] is a parry3d-backed implementation hosts can use
//! directly.
//!
//! # Key Types
//!
//! - [`TraceResult`]: Output from a swept shape query
//! - [`CollisionShape`]: Actor shape (capsule or box)
//! - [`ContentFlags`]: Layer mask used to filter bodies
//! - [`CollisionWorld`]: Reference collision environment
//!
//! # Tracing
//!
//! Traces sweep a shape through the world and return:
//! - How far the shape traveled (fraction 0.0-1.0)
//! - The body that was hit, the hit point and its plane normal
//! - Content flags of what was hit

mod capsule;
mod flags;
mod query;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use query::{
    BodyKind, CollisionError, CollisionQuery, Impulse, ImpulseQueue, ImpulseSink, NoImpulses,
    Penetration,
};
pub use trace::{is_walkable, BodyId, CollisionShape, ShapeKind, TraceResult};
pub use world::{CollisionWorld, WorldBody, DEFAULT_CONTACT_OFFSET};
