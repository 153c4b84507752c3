//! The collision contract the movement core is driven against.
//!
//! The core never owns geometry. Every floor probe, wall sweep, overlap test
//! and penetration solve goes through [`CollisionQuery`], and every push on a
//! dynamic body goes out through an [`ImpulseSink`]. Hosts can plug in their
//! own physics backend; [`super::CollisionWorld`] is the bundled one.

use glam::Vec3;
use thiserror::Error;

use super::flags::ContentFlags;
use super::trace::{BodyId, CollisionShape, ShapeKind, TraceResult};

/// Errors reported by a collision backend.
#[derive(Debug, Error)]
pub enum CollisionError {
    /// Queried with a shape the backend cannot sweep, overlap or separate.
    #[error("unsupported collision shape: {kind}")]
    UnsupportedShape { kind: ShapeKind },

    /// Geometry handed to the backend could not be turned into a collider.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl CollisionError {
    pub fn unsupported(shape: &CollisionShape) -> Self {
        Self::UnsupportedShape { kind: shape.kind() }
    }
}

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// World geometry that never moves.
    Static,
    /// Moved by the host, not by impulses.
    Kinematic,
    /// Simulated body that can be pushed.
    Dynamic,
}

/// Minimum translation that separates an actor from one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit direction that moves the actor out of the body.
    pub direction: Vec3,
    /// How far the actor must move along `direction`.
    pub distance: f32,
}

/// Geometric queries the movement core needs from the host.
///
/// All queries are synchronous and shape-polymorphic over capsules and boxes.
/// Any other shape must produce [`CollisionError::UnsupportedShape`] rather
/// than a silent miss.
pub trait CollisionQuery {
    /// Sweep `shape` from `start` to `end`.
    ///
    /// Returns `fraction == 1` and no hit body if unobstructed, otherwise the
    /// first blocking contact. `scale` uniformly scales the swept shape.
    fn trace_shape(
        &self,
        shape: &CollisionShape,
        start: Vec3,
        end: Vec3,
        mask: ContentFlags,
        scale: f32,
    ) -> Result<TraceResult, CollisionError>;

    /// Collect bodies overlapping `shape` at rest at `origin`.
    ///
    /// Trigger volumes are ignored. At most `max_results` bodies are pushed
    /// into `results` (which is cleared first); the return value is the total
    /// number of overlaps found, which may be larger.
    fn overlap_shape(
        &self,
        shape: &CollisionShape,
        origin: Vec3,
        mask: ContentFlags,
        max_results: usize,
        results: &mut Vec<BodyId>,
    ) -> Result<usize, CollisionError>;

    /// Minimum translation separating `shape` at `origin` from `body`.
    fn compute_penetration(
        &self,
        shape: &CollisionShape,
        origin: Vec3,
        body: BodyId,
    ) -> Result<Option<Penetration>, CollisionError>;

    /// Simulation role of `body`.
    fn body_kind(&self, body: BodyId) -> BodyKind;
}

/// Receiver for pushes the core applies to dynamic bodies.
pub trait ImpulseSink {
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec3, point: Vec3);
}

/// A single queued impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    pub body: BodyId,
    pub impulse: Vec3,
    pub point: Vec3,
}

/// Buffers impulses produced during a tick so the host can apply them once
/// all actors have moved.
#[derive(Debug, Default, Clone)]
pub struct ImpulseQueue {
    pending: Vec<Impulse>,
}

impl ImpulseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Impulse> {
        self.pending.iter()
    }

    /// Take every queued impulse, leaving the queue empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Impulse> {
        self.pending.drain(..)
    }
}

impl ImpulseSink for ImpulseQueue {
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec3, point: Vec3) {
        self.pending.push(Impulse {
            body,
            impulse,
            point,
        });
    }
}

/// Sink that drops every impulse, for hosts without dynamic bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImpulses;

impl ImpulseSink for NoImpulses {
    fn apply_impulse(&mut self, _body: BodyId, _impulse: Vec3, _point: Vec3) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_queue_drain() {
        let mut queue = ImpulseQueue::new();
        queue.apply_impulse(BodyId(3), Vec3::X, Vec3::ZERO);
        queue.apply_impulse(BodyId(4), Vec3::Z, Vec3::ONE);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[0].body, BodyId(3));
        assert_eq!(drained[1].impulse, Vec3::Z);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unsupported_shape_message() {
        let err = CollisionError::unsupported(&CollisionShape::Point);
        assert_eq!(err.to_string(), "unsupported collision shape: point");
    }
}
