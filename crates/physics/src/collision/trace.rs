//! Trace results and shapes for collision queries.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Opaque handle to a body owned by the collision backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Result of a single swept shape query.
///
/// Traces sweep a shape from `start` towards `end` and report the first
/// blocking contact along the way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// Where the sweep started.
    pub start: Vec3,

    /// Where the sweep was asked to end.
    pub end: Vec3,

    /// Portion of the requested distance travelled before impact.
    ///
    /// - `1.0` = travelled the full distance (no collision)
    /// - `0.0` = blocked immediately at the start
    pub fraction: f32,

    /// Body that blocked the sweep, `None` if unobstructed.
    pub hit_body: Option<BodyId>,

    /// World-space contact point. Only meaningful when something was hit.
    pub hit_point: Vec3,

    /// Surface normal at the contact, pointing away from the hit surface.
    ///
    /// Zero when nothing was hit.
    pub plane_normal: Vec3,

    /// Raw distance travelled along the sweep direction before impact.
    pub distance: f32,

    /// Content flags of the body that was hit.
    pub hit_contents: ContentFlags,
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            fraction: 1.0,
            hit_body: None,
            hit_point: end,
            plane_normal: Vec3::ZERO,
            distance: 0.0,
            hit_contents: ContentFlags::EMPTY,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.hit_body.is_some()
    }

    /// Angle in degrees between world up and the hit normal.
    #[inline]
    pub fn steepness(&self) -> f32 {
        Vec3::Y.angle_between(self.plane_normal).to_degrees()
    }

    /// Whether the trace hit a surface an actor can stand on.
    #[inline]
    pub fn hit_walkable(&self, slope_limit: f32) -> bool {
        self.hit_something() && is_walkable(self.plane_normal, slope_limit)
    }
}

/// Classify a surface normal against a slope limit given in degrees.
///
/// A surface is walkable when `normal.y > cos(slope_limit)`. A surface lying
/// exactly on the limit counts as too steep.
#[inline]
pub fn is_walkable(normal: Vec3, slope_limit: f32) -> bool {
    normal.y > slope_limit.to_radians().cos()
}

/// Discriminant of [`CollisionShape`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Capsule,
    Box,
    Point,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capsule => f.write_str("capsule"),
            Self::Box => f.write_str("box"),
            Self::Point => f.write_str("point"),
        }
    }
}

/// Collision shape of an actor.
///
/// Shapes are centred on the actor origin and never rotate.
///
/// - **Capsule**: a vertical pill. Handles slopes and stairs smoothly.
/// - **Box**: an axis-aligned box.
/// - **Point**: infinitely small. Hosts may use it for their own ray queries
///   but the movement core rejects it for sweeps, overlaps and penetration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// A vertical capsule centred on the origin.
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height from bottom of lower cap to top of upper cap.
        height: f32,
    },

    /// An axis-aligned box, half-size in each axis.
    Box { half_extents: Vec3 },

    /// A single point.
    Point,
}

impl CollisionShape {
    /// Default actor capsule: 1 unit wide, 2 units tall.
    pub const STANDING_CAPSULE: Self = Self::Capsule {
        radius: 0.5,
        height: 2.0,
    };

    /// Default actor box: 1 x 2 x 1.
    pub const STANDING_BOX: Self = Self::Box {
        half_extents: Vec3::new(0.5, 1.0, 0.5),
    };

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Capsule { .. } => ShapeKind::Capsule,
            Self::Box { .. } => ShapeKind::Box,
            Self::Point => ShapeKind::Point,
        }
    }

    /// Total height of the shape.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Box { half_extents } => half_extents.y * 2.0,
            Self::Point => 0.0,
        }
    }

    /// The same shape with a different total height.
    ///
    /// Capsules never get shorter than their diameter.
    pub fn with_height(&self, new_height: f32) -> Self {
        match *self {
            Self::Capsule { radius, .. } => Self::Capsule {
                radius,
                height: new_height.max(radius * 2.0),
            },
            Self::Box { half_extents } => Self::Box {
                half_extents: Vec3::new(half_extents.x, new_height * 0.5, half_extents.z),
            },
            Self::Point => Self::Point,
        }
    }

    /// Half extents of the axis-aligned box enclosing the shape.
    pub fn bounds_half_extents(&self) -> Vec3 {
        match *self {
            Self::Capsule { radius, height } => Vec3::new(radius, height * 0.5, radius),
            Self::Box { half_extents } => half_extents,
            Self::Point => Vec3::ZERO,
        }
    }

    /// Uniformly scaled copy of the shape.
    pub fn scaled(&self, scale: f32) -> Self {
        match *self {
            Self::Capsule { radius, height } => Self::Capsule {
                radius: radius * scale,
                height: height * scale,
            },
            Self::Box { half_extents } => Self::Box {
                half_extents: half_extents * scale,
            },
            Self::Point => Self::Point,
        }
    }
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self::STANDING_CAPSULE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_result_no_hit() {
        let result = TraceResult::no_hit(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!(!result.hit_something());
        assert_eq!(result.fraction, 1.0);
        assert_eq!(result.plane_normal, Vec3::ZERO);
    }

    #[test]
    fn test_walkable_tie_break_is_too_steep() {
        let limit = 45.0_f32;
        let at_limit = Vec3::new(
            limit.to_radians().sin(),
            limit.to_radians().cos(),
            0.0,
        );
        assert!(!is_walkable(at_limit, limit));
        assert!(is_walkable(Vec3::Y, limit));
        assert!(!is_walkable(Vec3::X, limit));
    }

    #[test]
    fn test_with_height() {
        let capsule = CollisionShape::STANDING_CAPSULE.with_height(1.0);
        assert_eq!(capsule.height(), 1.0);

        // Capsule cannot be shorter than its diameter
        let squashed = CollisionShape::STANDING_CAPSULE.with_height(0.2);
        assert_eq!(squashed.height(), 1.0);

        let boxed = CollisionShape::STANDING_BOX.with_height(1.0);
        assert_eq!(boxed.bounds_half_extents(), Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_bounds() {
        let capsule = CollisionShape::Capsule {
            radius: 0.5,
            height: 2.0,
        };
        assert_eq!(capsule.bounds_half_extents(), Vec3::new(0.5, 1.0, 0.5));
        assert_eq!(capsule.kind(), ShapeKind::Capsule);
        assert_eq!(CollisionShape::Point.bounds_half_extents(), Vec3::ZERO);
    }
}
