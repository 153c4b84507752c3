//! Bump-and-slide collision response.
//!
//! [`reflect`] clips velocity against the planes it runs into within one
//! movement step. It never moves the origin; positions are integrated later
//! in small substeps, which is why a single bump is enough.

use glam::Vec3;

use crate::collision::{CollisionError, CollisionQuery, CollisionShape, ContentFlags};

use super::config::MAX_CLIP_PLANES;

/// Number of sweeps per reflect call.
const NUM_BUMPS: usize = 1;

/// Plane normals with a larger `y` are treated as floors.
pub const FLOOR_NORMAL_Y: f32 = 0.7;

/// Plane normals with `|y|` below this are treated as walls or steps.
const WALL_NORMAL_EPSILON: f32 = 1e-4;

/// Soft classification of what a reflect pass ran into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockedFlags(pub u8);

impl BlockedFlags {
    pub const NONE: Self = Self(0);

    /// Hit a floor or gentle slope.
    pub const FLOOR: Self = Self(1 << 0);

    /// Hit a vertical wall or step.
    pub const WALL: Self = Self(1 << 1);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOrAssign for BlockedFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Outcome of a [`reflect`] pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectResult {
    pub blocked: BlockedFlags,
    /// Portion of the step's time not covered by the sweep.
    pub time_left: f32,
}

/// Clip velocity against a surface normal.
///
/// This removes the component of velocity going into the surface, scaled by
/// `overbounce`. A second pass cancels any residual into-plane component
/// left by rounding.
pub fn clip_velocity(input: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = input.dot(normal) * overbounce;
    let mut output = input - normal * backoff;

    let adjust = output.dot(normal);
    if adjust < 0.0 {
        output -= normal * adjust;
    }

    output
}

/// Clip `velocity` against whatever it would hit over `delta_time`.
///
/// 1. Sweeps the shape from `origin` along `velocity * time_left`
/// 2. Stops if the sweep is unobstructed
/// 3. Returns untouched on a floor, so no speed bleeds into the gravity axis
/// 4. Otherwise clips against the hit plane, or against every plane seen so
///    far, falling back to the crease between two planes and to a dead stop
///    in a corner of three or more
pub fn reflect<Q: CollisionQuery + ?Sized>(
    query: &Q,
    shape: &CollisionShape,
    origin: Vec3,
    velocity: &mut Vec3,
    delta_time: f32,
) -> Result<ReflectResult, CollisionError> {
    reflect_bumps(query, shape, origin, velocity, delta_time, NUM_BUMPS)
}

pub(crate) fn reflect_bumps<Q: CollisionQuery + ?Sized>(
    query: &Q,
    shape: &CollisionShape,
    origin: Vec3,
    velocity: &mut Vec3,
    delta_time: f32,
    bumps: usize,
) -> Result<ReflectResult, CollisionError> {
    let mut blocked = BlockedFlags::NONE;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    let primal_velocity = *velocity;
    let mut original_velocity = *velocity;

    let mut all_fraction = 0.0;
    let mut time_left = delta_time;

    for _ in 0..bumps {
        if *velocity == Vec3::ZERO {
            break;
        }

        let end = origin + *velocity * time_left;
        let trace = query.trace_shape(shape, origin, end, ContentFlags::GROUND, 1.0)?;

        all_fraction += trace.fraction;
        time_left -= time_left * trace.fraction;

        if trace.fraction > 0.0 {
            // Covered some distance, start over with a fresh plane set
            original_velocity = *velocity;
            num_planes = 0;
        }

        if trace.fraction >= 1.0 {
            break;
        }

        let normal = trace.plane_normal;
        if normal.y > FLOOR_NORMAL_Y {
            blocked |= BlockedFlags::FLOOR;
        }
        if normal.y.abs() < WALL_NORMAL_EPSILON {
            blocked |= BlockedFlags::WALL;
        }

        if num_planes >= MAX_CLIP_PLANES {
            *velocity = Vec3::ZERO;
            break;
        }

        planes[num_planes] = normal;
        num_planes += 1;

        if num_planes == 1 {
            if normal.y > FLOOR_NORMAL_Y {
                return Ok(ReflectResult { blocked, time_left });
            }

            let clipped = clip_velocity(original_velocity, normal, 1.0);
            *velocity = clipped;
            original_velocity = clipped;
            continue;
        }

        // Find a plane whose clip keeps us out of all the others
        let planes = &planes[..num_planes];
        let along_plane = (0..planes.len()).any(|i| {
            *velocity = clip_velocity(original_velocity, planes[i], 1.0);
            planes
                .iter()
                .enumerate()
                .all(|(j, plane)| j == i || velocity.dot(*plane) >= 0.0)
        });

        if !along_plane {
            if planes.len() != 2 {
                *velocity = Vec3::ZERO;
                break;
            }

            let crease = planes[0].cross(planes[1]).normalize_or_zero();
            *velocity = crease * crease.dot(*velocity);
        }

        // Turned back against the original direction, stop dead to avoid
        // oscillating in acute corners
        if velocity.dot(primal_velocity) <= 0.0 {
            *velocity = Vec3::ZERO;
            break;
        }
    }

    if all_fraction == 0.0 {
        *velocity = Vec3::ZERO;
    }

    Ok(ReflectResult { blocked, time_left })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit, ScriptedQuery};

    const SHAPE: CollisionShape = CollisionShape::STANDING_CAPSULE;

    #[test]
    fn test_clip_velocity_wall() {
        // Moving into a wall on the +X side
        let velocity = Vec3::new(10.0, 0.0, 5.0);
        let wall_normal = Vec3::new(-1.0, 0.0, 0.0);

        let clipped = clip_velocity(velocity, wall_normal, 1.0);

        // X component should be zeroed, Z unchanged
        assert!(clipped.x.abs() < 1e-6);
        assert!((clipped.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_velocity_parallel_is_unchanged() {
        let velocity = Vec3::new(0.0, 3.0, 5.0);
        let clipped = clip_velocity(velocity, Vec3::X, 1.3);
        assert_eq!(clipped, velocity);
    }

    #[test]
    fn test_clip_velocity_overbounce_never_points_into_plane() {
        let normal = Vec3::new(0.0, 0.6, 0.8);
        let clipped = clip_velocity(Vec3::new(1.0, -7.0, -3.0), normal, 1.5);
        assert!(clipped.dot(normal) >= -1e-5);
    }

    #[test]
    fn test_reflect_unobstructed() {
        let query = ScriptedQuery::open();
        let mut velocity = Vec3::new(4.0, -2.0, 1.0);

        let result = reflect(&query, &SHAPE, Vec3::ZERO, &mut velocity, 0.1).unwrap();

        assert_eq!(velocity, Vec3::new(4.0, -2.0, 1.0));
        assert_eq!(result.time_left, 0.0);
        assert!(result.blocked.is_empty());
    }

    #[test]
    fn test_reflect_wall_clips_velocity() {
        let query = ScriptedQuery::with_traces(vec![hit(0.5, Vec3::NEG_X)]);
        let mut velocity = Vec3::new(10.0, 0.0, 5.0);

        let result = reflect(&query, &SHAPE, Vec3::ZERO, &mut velocity, 0.1).unwrap();

        assert!(velocity.x.abs() < 1e-6);
        assert!((velocity.z - 5.0).abs() < 1e-6);
        assert!(result.blocked.contains(BlockedFlags::WALL));
        assert!((result.time_left - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_floor_keeps_velocity() {
        let query = ScriptedQuery::with_traces(vec![hit(0.25, Vec3::Y)]);
        let mut velocity = Vec3::new(3.0, -8.0, 0.0);

        let result = reflect(&query, &SHAPE, Vec3::ZERO, &mut velocity, 0.1).unwrap();

        assert_eq!(velocity, Vec3::new(3.0, -8.0, 0.0));
        assert!(result.blocked.contains(BlockedFlags::FLOOR));
    }

    #[test]
    fn test_reflect_blocked_at_start_stops() {
        let query = ScriptedQuery::with_traces(vec![hit(0.0, Vec3::NEG_X)]);
        let mut velocity = Vec3::new(10.0, 0.0, 5.0);

        reflect(&query, &SHAPE, Vec3::ZERO, &mut velocity, 0.1).unwrap();
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_reflect_acute_wedge_slides_along_crease() {
        // Two walls meeting at an acute angle; clipping against either one
        // pushes into the other, leaving only the vertical crease
        let a = Vec3::new(-1.0, 0.0, 2.0).normalize();
        let b = Vec3::new(-1.0, 0.0, -2.0).normalize();
        let query = ScriptedQuery::with_traces(vec![hit(0.0, a), hit(0.0, b)]);
        let mut velocity = Vec3::new(5.0, 1.0, 0.0);

        reflect_bumps(&query, &SHAPE, Vec3::ZERO, &mut velocity, 0.1, 3).unwrap();

        assert!(velocity.x.abs() < 1e-4);
        assert!(velocity.z.abs() < 1e-4);
        assert!((velocity.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_corner_stops() {
        let query = ScriptedQuery::with_traces(vec![
            hit(0.0, Vec3::NEG_X),
            hit(0.0, Vec3::NEG_Z),
            hit(0.0, Vec3::new(-1.0, 0.0, -1.0).normalize()),
        ]);
        let mut velocity = Vec3::new(5.0, 0.0, 5.0);

        reflect_bumps(&query, &SHAPE, Vec3::ZERO, &mut velocity, 0.1, 3).unwrap();
        assert_eq!(velocity, Vec3::ZERO);
    }
}
