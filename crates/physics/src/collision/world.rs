//! Reference collision world backed by parry3d.
//!
//! Stores static, kinematic and dynamic bodies and answers the queries in
//! [`CollisionQuery`]. Box actors are swept with `query::cast_shapes`, overlap
//! with `query::intersection_test` and take penetration from
//! `query::contact`. Capsule actors go through [`super::capsule`].

use glam::Vec3;
use parry3d::bounding_volume::{Aabb, BoundingVolume};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, ShapeCastOptions, ShapeCastStatus};
use parry3d::shape::SharedShape;

use super::capsule::Capsule;
use super::flags::ContentFlags;
use super::query::{BodyKind, CollisionError, CollisionQuery, ImpulseQueue, Penetration};
use super::trace::{BodyId, CollisionShape, TraceResult};

/// Default skin kept between swept shapes and the surfaces they hit, as a
/// fraction of the shape's size. Swept shapes are scaled by `1 - offset`.
pub const DEFAULT_CONTACT_OFFSET: f32 = 0.01;

/// Length of the ray used to re-sample the plane normal at a sweep hit.
const NORMAL_PROBE_LENGTH: f32 = 0.002;

/// A body in the collision world.
#[derive(Debug, Clone)]
pub struct WorldBody {
    pub id: BodyId,
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    pub contents: ContentFlags,
    pub kind: BodyKind,
    /// Linear velocity, only integrated for dynamic bodies.
    pub velocity: Vec3,
    pub inverse_mass: f32,
}

impl WorldBody {
    pub fn position(&self) -> Vec3 {
        to_vec3(&self.transform.translation.vector)
    }

    fn blocks(&self, mask: ContentFlags) -> bool {
        mask.intersects(self.contents) && !self.contents.contains(ContentFlags::TRIGGER)
    }

    /// Whether the body's bounding box reaches the box `mins..maxs`.
    fn touches_bounds(&self, mins: Vec3, maxs: Vec3) -> bool {
        let bounds = Aabb::new(
            Point::new(mins.x, mins.y, mins.z),
            Point::new(maxs.x, maxs.y, maxs.z),
        );
        self.shape.compute_aabb(&self.transform).intersects(&bounds)
    }
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Static boxes, convex hulls and triangle meshes
/// - Kinematic boxes the host moves by hand
/// - Dynamic boxes that actors can push
#[derive(Debug)]
pub struct CollisionWorld {
    bodies: Vec<WorldBody>,
    contact_offset: f32,
    /// Fraction of dynamic body velocity lost per second.
    linear_damping: f32,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            contact_offset: DEFAULT_CONTACT_OFFSET,
            linear_damping: 2.0,
        }
    }

    pub fn with_contact_offset(mut self, contact_offset: f32) -> Self {
        self.contact_offset = contact_offset.clamp(0.0, 0.5);
        self
    }

    pub fn contact_offset(&self) -> f32 {
        self.contact_offset
    }

    /// Add a static axis-aligned box.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> BodyId {
        self.push_body(
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            translation(center),
            contents,
            BodyKind::Static,
            0.0,
        )
    }

    /// Add a box the host moves with [`CollisionWorld::set_body_position`].
    pub fn add_kinematic_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        contents: ContentFlags,
    ) -> BodyId {
        self.push_body(
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            translation(center),
            contents,
            BodyKind::Kinematic,
            0.0,
        )
    }

    /// Add a pushable box with the given mass.
    pub fn add_dynamic_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        contents: ContentFlags,
        mass: f32,
    ) -> BodyId {
        let inverse_mass = if mass > 0.0 { mass.recip() } else { 0.0 };
        self.push_body(
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            translation(center),
            contents,
            BodyKind::Dynamic,
            inverse_mass,
        )
    }

    /// Add a static convex hull built from `points`.
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        contents: ContentFlags,
    ) -> Result<BodyId, CollisionError> {
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();

        let shape = SharedShape::convex_hull(&parry_points).ok_or_else(|| {
            CollisionError::InvalidGeometry(format!(
                "convex hull of {} points is degenerate",
                points.len()
            ))
        })?;

        Ok(self.push_body(shape, Isometry::identity(), contents, BodyKind::Static, 0.0))
    }

    /// Add a static triangle mesh.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Mesh vertex positions
    /// * `indices` - Triangle indices (3 per triangle)
    /// * `contents` - Content flags for collision filtering
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        contents: ContentFlags,
    ) -> Result<BodyId, CollisionError> {
        let parry_vertices: Vec<Point<Real>> =
            vertices.iter().map(|v| Point::new(v.x, v.y, v.z)).collect();

        let shape = SharedShape::trimesh(parry_vertices, indices.to_vec())
            .map_err(|err| CollisionError::InvalidGeometry(format!("triangle mesh: {err:?}")))?;

        Ok(self.push_body(shape, Isometry::identity(), contents, BodyKind::Static, 0.0))
    }

    /// Remove all bodies.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, id: BodyId) -> Option<&WorldBody> {
        self.bodies.get(id.0 as usize)
    }

    /// Teleport a body. Used for kinematic platforms.
    pub fn set_body_position(&mut self, id: BodyId, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(id.0 as usize) {
            body.transform = translation(position);
        }
    }

    /// Union of the content flags of every volume containing `point`.
    pub fn point_contents(&self, point: Vec3) -> ContentFlags {
        let p = Point::new(point.x, point.y, point.z);
        self.bodies
            .iter()
            .filter(|body| body.shape.contains_point(&body.transform, &p))
            .fold(ContentFlags::EMPTY, |acc, body| acc | body.contents)
    }

    /// Apply and clear every queued impulse. Non-dynamic targets are skipped.
    pub fn apply_impulses(&mut self, queue: &mut ImpulseQueue) {
        for impulse in queue.drain() {
            let Some(body) = self.bodies.get_mut(impulse.body.0 as usize) else {
                log::warn!("impulse for unknown {}", impulse.body);
                continue;
            };
            if body.kind != BodyKind::Dynamic {
                continue;
            }
            body.velocity += impulse.impulse * body.inverse_mass;
        }
    }

    /// Integrate dynamic body velocities with linear damping.
    ///
    /// There is no gravity or body-vs-body response; dynamic bodies simply
    /// slide until damping stops them.
    pub fn step_bodies(&mut self, dt: f32) {
        let keep = (1.0 - self.linear_damping * dt).max(0.0);
        for body in self.bodies.iter_mut().filter(|b| b.kind == BodyKind::Dynamic) {
            if body.velocity == Vec3::ZERO {
                continue;
            }
            let position = body.position() + body.velocity * dt;
            body.transform = translation(position);
            body.velocity *= keep;
            if body.velocity.length_squared() < 1e-8 {
                body.velocity = Vec3::ZERO;
            }
        }
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_body(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        contents: ContentFlags,
        kind: BodyKind,
        inverse_mass: f32,
    ) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(WorldBody {
            id,
            shape,
            transform,
            contents,
            kind,
            velocity: Vec3::ZERO,
            inverse_mass,
        });
        id
    }

    /// Re-sample the surface normal with a short ray through the hit point.
    ///
    /// Swept normals on edges and compound colliders are interpolated; the ray
    /// returns the face normal instead.
    fn probe_normal(&self, body: &WorldBody, hit_point: Vec3, direction: Vec3) -> Option<Vec3> {
        let origin = hit_point - direction * (NORMAL_PROBE_LENGTH * 0.5);
        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            to_vector(direction),
        );
        body.shape
            .cast_ray_and_get_normal(&body.transform, &ray, NORMAL_PROBE_LENGTH, true)
            .map(|hit| to_vec3(&hit.normal))
            .filter(|normal| normal.length_squared() > 0.25)
    }
}

impl CollisionQuery for CollisionWorld {
    fn trace_shape(
        &self,
        shape: &CollisionShape,
        start: Vec3,
        end: Vec3,
        mask: ContentFlags,
        scale: f32,
    ) -> Result<TraceResult, CollisionError> {
        let scaled = shape.scaled(scale);
        let swept = ActorShape::new(&scaled, 1.0 - self.contact_offset)?;

        let delta = end - start;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return Ok(TraceResult::no_hit(start, end));
        }
        let direction = delta / distance;

        let half = scaled.bounds_half_extents();
        let (mins, maxs) = (start.min(end) - half, start.max(end) + half);

        let mut closest: Option<(&WorldBody, Contact)> = None;
        for body in self.bodies.iter().filter(|b| b.blocks(mask) && b.touches_bounds(mins, maxs)) {
            let Some(hit) = swept.sweep(start, direction, distance, body) else {
                continue;
            };

            let is_closer = closest
                .as_ref()
                .map_or(true, |(_, best)| hit.distance < best.distance);
            if is_closer {
                closest = Some((body, hit));
            }
        }

        let Some((body, hit)) = closest else {
            return Ok(TraceResult::no_hit(start, end));
        };

        let plane_normal = self
            .probe_normal(body, hit.point, direction)
            .unwrap_or(hit.normal)
            .normalize_or_zero();

        Ok(TraceResult {
            start,
            end,
            fraction: (hit.distance / distance).min(1.0),
            hit_body: Some(body.id),
            hit_point: hit.point,
            plane_normal,
            distance: hit.distance,
            hit_contents: body.contents,
        })
    }

    fn overlap_shape(
        &self,
        shape: &CollisionShape,
        origin: Vec3,
        mask: ContentFlags,
        max_results: usize,
        results: &mut Vec<BodyId>,
    ) -> Result<usize, CollisionError> {
        let actor = ActorShape::new(shape, 1.0)?;
        let half = shape.bounds_half_extents();

        results.clear();
        let mut found = 0;
        for body in self.bodies.iter().filter(|b| b.blocks(mask)) {
            if body.touches_bounds(origin - half, origin + half) && actor.intersects(origin, body) {
                found += 1;
                if results.len() < max_results {
                    results.push(body.id);
                }
            }
        }

        Ok(found)
    }

    fn compute_penetration(
        &self,
        shape: &CollisionShape,
        origin: Vec3,
        body: BodyId,
    ) -> Result<Option<Penetration>, CollisionError> {
        let actor = ActorShape::new(shape, 1.0)?;
        Ok(self.body(body).and_then(|body| actor.penetration(origin, body)))
    }

    fn body_kind(&self, body: BodyId) -> BodyKind {
        self.body(body).map_or(BodyKind::Static, |b| b.kind)
    }
}

/// First contact of a sweep against one body, in world space.
#[derive(Debug, Clone, Copy)]
struct Contact {
    distance: f32,
    point: Vec3,
    normal: Vec3,
}

/// An actor shape ready for queries.
///
/// Boxes go straight to parry. Capsules use the segment queries in
/// [`super::capsule`].
enum ActorShape {
    Capsule(Capsule),
    Parry(SharedShape),
}

impl ActorShape {
    /// Build the query shape, with every dimension scaled by `shrink`.
    fn new(shape: &CollisionShape, shrink: f32) -> Result<Self, CollisionError> {
        match *shape {
            CollisionShape::Capsule { radius, height } => {
                Ok(Self::Capsule(Capsule::new(radius, height, shrink)))
            }
            CollisionShape::Box { half_extents } => {
                let half = half_extents * shrink;
                Ok(Self::Parry(SharedShape::cuboid(half.x, half.y, half.z)))
            }
            CollisionShape::Point => Err(CollisionError::unsupported(shape)),
        }
    }

    fn sweep(&self, start: Vec3, direction: Vec3, distance: f32, body: &WorldBody) -> Option<Contact> {
        match self {
            Self::Capsule(capsule) => capsule
                .sweep(start, direction, distance, body.shape.as_ref(), &body.transform)
                .map(|hit| Contact {
                    distance: hit.distance,
                    point: hit.point,
                    normal: hit.normal,
                }),
            Self::Parry(shape) => {
                let mut options = ShapeCastOptions::with_max_time_of_impact(distance);
                options.stop_at_penetration = false;

                let hit = query::cast_shapes(
                    &translation(start),
                    &to_vector(direction),
                    shape.as_ref(),
                    &body.transform,
                    &Vector::zeros(),
                    body.shape.as_ref(),
                    options,
                )
                .ok()
                .flatten()?;

                // Bodies already overlapping the shape are left to depenetration
                if hit.status == ShapeCastStatus::PenetratingOrWithinTargetDist {
                    return None;
                }

                let point = body.transform * hit.witness2;
                Some(Contact {
                    distance: hit.time_of_impact,
                    point: to_vec3(&point.coords),
                    normal: to_vec3(&(body.transform.rotation * hit.normal2.into_inner())),
                })
            }
        }
    }

    fn intersects(&self, origin: Vec3, body: &WorldBody) -> bool {
        match self {
            Self::Capsule(capsule) => {
                capsule.gap(origin, body.shape.as_ref(), &body.transform) < 0.0
            }
            Self::Parry(shape) => query::intersection_test(
                &translation(origin),
                shape.as_ref(),
                &body.transform,
                body.shape.as_ref(),
            )
            .unwrap_or(false),
        }
    }

    fn penetration(&self, origin: Vec3, body: &WorldBody) -> Option<Penetration> {
        match self {
            Self::Capsule(capsule) => {
                capsule.penetration(origin, body.shape.as_ref(), &body.transform)
            }
            Self::Parry(shape) => {
                let contact = query::contact(
                    &translation(origin),
                    shape.as_ref(),
                    &body.transform,
                    body.shape.as_ref(),
                    0.0,
                )
                .ok()
                .flatten()?;

                // Negative distance means penetration
                (contact.dist < 0.0).then(|| Penetration {
                    direction: -to_vec3(&contact.normal1.into_inner()),
                    distance: -contact.dist,
                })
            }
        }
    }
}

pub(super) fn translation(position: Vec3) -> Isometry<Real> {
    Isometry::translation(position.x, position.y, position.z)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub(super) fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ImpulseSink;

    const ACTOR: CollisionShape = CollisionShape::Capsule {
        radius: 0.5,
        height: 2.0,
    };

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor, top face at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Wall, near face at x=9.5
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 10.0),
            ContentFlags::SOLID,
        );

        world
    }

    #[test]
    fn test_trace_capsule_hits_wall() {
        let world = create_test_world();

        let result = world
            .trace_shape(
                &ACTOR,
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(15.0, 1.0, 0.0),
                ContentFlags::GROUND,
                1.0,
            )
            .unwrap();

        assert!(result.hit_something());
        assert!(result.fraction < 1.0);
        // Shrunk radius is 0.495
        assert!((result.distance - 9.005).abs() < 0.01, "distance {}", result.distance);
        assert!((result.plane_normal - Vec3::NEG_X).length() < 0.01);
        assert!((result.hit_point.x - 9.5).abs() < 0.01);
    }

    #[test]
    fn test_trace_box_lands_on_floor() {
        let world = create_test_world();
        let shape = CollisionShape::STANDING_BOX;

        let result = world
            .trace_shape(
                &shape,
                Vec3::new(0.0, 3.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                ContentFlags::GROUND,
                1.0,
            )
            .unwrap();

        assert!(result.hit_something());
        assert!((result.plane_normal - Vec3::Y).length() < 0.01);
        // Box bottom (shrunk half height 0.99) reaches y=0 after ~2.01 units
        assert!((result.distance - 2.01).abs() < 0.01);
    }

    #[test]
    fn test_trace_miss() {
        let world = create_test_world();

        let result = world
            .trace_shape(
                &ACTOR,
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-5.0, 1.0, 0.0),
                ContentFlags::GROUND,
                1.0,
            )
            .unwrap();

        assert!(!result.hit_something());
        assert_eq!(result.fraction, 1.0);
    }

    #[test]
    fn test_trace_point_is_unsupported() {
        let world = create_test_world();

        let result = world.trace_shape(
            &CollisionShape::Point,
            Vec3::ZERO,
            Vec3::X,
            ContentFlags::GROUND,
            1.0,
        );

        assert!(matches!(result, Err(CollisionError::UnsupportedShape { .. })));
    }

    #[test]
    fn test_trace_ignores_triggers_and_masked_bodies() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 5.0),
            ContentFlags::SOLID | ContentFlags::TRIGGER,
        );
        world.add_box(
            Vec3::new(5.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 5.0),
            ContentFlags::WATER,
        );

        let result = world
            .trace_shape(
                &ACTOR,
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(10.0, 1.0, 0.0),
                ContentFlags::GROUND,
                1.0,
            )
            .unwrap();

        assert!(!result.hit_something());
    }

    #[test]
    fn test_overlap_and_penetration() {
        let world = create_test_world();
        let mut overlaps = Vec::new();

        // Sunk 0.2 into the floor
        let origin = Vec3::new(0.0, 0.8, 0.0);
        let found = world
            .overlap_shape(&ACTOR, origin, ContentFlags::GROUND, 128, &mut overlaps)
            .unwrap();
        assert_eq!(found, 1);
        assert_eq!(overlaps, vec![BodyId(0)]);

        let penetration = world
            .compute_penetration(&ACTOR, origin, overlaps[0])
            .unwrap()
            .expect("should penetrate floor");
        assert!((penetration.direction - Vec3::Y).length() < 0.01);
        assert!((penetration.distance - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_capsule_on_floor_centre_axis() {
        let world = create_test_world();
        let mut overlaps = Vec::new();

        for (height, sunk) in [(0.2, 0.8), (0.45, 0.55), (0.8, 0.2), (0.99, 0.01)] {
            let origin = Vec3::new(0.0, height, 0.0);
            let found = world
                .overlap_shape(&ACTOR, origin, ContentFlags::GROUND, 128, &mut overlaps)
                .unwrap();
            assert_eq!(found, 1, "no floor overlap at y={height}");
            assert_eq!(overlaps, vec![BodyId(0)]);

            let penetration = world
                .compute_penetration(&ACTOR, origin, BodyId(0))
                .unwrap()
                .expect("should penetrate floor");
            assert!((penetration.direction - Vec3::Y).length() < 1e-3);
            assert!((penetration.distance - sunk).abs() < 1e-3, "y={height}");
        }

        // Resting exactly on the floor is not an overlap
        let found = world
            .overlap_shape(&ACTOR, Vec3::new(0.0, 1.001, 0.0), ContentFlags::GROUND, 128, &mut overlaps)
            .unwrap();
        assert_eq!(found, 0);
    }

    #[test]
    fn test_trace_fraction_is_share_of_requested_distance() {
        let world = create_test_world();
        let start = Vec3::new(0.0, 1.0, 0.0);

        let long = world
            .trace_shape(&ACTOR, start, Vec3::new(18.0, 1.0, 0.0), ContentFlags::GROUND, 1.0)
            .unwrap();
        assert_eq!(long.hit_body, Some(BodyId(1)));
        assert!((long.fraction * 18.0 - long.distance).abs() < 1e-4);
        assert!((long.fraction - 9.005 / 18.0).abs() < 1e-3);

        // Stopping short of the wall is a clear path
        let short = world
            .trace_shape(&ACTOR, start, Vec3::new(8.9, 1.0, 0.0), ContentFlags::GROUND, 1.0)
            .unwrap();
        assert!(!short.hit_something());
        assert_eq!(short.fraction, 1.0);

        // Ending on the contact point never reports more than the full distance
        let touching = world
            .trace_shape(&ACTOR, start, Vec3::new(9.005, 1.0, 0.0), ContentFlags::GROUND, 1.0)
            .unwrap();
        assert!(touching.fraction <= 1.0);
        if touching.hit_something() {
            assert!((touching.fraction * 9.005 - touching.distance).abs() < 1e-4);
        }
    }

    #[test]
    fn test_overlap_respects_capacity() {
        let mut world = CollisionWorld::new();
        for i in 0..4 {
            world.add_box(
                Vec3::new(i as f32 * 0.1, 0.0, 0.0),
                Vec3::splat(1.0),
                ContentFlags::SOLID,
            );
        }

        let mut overlaps = Vec::new();
        let found = world
            .overlap_shape(&ACTOR, Vec3::ZERO, ContentFlags::GROUND, 2, &mut overlaps)
            .unwrap();
        assert_eq!(found, 4);
        assert_eq!(overlaps.len(), 2);
    }

    #[test]
    fn test_point_contents() {
        let mut world = create_test_world();
        world.add_box(
            Vec3::new(-10.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 2.0),
            ContentFlags::WATER,
        );

        assert!(world.point_contents(Vec3::new(-10.0, 0.5, 0.0)).contains(ContentFlags::WATER));
        assert!(world.point_contents(Vec3::new(0.0, -0.25, 0.0)).contains(ContentFlags::SOLID));
        assert!(world.point_contents(Vec3::new(0.0, 5.0, 0.0)).is_empty());
    }

    #[test]
    fn test_impulses_push_dynamic_bodies_only() {
        let mut world = create_test_world();
        let crate_id = world.add_dynamic_box(
            Vec3::new(0.0, 0.5, 5.0),
            Vec3::splat(0.5),
            ContentFlags::SOLID,
            2.0,
        );

        let mut queue = ImpulseQueue::new();
        queue.apply_impulse(crate_id, Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO);
        queue.apply_impulse(BodyId(0), Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO);
        world.apply_impulses(&mut queue);
        assert!(queue.is_empty());

        assert_eq!(world.body(crate_id).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(world.body(BodyId(0)).unwrap().velocity, Vec3::ZERO);

        world.step_bodies(0.1);
        let moved = world.body(crate_id).unwrap().position();
        assert!((moved.x - 0.2).abs() < 1e-4);
        assert_eq!(world.body_kind(crate_id), BodyKind::Dynamic);
    }

    #[test]
    fn test_invalid_mesh() {
        let mut world = CollisionWorld::new();
        let result = world.add_triangle_mesh(&[Vec3::ZERO, Vec3::X, Vec3::Z], &[], ContentFlags::SOLID);
        assert!(matches!(result, Err(CollisionError::InvalidGeometry(_))));
        assert_eq!(world.body_count(), 0);
    }
}
