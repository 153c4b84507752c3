//! Overlap resolution and step climbing.
//!
//! Runs after every movement substep: bodies overlapping the actor push it
//! out, lose the velocity driving into them, and get shoved themselves if
//! they are dynamic. Small ledges are climbed instead of pushed against.

use glam::Vec3;

use crate::collision::{
    is_walkable, BodyId, BodyKind, CollisionError, CollisionQuery, CollisionShape, ContentFlags,
    ImpulseSink,
};

use super::state::MoveState;

/// Length of the ground probe used before climbing a step.
const STEP_GROUND_PROBE: f32 = 0.1;

/// Scale applied to the shape for the wall probe, so the probe starts clear
/// of the ledge the actor is already pressed into.
const STEP_WALL_PROBE_SCALE: f32 = 0.9;

/// Minimum length of the forward probe over a step.
const STEP_MIN_FORWARD: f32 = 0.2;

/// Push the actor out of every body it overlaps.
///
/// `velocity_factor` is the substep's share of the tick's travel and scales
/// both the velocity removed and the impulse handed to dynamic bodies.
/// Overlaps beyond the capacity of `overlaps` are dropped.
///
/// Returns `true` if a step was climbed, which ends the pass early.
#[allow(clippy::too_many_arguments)]
pub fn resolve_collisions<Q: CollisionQuery + ?Sized>(
    query: &Q,
    impulses: &mut dyn ImpulseSink,
    shape: &CollisionShape,
    state: &mut MoveState,
    velocity_factor: f32,
    delta_time: f32,
    overlaps: &mut Vec<BodyId>,
    max_overlaps: usize,
) -> Result<bool, CollisionError> {
    let found = query.overlap_shape(
        shape,
        state.origin,
        ContentFlags::GROUND,
        max_overlaps,
        overlaps,
    )?;
    if found > overlaps.len() {
        log::warn!(
            "{found} overlaps exceed capacity {max_overlaps}, dropping {}",
            found - overlaps.len()
        );
    }

    let forward_velocity = Vec3::new(state.velocity.x, 0.0, state.velocity.z);

    for &body in overlaps.iter() {
        let Some(penetration) = query.compute_penetration(shape, state.origin, body)? else {
            continue;
        };

        if state.step_offset_active()
            && step_offset(query, shape, state, forward_velocity, delta_time)?
        {
            return Ok(true);
        }

        let direction = penetration.direction.normalize_or_zero();
        state.origin += direction * penetration.distance;

        // Only the part of the velocity driving into the body is removed,
        // and never the vertical part
        let into = state.velocity.dot(-direction);
        if into <= 0.0 {
            continue;
        }
        let mut removed = -direction * into;
        removed.y = 0.0;
        state.velocity -= removed * velocity_factor;

        if query.body_kind(body) == BodyKind::Dynamic {
            impulses.apply_impulse(
                body,
                removed * velocity_factor * state.rigidbody_push_force,
                state.origin,
            );
        }
    }

    Ok(false)
}

/// Try to climb a ledge in the direction of travel.
///
/// Five chained sweeps: down to confirm footing, forward to find a wall, up
/// for headroom, forward over the ledge and down onto it. On success the
/// origin is raised by the step height and nudged forward.
pub fn step_offset<Q: CollisionQuery + ?Sized>(
    query: &Q,
    shape: &CollisionShape,
    state: &mut MoveState,
    forward_velocity: Vec3,
    delta_time: f32,
) -> Result<bool, CollisionError> {
    let step = state.step_offset;
    if step <= 0.0 {
        return Ok(false);
    }

    let forward = forward_velocity.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Ok(false);
    }

    let origin = state.origin;
    let slope_limit = state.slope_limit;
    let mask = ContentFlags::GROUND;

    let ground = query.trace_shape(shape, origin, origin - Vec3::Y * STEP_GROUND_PROBE, mask, 1.0)?;
    if !ground.hit_walkable(slope_limit) {
        return Ok(false);
    }

    let wall = query.trace_shape(
        shape,
        origin,
        origin + state.velocity,
        mask,
        STEP_WALL_PROBE_SCALE,
    )?;
    if !wall.hit_something() || is_walkable(wall.plane_normal, slope_limit) {
        return Ok(false);
    }

    let up = query.trace_shape(shape, origin, origin + Vec3::Y * step, mask, 1.0)?;
    let up_distance = if up.hit_something() { up.distance } else { step };
    if up_distance <= 0.0 {
        return Ok(false);
    }
    let up_origin = origin + Vec3::Y * up_distance;

    let across = query.trace_shape(
        shape,
        up_origin,
        up_origin + forward * step.max(STEP_MIN_FORWARD),
        mask,
        1.0,
    )?;
    let forward_distance = if across.hit_something() { across.distance } else { step };
    if forward_distance <= 0.0 {
        return Ok(false);
    }
    let up_forward_origin = up_origin + forward * forward_distance;

    let down = query.trace_shape(
        shape,
        up_forward_origin,
        up_forward_origin - Vec3::Y * up_distance,
        mask,
        1.0,
    )?;
    let down_distance = if down.hit_something() { down.distance } else { up_distance };

    let vertical_step = (up_distance - down_distance).clamp(0.0, step);
    let step_angle = Vec3::Z
        .angle_between(Vec3::new(0.0, vertical_step, forward_distance))
        .to_degrees();
    if step_angle > slope_limit || vertical_step <= 0.0 {
        return Ok(false);
    }

    log::debug!("stepped up {vertical_step:.3} at {origin}");
    state.origin = origin + Vec3::Y * vertical_step + forward * forward_distance * delta_time;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, ImpulseQueue, NoImpulses};

    const ACTOR: CollisionShape = CollisionShape::STANDING_CAPSULE;

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
    fn test_depenetrate_from_wall() {
        let world = create_test_world();
        let mut state = MoveState::new(Vec3::new(9.1, 1.05, 0.0));
        state.velocity = Vec3::new(5.0, -3.0, 2.0);
        let mut overlaps = Vec::new();

        let stepped = resolve_collisions(
            &world,
            &mut NoImpulses,
            &ACTOR,
            &mut state,
            1.0,
            0.1,
            &mut overlaps,
            128,
        )
        .unwrap();

        assert!(!stepped);
        assert!((state.origin.x - 9.0).abs() < 1e-3, "x = {}", state.origin.x);

        // Into-wall component removed, not reflected; vertical untouched
        assert!(state.velocity.x.abs() < 1e-4);
        assert_eq!(state.velocity.y, -3.0);
        assert!((state.velocity.z - 2.0).abs() < 1e-4);

        let remaining = world
            .compute_penetration(&ACTOR, state.origin, overlaps[0])
            .unwrap();
        assert!(remaining.map_or(true, |p| p.distance < 1e-3));
    }

    #[test]
    fn test_velocity_factor_scales_removal() {
        let world = create_test_world();
        let mut state = MoveState::new(Vec3::new(9.1, 1.05, 0.0));
        state.velocity = Vec3::new(4.0, 0.0, 0.0);
        let mut overlaps = Vec::new();

        resolve_collisions(
            &world,
            &mut NoImpulses,
            &ACTOR,
            &mut state,
            0.25,
            0.1,
            &mut overlaps,
            128,
        )
        .unwrap();

        assert!((state.velocity.x - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_moving_away_keeps_velocity() {
        let world = create_test_world();
        let mut state = MoveState::new(Vec3::new(9.1, 1.05, 0.0));
        state.velocity = Vec3::new(-4.0, 0.0, 0.0);
        let mut overlaps = Vec::new();

        resolve_collisions(
            &world,
            &mut NoImpulses,
            &ACTOR,
            &mut state,
            1.0,
            0.1,
            &mut overlaps,
            128,
        )
        .unwrap();

        assert_eq!(state.velocity, Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn test_pushes_dynamic_body() {
        let mut world = CollisionWorld::new();
        let crate_id = world.add_dynamic_box(
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::splat(0.5),
            ContentFlags::SOLID,
            10.0,
        );

        // Actor surface at x=0.6, crate face at x=0.5
        let mut state = MoveState::new(Vec3::new(0.1, 1.0, 0.0));
        state.velocity = Vec3::new(3.0, 0.0, 0.0);
        let mut queue = ImpulseQueue::new();
        let mut overlaps = Vec::new();

        resolve_collisions(&world, &mut queue, &ACTOR, &mut state, 1.0, 0.1, &mut overlaps, 128)
            .unwrap();

        let impulses: Vec<_> = queue.drain().collect();
        assert_eq!(impulses.len(), 1);
        assert_eq!(impulses[0].body, crate_id);
        // Removed velocity (3, 0, 0) times the push force
        assert!((impulses[0].impulse.x - 3.0 * state.rigidbody_push_force).abs() < 1e-3);
    }

    #[test]
    fn test_static_body_gets_no_impulse() {
        let world = create_test_world();
        let mut state = MoveState::new(Vec3::new(9.1, 1.05, 0.0));
        state.velocity = Vec3::new(5.0, 0.0, 0.0);
        let mut queue = ImpulseQueue::new();
        let mut overlaps = Vec::new();

        resolve_collisions(&world, &mut queue, &ACTOR, &mut state, 1.0, 0.1, &mut overlaps, 128)
            .unwrap();
        assert!(queue.is_empty());
    }

    fn step_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        // 0.3 high step starting at x=1
        world.add_box(
            Vec3::new(2.0, 0.15, 0.0),
            Vec3::new(1.0, 0.15, 2.0),
            ContentFlags::SOLID,
        );
        world
    }

    #[test]
    fn test_step_offset_climbs_low_step() {
        let world = step_world();
        let shape = CollisionShape::STANDING_BOX;

        // Pressed 0.01 into the riser
        let mut state = MoveState::new(Vec3::new(0.51, 1.0, 0.0));
        state.velocity = Vec3::new(5.0, 0.0, 0.0);
        state.use_step_offset = true;
        state.step_offset = 0.35;
        let mut overlaps = Vec::new();

        let stepped = resolve_collisions(
            &world,
            &mut NoImpulses,
            &shape,
            &mut state,
            1.0,
            0.1,
            &mut overlaps,
            128,
        )
        .unwrap();

        assert!(stepped);
        assert!((state.origin.y - 1.29).abs() < 0.02, "y = {}", state.origin.y);
        assert!(state.origin.x > 0.51);
        // Velocity is left alone by a climb
        assert_eq!(state.velocity, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_step_offset_needs_horizontal_motion() {
        let world = step_world();
        let shape = CollisionShape::STANDING_BOX;
        let mut state = MoveState::new(Vec3::new(0.51, 1.0, 0.0));
        state.velocity = Vec3::new(0.0, -1.0, 0.0);
        state.step_offset = 0.35;

        let stepped =
            step_offset(&world, &shape, &mut state, Vec3::ZERO, 0.1).unwrap();
        assert!(!stepped);
        assert_eq!(state.origin, Vec3::new(0.51, 1.0, 0.0));
    }

    #[test]
    fn test_step_offset_rejects_tall_ledge() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        // Taller than the step offset
        world.add_box(
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 2.0),
            ContentFlags::SOLID,
        );

        let shape = CollisionShape::STANDING_BOX;
        let mut state = MoveState::new(Vec3::new(0.51, 1.0, 0.0));
        state.velocity = Vec3::new(5.0, 0.0, 0.0);
        state.step_offset = 0.35;

        let velocity = state.velocity;
        let stepped = step_offset(&world, &shape, &mut state, velocity, 0.1).unwrap();
        assert!(!stepped);
    }

    #[test]
    fn test_step_offset_needs_ground() {
        let world = step_world();
        let shape = CollisionShape::STANDING_BOX;

        // Airborne next to the step
        let mut state = MoveState::new(Vec3::new(0.51, 3.0, 0.0));
        state.velocity = Vec3::new(5.0, 0.0, 0.0);
        state.step_offset = 0.35;

        let velocity = state.velocity;
        let stepped = step_offset(&world, &shape, &mut state, velocity, 0.1).unwrap();
        assert!(!stepped);
    }
}
