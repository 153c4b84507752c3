//! Ladder detection and climbing.

use glam::Vec3;

use crate::collision::{
    is_walkable, CollisionError, CollisionQuery, CollisionShape, ContentFlags,
};

use super::actor::Controllable;
use super::controller::{trace_to_floor, MovementController};

/// Climb speed at full forward input.
const LADDER_CLIMB_SPEED: f32 = 6.0;

/// Rate at which velocity blends towards the climb velocity.
const LADDER_BLEND_RATE: f32 = 10.0;

/// Push away from the ladder when stepping off at the bottom.
const LADDER_DROP_SPEED: f32 = 0.5;

/// Push away from the ladder when jumping off.
const LADDER_JUMP_SPEED: f32 = 4.0;

/// Normals with `|y|` below this count as vertical ladders.
const VERTICAL_LADDER_EPSILON: f32 = 1e-3;

impl MovementController {
    /// Box-cast the actor's bounds along `direction` looking for a ladder.
    ///
    /// `scale` multiplies the bounds half extents per axis. A qualifying hit
    /// latches the ladder if the actor is not already climbing. Without a hit
    /// the actor leaves the ladder, unless the forward box is still inside it.
    pub(super) fn ladder_check<A, Q>(
        &mut self,
        actor: &mut A,
        query: &Q,
        scale: Vec3,
        direction: Vec3,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        if actor.move_state().velocity == Vec3::ZERO {
            return Ok(());
        }

        let probe = CollisionShape::Box {
            half_extents: actor.shape().bounds_half_extents() * scale,
        };
        let reach = direction.length();
        let sweep = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero() * reach;

        let state = actor.move_state_mut();
        let origin = state.origin;
        let trace = query.trace_shape(
            &probe,
            origin,
            origin + sweep,
            ContentFlags::LADDER_QUERY,
            1.0,
        )?;

        let hit_ladder =
            trace.hit_something() && trace.hit_contents.contains(ContentFlags::LADDER);
        let normal = if hit_ladder {
            Some(trace.plane_normal)
        } else if state.climbing_ladder
            && query.overlap_shape(&probe, origin, ContentFlags::LADDER, 1, &mut self.overlaps)? > 0
        {
            // Sweeps skip a ladder the box starts inside. Keep climbing it.
            sweep.try_normalize().map(|dir| -dir)
        } else {
            None
        };

        let climbable = normal.filter(|normal| {
            if state.angled_ladders_enabled {
                normal.y >= 0.0 && !is_walkable(*normal, state.slope_limit)
            } else {
                normal.y.abs() < VERTICAL_LADDER_EPSILON
            }
        });

        let Some(normal) = climbable else {
            if state.climbing_ladder {
                log::debug!("left ladder at {origin}");
            }
            state.leave_ladder();
            return Ok(());
        };

        if !state.climbing_ladder {
            state.climbing_ladder = true;
            state.ladder_normal = normal;
            state.ladder_direction = -normal * reach * 2.0;
            state.ladder_climb_dir = if state.angled_ladders_enabled {
                climb_direction(normal)
            } else {
                Vec3::Y
            };

            log::debug!("climbing ladder at {origin}, normal {normal}");
        }

        Ok(())
    }

    /// One tick on a ladder.
    ///
    /// Forward input climbs, backward descends. Stepping down onto walkable
    /// ground or jumping leaves the ladder.
    pub(super) fn ladder_physics<A, Q>(
        &mut self,
        actor: &mut A,
        delta_time: f32,
        query: &Q,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let state = actor.move_state_mut();
        state.ladder_velocity = state.ladder_climb_dir * state.forward_axis * LADDER_CLIMB_SPEED;
        state.velocity = state
            .velocity
            .lerp(state.ladder_velocity, (delta_time * LADDER_BLEND_RATE).clamp(0.0, 1.0));

        let direction = state.ladder_direction;
        self.ladder_check(actor, query, Vec3::ONE, direction)?;

        let floor = trace_to_floor(actor, query)?;
        let state = actor.move_state_mut();

        if state.forward_axis < 0.0 && floor.hit_walkable(state.slope_limit) {
            state.velocity = state.ladder_normal * LADDER_DROP_SPEED;
            state.leave_ladder();
            log::debug!("stepped off ladder");
        }

        if state.wish_jump {
            state.velocity = state.ladder_normal * LADDER_JUMP_SPEED;
            state.leave_ladder();
            log::debug!("jumped off ladder");
        }

        Ok(())
    }
}

/// Upward direction along a ladder face, scaled so `y` is one.
fn climb_direction(normal: Vec3) -> Vec3 {
    let along = Vec3::Y - normal * normal.y;
    if along.y <= f32::EPSILON {
        return Vec3::Y;
    }
    along / along.y
}
