//! Underwater movement.

use glam::Vec3;

use crate::collision::{is_walkable, CollisionError, CollisionQuery, ContentFlags};

use super::accelerate::{accelerate_planar, friction};
use super::actor::Controllable;
use super::config::MovementConfig;
use super::controller::{along_ground, flat, flat_dir, MovementController};

/// Reach of the sweep that looks for a ledge to jump out onto.
const WATER_JUMP_PROBE: f32 = 0.1;

impl MovementController {
    /// One tick of swimming.
    ///
    /// Velocity is damped towards zero, sinks under reduced gravity and rises
    /// while jump is held. Horizontal motion uses the ground accelerate and
    /// friction pair with the underwater tuning. Swimming forward into a
    /// steep edge with jump held and the eyes above water launches the actor
    /// out of the pool.
    pub(super) fn underwater_physics<A, Q>(
        &mut self,
        actor: &mut A,
        config: &MovementConfig,
        delta_time: f32,
        query: &Q,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let state = actor.move_state_mut();
        let damping = (config.underwater_velocity_dampening * delta_time).clamp(0.0, 1.0);
        state.velocity = state.velocity.lerp(Vec3::ZERO, damping);

        let grounded = self.check_grounded(actor, config, query)?;

        let right = actor.right();
        let forward = flat_dir(actor.forward());
        let shape = actor.shape();
        let state = actor.move_state_mut();

        if !grounded {
            state.velocity.y -= config.underwater_gravity * delta_time;
        }
        if state.jump_held {
            state.velocity.y += config.swim_up_speed * delta_time;
        }

        // Friction only acts on the horizontal, sinking and swimming up are
        // governed by the terms above
        let mut horizontal = flat(state.velocity);
        friction(
            &mut horizontal,
            config.underwater_deceleration,
            config.underwater_friction,
            delta_time,
        );
        state.velocity.x = horizontal.x;
        state.velocity.z = horizontal.z;

        let normal = self.ground_normal;
        let ground_forward = normal.cross(-right);
        let ground_right = normal.cross(ground_forward);

        let speed = config.underwater_swim_speed;
        let wish_dir = (ground_forward * state.forward_axis + ground_right * state.side_axis)
            .normalize_or_zero();
        let wish_speed = wish_dir.length() * speed;

        let along_slope = along_ground(normal, flat(state.velocity));

        state.velocity += accelerate_planar(
            state.velocity,
            wish_dir,
            wish_speed,
            config.underwater_acceleration,
            delta_time,
        );

        let horizontal = flat(state.velocity).clamp_length_max(config.max_velocity);
        let stored_y = state.velocity.y;
        let slope_speed = along_slope.normalize_or_zero().y * horizontal.length();
        state.velocity = Vec3::new(
            horizontal.x,
            (slope_speed.max(0.0) + stored_y).min(speed),
            horizontal.z,
        );

        let moving_forward = state.velocity.dot(forward) > 0.0;
        if state.jump_held && !state.camera_underwater && moving_forward {
            let origin = state.origin;
            let trace = query.trace_shape(
                &shape,
                origin,
                origin + forward * WATER_JUMP_PROBE,
                ContentFlags::GROUND,
                1.0,
            )?;

            if trace.hit_something() && !is_walkable(trace.plane_normal, state.slope_limit) {
                state.velocity.y = state.velocity.y.max(config.jump_force);
                log::debug!("water jump at {origin}");
            }
        }

        Ok(())
    }
}
