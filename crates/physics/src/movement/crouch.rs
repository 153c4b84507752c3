//! Crouching: shape resize, clearance checks and eye height.
//!
//! The crouch blend (`crouch_lerp`) eases towards the wanted stance while
//! grounded and snaps in the air. Crossing 0.9 swaps in the short shape;
//! standing back up needs a clear sweep over the full height difference.

use glam::Vec3;

use crate::collision::{CollisionError, CollisionQuery, ContentFlags};

use super::actor::Controllable;
use super::controller::MovementController;

/// Blend above which the crouched shape is used.
const CROUCH_THRESHOLD: f32 = 0.9;

/// Airborne actors that let go of crouch below this blend stand up at once.
const AIR_UNCROUCH_SNAP: f32 = 0.95;

impl MovementController {
    /// Update the crouch blend, collision shape and eye offset.
    ///
    /// Call once per tick before [`MovementController::process_movement`].
    pub fn crouch<A, Q>(
        &mut self,
        actor: &mut A,
        delta_time: f32,
        query: &Q,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let grounded = actor.ground_object().is_some();
        let shape = actor.shape();
        let state = actor.move_state();

        let wants_to_crouch = state.crouching;
        let crouching_height = state.crouching_height.clamp(0.01, 1.0);
        let default_height = state.default_height;
        let height_difference = default_height - default_height * crouching_height;

        if grounded {
            self.uncrouch_down = false;
            let target = if wants_to_crouch { 1.0 } else { 0.0 };
            let t = (delta_time * state.crouching_speed).clamp(0.0, 1.0);
            self.crouch_lerp += (target - self.crouch_lerp) * t;
        } else if !wants_to_crouch && self.crouch_lerp < AIR_UNCROUCH_SNAP {
            self.crouch_lerp = 0.0;
        } else if wants_to_crouch {
            self.crouch_lerp = 1.0;
        }

        if self.crouch_lerp > CROUCH_THRESHOLD && !self.crouched {
            self.crouched = true;
            actor.set_shape(shape.with_height(default_height * crouching_height));

            // Keep the feet planted on the ground, the head in place in the air
            let shift = if grounded { Vec3::NEG_Y } else { Vec3::Y };
            actor.move_state_mut().origin += shift * height_difference * 0.5;
            actor.scale_attachments(crouching_height);

            self.uncrouch_down = !grounded;
            log::debug!("crouched ({}, grounded: {grounded})", shape.kind());
        } else if self.crouched {
            let direction = if self.uncrouch_down { Vec3::NEG_Y } else { Vec3::Y };
            let origin = actor.move_state().origin;
            let clearance = query.trace_shape(
                &shape,
                origin,
                origin + direction * height_difference,
                ContentFlags::GROUND,
                1.0,
            )?;
            let can_uncrouch = !clearance.hit_something();

            if can_uncrouch && self.crouch_lerp <= CROUCH_THRESHOLD {
                self.crouched = false;
                actor.set_shape(shape.with_height(default_height));
                actor.move_state_mut().origin += direction * height_difference * 0.5;
                actor.scale_attachments(1.0 / crouching_height);
                log::debug!("stood up");
            }

            if !can_uncrouch {
                self.crouch_lerp = 1.0;
                log::trace!("uncrouch blocked at {origin}");
            }
        }

        let state = actor.move_state_mut();
        let standing = state.view_offset_default;
        let crouched = standing * crouching_height;
        let half_difference = Vec3::Y * height_difference * 0.5;
        state.view_offset = if self.crouched {
            (standing + half_difference).lerp(crouched, self.crouch_lerp)
        } else {
            standing.lerp(crouched - half_difference, self.crouch_lerp)
        };

        Ok(())
    }
}
