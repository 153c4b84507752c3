//! Crouch sliding.

use glam::Vec3;

use super::config::MovementConfig;
use super::controller::{along_ground, MovementController};
use super::state::MoveState;

impl MovementController {
    /// One tick of slide movement.
    ///
    /// The slide heading bends towards the downhill side of the ground, speed
    /// bleeds off through slide friction and is fed back by the descent.
    /// A queued jump fires once the slide has slowed enough.
    pub(super) fn slide_movement(
        &mut self,
        state: &mut MoveState,
        config: &MovementConfig,
        delta_time: f32,
    ) {
        let normal = self.ground_normal;

        self.slide_direction += Vec3::new(normal.x, 0.0, normal.z) * self.slide_speed * delta_time;
        self.slide_direction = self.slide_direction.normalize_or_zero();

        let slide_forward = along_ground(normal, self.slide_direction);

        self.slide_speed = (self.slide_speed - config.slide_friction * delta_time)
            .clamp(0.0, config.maximum_slide_speed);
        // Descending (negative y) adds speed
        self.slide_speed -= (slide_forward * self.slide_speed).y
            * delta_time
            * config.downhill_slide_speed_multiplier;

        state.velocity = slide_forward * self.slide_speed;

        if state.wish_jump
            && self.slide_speed < config.minimum_slide_speed * config.slide_speed_multiplier
        {
            self.jump(state, config);
        }
    }
}
