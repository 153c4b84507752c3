//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. One config is
//! shared by every actor of an archetype and is never mutated by the core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of clip planes accumulated by a single reflect pass.
pub const MAX_CLIP_PLANES: usize = 5;

/// Default capacity of the overlap scratch buffer.
pub const DEFAULT_MAX_OVERLAPS: usize = 128;

/// A tunable outside its legal range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid movement config: {field} {reason}")]
pub struct InvalidConfig {
    pub field: &'static str,
    pub reason: &'static str,
}

/// Configuration for actor movement physics.
///
/// Units are world units and seconds. Missing fields fall back to their
/// defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Jumping and Gravity
    // ========================================================================
    /// Holding jump re-jumps on every landing.
    pub auto_bhop: bool,

    /// Downward acceleration while airborne (units/second²).
    pub gravity: f32,

    /// Vertical speed added by a jump (units/second).
    pub jump_force: f32,

    // ========================================================================
    // General
    // ========================================================================
    /// Ground friction coefficient.
    pub friction: f32,

    /// Cap on air wish speed when `clamp_air_speed` is set.
    pub max_speed: f32,

    /// Hard cap on velocity magnitude.
    pub max_velocity: f32,

    // ========================================================================
    // Air
    // ========================================================================
    pub clamp_air_speed: bool,

    /// Cap on the wish-aligned speed air acceleration can reach.
    pub air_cap: f32,

    pub air_acceleration: f32,

    /// Surface friction while moving upwards off the ground.
    pub air_friction: f32,

    // ========================================================================
    // Ground
    // ========================================================================
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub acceleration: f32,

    /// Stop speed used by ground friction.
    pub deceleration: f32,

    // ========================================================================
    // Crouch
    // ========================================================================
    pub crouch_speed: f32,
    pub crouch_acceleration: f32,
    pub crouch_deceleration: f32,
    pub crouch_friction: f32,

    // ========================================================================
    // Sliding
    // ========================================================================
    /// Speed above which a crouching actor starts to slide.
    pub minimum_slide_speed: f32,
    pub maximum_slide_speed: f32,

    /// Horizontal speed multiplier applied on slide entry.
    pub slide_speed_multiplier: f32,

    /// Slide speed lost per second.
    pub slide_friction: f32,

    /// How strongly downhill slopes feed slide speed.
    pub downhill_slide_speed_multiplier: f32,

    /// Cooldown after a slide ends before another can start (seconds).
    pub slide_delay: f32,

    // ========================================================================
    // Underwater
    // ========================================================================
    pub swim_up_speed: f32,
    pub underwater_swim_speed: f32,
    pub underwater_acceleration: f32,
    pub underwater_deceleration: f32,
    pub underwater_friction: f32,
    pub underwater_gravity: f32,

    /// Rate at which velocity is damped towards zero while submerged.
    pub underwater_velocity_dampening: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Capacity of the per-controller overlap buffer. Extra overlaps are dropped.
    pub max_overlaps: usize,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            auto_bhop: true,
            gravity: 20.0,
            jump_force: 6.5,

            friction: 6.0,
            max_speed: 6.0,
            max_velocity: 50.0,

            clamp_air_speed: true,
            air_cap: 0.4,
            air_acceleration: 12.0,
            air_friction: 0.4,

            walk_speed: 7.0,
            sprint_speed: 12.0,
            acceleration: 14.0,
            deceleration: 10.0,

            crouch_speed: 4.0,
            crouch_acceleration: 8.0,
            crouch_deceleration: 4.0,
            crouch_friction: 3.0,

            minimum_slide_speed: 9.0,
            maximum_slide_speed: 18.0,
            slide_speed_multiplier: 1.75,
            slide_friction: 14.0,
            downhill_slide_speed_multiplier: 2.5,
            slide_delay: 0.5,

            swim_up_speed: 12.0,
            underwater_swim_speed: 3.0,
            underwater_acceleration: 6.0,
            underwater_deceleration: 3.0,
            underwater_friction: 2.0,
            underwater_gravity: 6.0,
            underwater_velocity_dampening: 2.0,

            max_overlaps: DEFAULT_MAX_OVERLAPS,
        }
    }
}

impl MovementConfig {
    /// Surf tuning: bunny hopping and strong, unclamped air strafing.
    pub fn surf() -> Self {
        Self {
            auto_bhop: true,
            clamp_air_speed: false,
            air_acceleration: 150.0,
            friction: 4.0,
            max_velocity: 60.0,
            ..Default::default()
        }
    }

    /// Classic tuning: jump must be pressed again on every landing.
    pub fn classic() -> Self {
        Self {
            auto_bhop: false,
            clamp_air_speed: true,
            air_acceleration: 10.0,
            walk_speed: 6.0,
            sprint_speed: 9.0,
            ..Default::default()
        }
    }

    /// Target ground speed for the current stance.
    pub fn ground_speed(&self, crouching: bool, sprinting: bool) -> f32 {
        if crouching {
            self.crouch_speed
        } else if sprinting {
            self.sprint_speed
        } else {
            self.walk_speed
        }
    }

    /// Check that every tunable is inside its legal range.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let non_negative = [
            ("gravity", self.gravity),
            ("jump_force", self.jump_force),
            ("friction", self.friction),
            ("max_speed", self.max_speed),
            ("air_cap", self.air_cap),
            ("air_acceleration", self.air_acceleration),
            ("air_friction", self.air_friction),
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("crouch_speed", self.crouch_speed),
            ("crouch_acceleration", self.crouch_acceleration),
            ("crouch_deceleration", self.crouch_deceleration),
            ("crouch_friction", self.crouch_friction),
            ("minimum_slide_speed", self.minimum_slide_speed),
            ("slide_speed_multiplier", self.slide_speed_multiplier),
            ("slide_friction", self.slide_friction),
            ("downhill_slide_speed_multiplier", self.downhill_slide_speed_multiplier),
            ("slide_delay", self.slide_delay),
            ("swim_up_speed", self.swim_up_speed),
            ("underwater_swim_speed", self.underwater_swim_speed),
            ("underwater_acceleration", self.underwater_acceleration),
            ("underwater_deceleration", self.underwater_deceleration),
            ("underwater_friction", self.underwater_friction),
            ("underwater_gravity", self.underwater_gravity),
            ("underwater_velocity_dampening", self.underwater_velocity_dampening),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidConfig {
                    field,
                    reason: "must be a finite, non-negative number",
                });
            }
        }

        if !self.max_velocity.is_finite() || self.max_velocity <= 0.0 {
            return Err(InvalidConfig {
                field: "max_velocity",
                reason: "must be positive",
            });
        }

        if self.minimum_slide_speed > self.maximum_slide_speed {
            return Err(InvalidConfig {
                field: "maximum_slide_speed",
                reason: "must not be below minimum_slide_speed",
            });
        }

        if self.max_overlaps == 0 {
            return Err(InvalidConfig {
                field: "max_overlaps",
                reason: "must be at least 1",
            });
        }

        Ok(())
    }
}
