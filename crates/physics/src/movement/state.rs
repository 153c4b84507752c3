//! Per-actor movement state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How an actor is moved each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    /// No regime velocity is computed. Integration and depenetration still run.
    None,
    /// Ground, air, ladder, water and slide movement.
    #[default]
    Walk,
    /// Free flight along the view basis without collision.
    Noclip,
}

/// Complete movement state for one actor.
///
/// Owned by the actor and mutated in place by the controller every tick.
/// Nothing else may touch it while a tick is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveState {
    /// Position in world space (centre of the collision shape).
    pub origin: Vec3,

    /// Velocity in world space. `y` is the gravity axis.
    pub velocity: Vec3,

    // ========================================================================
    // Input
    // ========================================================================
    /// Raw forward axis in [-1, 1].
    pub forward_axis: f32,

    /// Raw strafe axis in [-1, 1]. Positive is right.
    pub side_axis: f32,

    /// Forward wish velocity scale used by air movement.
    pub forward_move: f32,

    /// Strafe wish velocity scale used by air movement.
    pub side_move: f32,

    pub wish_jump: bool,

    /// Jump is held this tick. Swimming up and water jumps read this.
    pub jump_held: bool,

    pub crouching: bool,
    pub sprinting: bool,

    // ========================================================================
    // Surface
    // ========================================================================
    /// Scales ground acceleration; lowered while leaving the ground.
    pub surface_friction: f32,

    /// Multiplier on gravity.
    pub gravity_factor: f32,

    pub grounded: bool,

    /// Grounded flag as of the end of the previous tick.
    pub was_grounded: bool,

    pub underwater: bool,
    pub camera_underwater: bool,

    // ========================================================================
    // Geometry
    // ========================================================================
    /// Maximum walkable slope in degrees.
    pub slope_limit: f32,

    /// Scale on impulses applied to pushed dynamic bodies.
    pub rigidbody_push_force: f32,

    /// Full standing height of the collision shape.
    pub default_height: f32,

    /// Crouched height as a fraction of `default_height`.
    pub crouching_height: f32,

    /// Rate at which the crouch blend moves.
    pub crouching_speed: f32,

    /// Crouch button toggles instead of being held.
    pub toggle_crouch: bool,

    pub use_step_offset: bool,

    /// Highest ledge the step climb can mount. Zero disables it.
    pub step_offset: f32,

    // ========================================================================
    // Features
    // ========================================================================
    pub sliding_enabled: bool,
    pub ladders_enabled: bool,
    pub angled_ladders_enabled: bool,

    // ========================================================================
    // Ladder (valid while `climbing_ladder`)
    // ========================================================================
    pub climbing_ladder: bool,
    pub ladder_normal: Vec3,

    /// Probe used to check the actor is still on the ladder.
    pub ladder_direction: Vec3,

    /// Climb direction with `y` normalised to one.
    pub ladder_climb_dir: Vec3,
    pub ladder_velocity: Vec3,

    // ========================================================================
    // View
    // ========================================================================
    /// Current eye offset from the origin.
    pub view_offset: Vec3,

    /// Standing eye offset from the origin.
    pub view_offset_default: Vec3,
}

impl Default for MoveState {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            velocity: Vec3::ZERO,

            forward_axis: 0.0,
            side_axis: 0.0,
            forward_move: 0.0,
            side_move: 0.0,
            wish_jump: false,
            jump_held: false,
            crouching: false,
            sprinting: false,

            surface_friction: 1.0,
            gravity_factor: 1.0,
            grounded: false,
            was_grounded: false,
            underwater: false,
            camera_underwater: false,

            slope_limit: 45.0,
            rigidbody_push_force: 2.0,
            default_height: 2.0,
            crouching_height: 0.5,
            crouching_speed: 10.0,
            toggle_crouch: false,
            use_step_offset: false,
            step_offset: 0.35,

            sliding_enabled: false,
            ladders_enabled: false,
            angled_ladders_enabled: false,

            climbing_ladder: false,
            ladder_normal: Vec3::ZERO,
            ladder_direction: Vec3::Z,
            ladder_climb_dir: Vec3::Y,
            ladder_velocity: Vec3::ZERO,

            view_offset: Vec3::new(0.0, 0.6, 0.0),
            view_offset_default: Vec3::new(0.0, 0.6, 0.0),
        }
    }
}

impl MoveState {
    /// Create a new movement state at the given position.
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Eye position in world space.
    pub fn eye_position(&self) -> Vec3 {
        self.origin + self.view_offset
    }

    /// Current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Whether step climbing is active.
    pub fn step_offset_active(&self) -> bool {
        self.use_step_offset && self.step_offset > 0.0
    }

    /// Drop the ladder and clear its sub-state.
    pub fn leave_ladder(&mut self) {
        self.climbing_ladder = false;
        self.ladder_normal = Vec3::ZERO;
        self.ladder_velocity = Vec3::ZERO;
        self.ladder_climb_dir = Vec3::Y;
    }

    /// Clear every movement intent.
    pub fn clear_input(&mut self) {
        self.forward_axis = 0.0;
        self.side_axis = 0.0;
        self.forward_move = 0.0;
        self.side_move = 0.0;
        self.wish_jump = false;
        self.jump_held = false;
    }
}
