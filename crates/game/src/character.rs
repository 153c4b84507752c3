//! The concrete actor the simulation drives.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use surfmove_physics::{
    BodyId, CollisionShape, CollisionWorld, ContentFlags, Controllable, MoveState, MoveType,
};

use crate::aim::Aim;

/// A first person character.
///
/// Owns its movement state, collision shape and view angles. The view basis
/// handed to the movement core comes from [`Aim`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfCharacter {
    pub move_type: MoveType,

    /// Movement physics state.
    pub state: MoveState,

    shape: CollisionShape,
    ground: Option<BodyId>,

    /// View angles.
    pub aim: Aim,

    /// Velocity of whatever carries the character.
    pub base_velocity: Vec3,

    /// Offsets of attached points (held items, feet markers) from the
    /// origin. Their height follows the shape when crouching.
    pub attachments: Vec<Vec3>,
}

impl SurfCharacter {
    /// A standing capsule character at `origin`, facing `yaw` degrees.
    pub fn new(origin: Vec3, yaw: f32) -> Self {
        Self::with_shape(origin, yaw, CollisionShape::STANDING_CAPSULE)
    }

    /// A character with a custom standing shape.
    pub fn with_shape(origin: Vec3, yaw: f32, shape: CollisionShape) -> Self {
        let state = MoveState {
            default_height: shape.height(),
            sliding_enabled: true,
            ladders_enabled: true,
            use_step_offset: true,
            ..MoveState::new(origin)
        };

        Self {
            move_type: MoveType::Walk,
            state,
            shape,
            ground: None,
            aim: Aim::facing(yaw),
            base_velocity: Vec3::ZERO,
            attachments: Vec::new(),
        }
    }

    /// Get the character's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.state.origin
    }

    /// Get the character's eye position (for camera).
    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.state.eye_position()
    }

    /// Check if the character is standing on something.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.ground.is_some()
    }

    /// Refresh the water flags from the volumes around the body and eye.
    pub fn update_water(&mut self, world: &CollisionWorld) {
        let body = world.point_contents(self.state.origin);
        let eye = world.point_contents(self.eye_position());

        let underwater = body.contains(ContentFlags::WATER);
        if underwater != self.state.underwater {
            log::debug!(
                "{} water at {}",
                if underwater { "entered" } else { "left" },
                self.state.origin
            );
        }

        self.state.underwater = underwater;
        self.state.camera_underwater = eye.contains(ContentFlags::WATER);
    }

    /// Move back to `origin` at rest.
    pub fn reset_position(&mut self, origin: Vec3) {
        self.state.velocity = Vec3::ZERO;
        self.state.origin = origin;
    }
}

impl Controllable for SurfCharacter {
    fn move_type(&self) -> MoveType {
        self.move_type
    }

    fn move_state(&self) -> &MoveState {
        &self.state
    }

    fn move_state_mut(&mut self) -> &mut MoveState {
        &mut self.state
    }

    fn shape(&self) -> CollisionShape {
        self.shape
    }

    fn set_shape(&mut self, shape: CollisionShape) {
        self.shape = shape;
    }

    fn ground_object(&self) -> Option<BodyId> {
        self.ground
    }

    fn set_ground_object(&mut self, ground: Option<BodyId>) {
        self.ground = ground;
    }

    fn forward(&self) -> Vec3 {
        self.aim.forward()
    }

    fn right(&self) -> Vec3 {
        self.aim.right()
    }

    fn up(&self) -> Vec3 {
        self.aim.up()
    }

    fn base_velocity(&self) -> Vec3 {
        self.base_velocity
    }

    fn scale_attachments(&mut self, factor: f32) {
        for offset in &mut self.attachments {
            offset.y *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        // Water surface at y=3
        world.add_box(
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(5.0, 1.5, 5.0),
            ContentFlags::WATER,
        );
        world
    }

    #[test]
    fn test_character_creation() {
        let character = SurfCharacter::new(Vec3::new(0.0, 1.0, 0.0), 90.0);
        assert_eq!(character.shape(), CollisionShape::STANDING_CAPSULE);
        assert_eq!(character.state.default_height, 2.0);
        assert!(!character.on_ground());
        assert!((character.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_fully_submerged() {
        let world = pool_world();
        let mut character = SurfCharacter::new(Vec3::new(0.0, 1.0, 0.0), 0.0);

        character.update_water(&world);

        // Eye at y=1.6 is under the surface too
        assert!(character.state.underwater);
        assert!(character.state.camera_underwater);
    }

    #[test]
    fn test_head_above_water() {
        let world = pool_world();
        let mut character = SurfCharacter::new(Vec3::new(0.0, 2.7, 0.0), 0.0);

        character.update_water(&world);

        assert!(character.state.underwater);
        assert!(!character.state.camera_underwater);

        character.state.origin.y = 10.0;
        character.update_water(&world);
        assert!(!character.state.underwater);
    }

    #[test]
    fn test_attachment_heights_follow_crouch() {
        let mut character = SurfCharacter::new(Vec3::ZERO, 0.0);
        character.attachments.push(Vec3::new(0.3, 0.8, 0.5));

        character.scale_attachments(0.5);
        assert_eq!(character.attachments[0], Vec3::new(0.3, 0.4, 0.5));

        character.scale_attachments(2.0);
        assert_eq!(character.attachments[0], Vec3::new(0.3, 0.8, 0.5));
    }

    #[test]
    fn test_reset_position() {
        let mut character = SurfCharacter::new(Vec3::ZERO, 0.0);
        character.state.velocity = Vec3::new(10.0, -3.0, 2.0);
        character.state.origin = Vec3::new(40.0, 3.0, 40.0);

        character.reset_position(Vec3::new(1.0, 1.0, 1.0));

        assert_eq!(character.position(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(character.state.velocity, Vec3::ZERO);
    }
}
