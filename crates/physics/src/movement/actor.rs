//! The capability interface the controller drives.

use glam::Vec3;

use crate::collision::{BodyId, CollisionShape};

use super::state::{MoveState, MoveType};

/// Anything the movement controller can move.
///
/// The controller only reads the orientation basis; hosts own aiming.
pub trait Controllable {
    fn move_type(&self) -> MoveType;

    fn move_state(&self) -> &MoveState;
    fn move_state_mut(&mut self) -> &mut MoveState;

    /// Current collision shape. Crouching swaps it for a shorter one.
    fn shape(&self) -> CollisionShape;
    fn set_shape(&mut self, shape: CollisionShape);

    /// Body the actor is standing on, `None` while airborne.
    fn ground_object(&self) -> Option<BodyId>;
    fn set_ground_object(&mut self, ground: Option<BodyId>);

    /// View forward direction.
    fn forward(&self) -> Vec3;

    /// View right direction.
    fn right(&self) -> Vec3;

    /// View up direction.
    fn up(&self) -> Vec3;

    /// Velocity inherited from whatever carries the actor, added while
    /// airborne.
    fn base_velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Rescale attached offsets (other than the view) by `factor` when the
    /// shape height changes.
    fn scale_attachments(&mut self, _factor: f32) {}
}

/// Minimal [`Controllable`] with a fixed basis.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicActor {
    pub move_type: MoveType,
    pub state: MoveState,
    pub shape: CollisionShape,
    pub ground: Option<BodyId>,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub base_velocity: Vec3,
}

impl BasicActor {
    /// A walking actor at `origin` facing +Z with a standing capsule.
    pub fn new(origin: Vec3) -> Self {
        Self {
            move_type: MoveType::Walk,
            state: MoveState::new(origin),
            shape: CollisionShape::STANDING_CAPSULE,
            ground: None,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            base_velocity: Vec3::ZERO,
        }
    }

    /// Face along `forward`, keeping the basis level.
    pub fn look_along(&mut self, forward: Vec3) {
        let forward = forward.normalize_or(Vec3::Z);
        self.forward = forward;
        self.right = Vec3::Y.cross(forward).normalize_or(Vec3::X);
        self.up = forward.cross(self.right);
    }
}

impl Controllable for BasicActor {
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
        self.forward
    }

    fn right(&self) -> Vec3 {
        self.right
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn base_velocity(&self) -> Vec3 {
        self.base_velocity
    }
}
