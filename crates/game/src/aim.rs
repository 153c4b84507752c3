//! View aiming.
//!
//! Angles are kept in degrees. Positive pitch looks down, yaw 0 faces +Z and
//! grows towards +X.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Degrees turned per unit of mouse delta at sensitivity 1.
pub const DEGREES_PER_COUNT: f32 = 0.022;

/// Pitch and yaw of an actor's view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Degrees, clamped to the pitch limit.
    pub pitch: f32,
    /// Degrees, wrapped to [0, 360).
    pub yaw: f32,
}

impl Aim {
    /// Aim level, facing `yaw` degrees.
    pub fn facing(yaw: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw: wrap_degrees(yaw),
        }
    }

    /// Turn by a mouse delta.
    ///
    /// `delta.0` turns right, `delta.1` looks down (screen space, y grows
    /// downward).
    pub fn turn(&mut self, delta: (f32, f32), sensitivity: f32, pitch_limit: f32) {
        let scale = sensitivity * DEGREES_PER_COUNT;
        let limit = pitch_limit.abs();

        self.pitch = (self.pitch + delta.1 * scale).clamp(-limit, limit);
        self.yaw = wrap_degrees(self.yaw + delta.0 * scale);
    }

    /// View forward direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
    }

    /// View right direction. Always horizontal.
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos_yaw, 0.0, -sin_yaw)
    }

    /// View up direction.
    pub fn up(&self) -> Vec3 {
        self.forward().cross(self.right())
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
