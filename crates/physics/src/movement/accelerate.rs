//! Friction and acceleration primitives.
//!
//! These are the velocity-space building blocks of every movement regime.
//! None of them look at geometry.

use glam::Vec3;

/// Speeds below this are treated as standing still by [`friction`].
pub const FRICTION_EPSILON: f32 = 0.000_190_5;

/// Apply friction to `velocity`.
///
/// Speeds under `stop_speed` lose speed as if moving at `stop_speed`, so slow
/// actors come to a complete halt instead of creeping.
pub fn friction(velocity: &mut Vec3, stop_speed: f32, friction: f32, delta_time: f32) {
    let speed = velocity.length();
    if speed < FRICTION_EPSILON {
        return;
    }

    let control = speed.max(stop_speed);
    let drop = control * friction * delta_time;

    let new_speed = (speed - drop).max(0.0);
    if new_speed != speed {
        *velocity *= new_speed / speed;
    }
}

/// Velocity to add so the speed along `wish_dir` approaches `wish_speed`.
///
/// Returns zero when the actor already moves at least `wish_speed` along
/// `wish_dir`.
pub fn accelerate(
    current_velocity: Vec3,
    wish_dir: Vec3,
    wish_speed: f32,
    accel: f32,
    delta_time: f32,
    surface_friction: f32,
) -> Vec3 {
    let current_speed = current_velocity.dot(wish_dir);
    let add_speed = wish_speed - current_speed;
    if add_speed <= 0.0 {
        return Vec3::ZERO;
    }

    let accel_speed = (accel * delta_time * wish_speed * surface_friction).min(add_speed);
    wish_dir * accel_speed
}

/// Ground and underwater acceleration.
///
/// Like [`accelerate`] without surface friction, and only the horizontal
/// component is added; the vertical axis is left to slope reprojection.
pub fn accelerate_planar(
    current_velocity: Vec3,
    wish_dir: Vec3,
    wish_speed: f32,
    accel: f32,
    delta_time: f32,
) -> Vec3 {
    let added = accelerate(current_velocity, wish_dir, wish_speed, accel, delta_time, 1.0);
    Vec3::new(added.x, 0.0, added.z)
}

/// Air acceleration.
///
/// The wish-aligned speed target is capped at `air_cap`, but the acceleration
/// rate still scales with the uncapped `wish_speed`. Strafing sideways keeps
/// the wish-aligned speed near zero, so speed can keep building while turning.
pub fn air_accelerate(
    velocity: Vec3,
    wish_dir: Vec3,
    wish_speed: f32,
    accel: f32,
    air_cap: f32,
    delta_time: f32,
) -> Vec3 {
    let capped = wish_speed.min(air_cap);

    let current_speed = velocity.dot(wish_dir);
    let add_speed = capped - current_speed;
    if add_speed <= 0.0 {
        return Vec3::ZERO;
    }

    let accel_speed = (accel * wish_speed * delta_time).min(add_speed);
    wish_dir * accel_speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friction_slows_down() {
        let mut velocity = Vec3::new(10.0, 0.0, 0.0);
        friction(&mut velocity, 1.0, 4.0, 0.1);

        // drop = 10 * 4 * 0.1 = 4
        assert!((velocity.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_friction_uses_stop_speed_below_control() {
        let mut velocity = Vec3::new(0.5, 0.0, 0.0);
        friction(&mut velocity, 10.0, 6.0, 1.0 / 60.0);

        // drop = 10 * 6 / 60 = 1 > 0.5, so the actor stops dead
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_friction_ignores_tiny_speeds() {
        let mut velocity = Vec3::new(0.0001, 0.0, 0.0);
        friction(&mut velocity, 10.0, 6.0, 1.0);
        assert_eq!(velocity, Vec3::new(0.0001, 0.0, 0.0));
    }

    #[test]
    fn test_accelerate_from_rest() {
        let added = accelerate(Vec3::ZERO, Vec3::X, 7.0, 14.0, 0.01, 1.0);
        // 14 * 0.01 * 7 = 0.98
        assert!((added.x - 0.98).abs() < 1e-5);
    }

    #[test]
    fn test_accelerate_caps_at_wish_speed() {
        let added = accelerate(Vec3::new(6.9, 0.0, 0.0), Vec3::X, 7.0, 14.0, 1.0, 1.0);
        assert!((added.x - 0.1).abs() < 1e-5);

        let none = accelerate(Vec3::new(8.0, 0.0, 0.0), Vec3::X, 7.0, 14.0, 1.0, 1.0);
        assert_eq!(none, Vec3::ZERO);
    }

    #[test]
    fn test_accelerate_scales_with_surface_friction() {
        let full = accelerate(Vec3::ZERO, Vec3::X, 7.0, 14.0, 0.01, 1.0);
        let air = accelerate(Vec3::ZERO, Vec3::X, 7.0, 14.0, 0.01, 0.4);
        assert!((air.x - full.x * 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_accelerate_planar_ignores_vertical() {
        let wish = Vec3::new(1.0, -1.0, 0.0).normalize();
        let added = accelerate_planar(Vec3::ZERO, wish, 7.0, 14.0, 0.01);
        assert_eq!(added.y, 0.0);
        assert!(added.x > 0.0);
    }

    #[test]
    fn test_air_accelerate_respects_cap() {
        // Already moving at the cap along the wish direction
        let added = air_accelerate(Vec3::new(0.4, 0.0, 0.0), Vec3::X, 6.0, 12.0, 0.4, 0.01);
        assert_eq!(added, Vec3::ZERO);

        // Strafing perpendicular to current velocity still gains speed
        let added = air_accelerate(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 6.0, 12.0, 0.4, 0.01);
        assert!((added.z - 0.4).abs() < 1e-5);
    }
}
