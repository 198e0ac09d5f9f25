//! Pose of the agent body and the angle convention of the crate.
//!
//! World up is +Y. A body faces −Z, its right is +X and its up is +Y.
//! Euler angles are in degrees: positive pitch raises the nose and positive
//! yaw turns right, i.e. clockwise seen from above. Roll is always zero for
//! orientations produced by this crate.
use glam::{EulerRot, Quat, Vec3};

/// Position and orientation of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in world coordinates.
    pub position: Vec3,

    /// Orientation in world coordinates.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Constructs a pose.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Constructs a pose from pitch and yaw in degrees, zero roll.
    pub fn from_pitch_yaw(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self::new(position, euler_to_quat(pitch, yaw, 0.0))
    }

    /// Unit vector the body faces.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Unit vector to the right of the body.
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Unit vector above the body.
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// The beak tip lies `beak_length` ahead of the body origin.
    pub fn beak_tip(&self, beak_length: f32) -> Vec3 {
        self.position + self.forward() * beak_length
    }
}

/// Rotation of the given pitch, yaw and roll in degrees.
pub fn euler_to_quat(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        -yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Pitch and yaw in degrees of a rotation, each in `(-180, 180]`.
pub fn quat_to_pitch_yaw(q: Quat) -> (f32, f32) {
    let (y, x, _z) = q.to_euler(EulerRot::YXZ);
    (x.to_degrees(), -y.to_degrees())
}

/// Wraps an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Rotation facing `dir` with world +Y resolving roll.
///
/// A zero direction yields the identity.
pub fn look_rotation(dir: Vec3) -> Quat {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = dir.x.atan2(-dir.z).to_degrees();
    euler_to_quat(pitch, yaw, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_axes_convention() {
        let pose = Pose::default();
        assert!(pose.forward().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(pose.right().abs_diff_eq(Vec3::X, EPS));

        // Positive yaw turns right.
        let pose = Pose::from_pitch_yaw(Vec3::ZERO, 0.0, 90.0);
        assert!(pose.forward().abs_diff_eq(Vec3::X, EPS));

        // Positive pitch raises the nose.
        let pose = Pose::from_pitch_yaw(Vec3::ZERO, 30.0, 0.0);
        assert!(pose.forward().y > 0.0);
    }

    #[test]
    fn test_pitch_yaw_round_trip() {
        let (pitch, yaw) = quat_to_pitch_yaw(euler_to_quat(-35.0, 120.0, 0.0));
        assert!((pitch + 35.0).abs() < 1e-3);
        assert!((yaw - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(180.0), -180.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(45.0), 45.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
    }

    #[test]
    fn test_look_rotation() {
        let dir = Vec3::new(1.0, -1.0, 2.0).normalize();
        let pose = Pose::new(Vec3::ZERO, look_rotation(dir));
        assert!(pose.forward().abs_diff_eq(dir, 1e-4));
        // Zero roll: right stays horizontal.
        assert!(pose.right().y.abs() < 1e-4);
        assert_eq!(look_rotation(Vec3::ZERO), Quat::IDENTITY);
    }
}
