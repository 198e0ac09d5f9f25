//! Observation of the agent.
use crate::{
    flower::{ArenaFrame, Flower},
    pose::Pose,
};
use glam::{Quat, Vec3};
use hummingbird_core::Obs;

/// Number of scalar features in [`FlowerObs`].
pub const OBS_DIM: usize = 10;

/// Observation of the agent, `OBS_DIM` bounded scalars.
///
/// | index | feature |
/// |-------|---------|
/// | 0..4  | orientation in the arena frame, unit quaternion `(x, y, z, w)` with `w >= 0` |
/// | 4..7  | unit direction from the beak tip to the target's feeding point |
/// | 7     | alignment of that direction with the target's inverted up axis |
/// | 8     | alignment of the body forward axis with the target's inverted up axis |
/// | 9     | beak tip to feeding point distance divided by the arena diameter |
///
/// All features are zero when there is no target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowerObs(pub [f32; OBS_DIM]);

impl FlowerObs {
    /// The no-target observation.
    pub fn zeros() -> Self {
        Self([0.0; OBS_DIM])
    }

    /// Whether this is the no-target observation.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    /// The features as a slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl Obs for FlowerObs {
    fn dummy() -> Self {
        Self::zeros()
    }

    fn len(&self) -> usize {
        OBS_DIM
    }
}

impl From<FlowerObs> for Vec<f32> {
    fn from(obs: FlowerObs) -> Self {
        obs.0.to_vec()
    }
}

/// Orientation relative to the arena with a canonical sign.
fn local_orientation(orientation: Quat, arena: &ArenaFrame) -> Quat {
    let q = (arena.rotation.inverse() * orientation).normalize();
    if q.w < 0.0 {
        -q
    } else {
        q
    }
}

/// Encodes the relation of the agent to its target.
///
/// The distance feature is not clamped and exceeds 1 for targets farther than
/// `arena_diameter`.
pub fn encode(
    pose: &Pose,
    beak_tip: Vec3,
    target: Option<&Flower>,
    arena: &ArenaFrame,
    arena_diameter: f32,
) -> FlowerObs {
    let target = match target {
        Some(target) => target,
        None => return FlowerObs::zeros(),
    };

    let q = local_orientation(pose.orientation, arena);
    let to_flower = target.center - beak_tip;
    let dir = to_flower.normalize_or_zero();
    let inv_up = -target.up.normalize_or_zero();
    let forward = pose.forward().normalize_or_zero();

    FlowerObs([
        q.x,
        q.y,
        q.z,
        q.w,
        dir.x,
        dir.y,
        dir.z,
        dir.dot(inv_up),
        forward.dot(inv_up),
        to_flower.length() / arena_diameter,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pose::euler_to_quat, FlowerId};

    fn flower_ahead(distance: f32) -> Flower {
        Flower {
            id: FlowerId(0),
            position: Vec3::new(0.0, 0.0, -distance - 0.02),
            up: Vec3::Z,
            center: Vec3::new(0.0, 0.0, -distance),
            nectar: 1.0,
        }
    }

    #[test]
    fn test_no_target_is_zero() {
        let obs = encode(
            &Pose::default(),
            Vec3::ZERO,
            None,
            &ArenaFrame::default(),
            20.0,
        );
        assert_eq!(obs.0, [0.0; OBS_DIM]);
        assert!(obs.is_zero());
    }

    #[test]
    fn test_target_ahead_is_aligned() {
        let pose = Pose::default();
        let beak_tip = pose.beak_tip(0.1);
        let flower = flower_ahead(5.0);
        let obs = encode(&pose, beak_tip, Some(&flower), &ArenaFrame::default(), 20.0);

        assert_eq!(&obs.0[0..4], &[0.0, 0.0, 0.0, 1.0]);
        assert!((obs.0[6] + 1.0).abs() < 1e-6);
        assert!((obs.0[7] - 1.0).abs() < 1e-6);
        assert!((obs.0[8] - 1.0).abs() < 1e-6);
        assert!((obs.0[9] - 4.9 / 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_not_clamped() {
        let pose = Pose::default();
        let flower = flower_ahead(50.0);
        let obs = encode(&pose, pose.position, Some(&flower), &ArenaFrame::default(), 20.0);
        assert!((obs.0[9] - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_orientation_is_relative_to_arena() {
        let arena = ArenaFrame {
            center: Vec3::ZERO,
            rotation: euler_to_quat(0.0, 90.0, 0.0),
        };
        let pose = Pose::new(Vec3::ZERO, euler_to_quat(0.0, 90.0, 0.0));
        let obs = encode(&pose, pose.beak_tip(0.1), Some(&flower_ahead(5.0)), &arena, 20.0);
        assert!(Quat::from_xyzw(obs.0[0], obs.0[1], obs.0[2], obs.0[3])
            .abs_diff_eq(Quat::IDENTITY, 1e-5));
        for x in obs.0 {
            assert!(x.is_finite());
        }
    }
}
