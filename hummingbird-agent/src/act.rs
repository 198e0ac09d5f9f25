//! Action of the agent.
use glam::Vec3;
use hummingbird_core::Act;

/// Number of scalar components in [`FlowerAct`].
pub const ACT_DIM: usize = 5;

/// Continuous action of the agent, each component in `[-1, 1]`.
///
/// * index 0 : move x (+1 = right, -1 = left)
/// * index 1 : move y (+1 = up, -1 = down)
/// * index 2 : move z
/// * index 3 : pitch intent (+1 = pitch up, -1 = pitch down)
/// * index 4 : yaw intent (+1 = turn right, -1 = turn left)
///
/// The move components are a force direction in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowerAct(pub [f32; ACT_DIM]);

impl FlowerAct {
    /// Constructs an action from its parts.
    pub fn new(movement: Vec3, pitch: f32, yaw: f32) -> Self {
        Self([movement.x, movement.y, movement.z, pitch, yaw])
    }

    /// The action with every component clamped into `[-1, 1]`.
    pub fn clamped(&self) -> Self {
        Self(self.0.map(|x| x.clamp(-1.0, 1.0)))
    }

    /// Move direction.
    pub fn movement(&self) -> Vec3 {
        Vec3::new(self.0[0], self.0[1], self.0[2])
    }

    /// Pitch intent.
    pub fn pitch(&self) -> f32 {
        self.0[3]
    }

    /// Yaw intent.
    pub fn yaw(&self) -> f32 {
        self.0[4]
    }
}

impl Act for FlowerAct {
    fn len(&self) -> usize {
        ACT_DIM
    }
}

impl From<Vec<f32>> for FlowerAct {
    /// Missing components are zero and extra ones are dropped.
    fn from(v: Vec<f32>) -> Self {
        let mut a = [0.0; ACT_DIM];
        for (dst, src) in a.iter_mut().zip(v) {
            *dst = src;
        }
        Self(a)
    }
}
