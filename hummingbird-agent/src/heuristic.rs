//! Manual control and simple policies.
use crate::{
    act::{FlowerAct, ACT_DIM},
    env::FlowerEnv,
    flower::FlowerArea,
    observation::FlowerObs,
    physics::PhysicsWorld,
    pose::Pose,
};
use hummingbird_core::{Configurable, Policy};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Directional input flags of a human pilot.
///
/// Opposite flags of one axis resolve to the first of the pair, like a
/// keyboard poll that checks `forward` before `back`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualInput {
    /// Move along the body's forward axis (W).
    pub forward: bool,
    /// Move against the body's forward axis (S).
    pub back: bool,
    /// Move against the body's right axis (A).
    pub left: bool,
    /// Move along the body's right axis (D).
    pub right: bool,
    /// Move along the body's up axis (E).
    pub up: bool,
    /// Move against the body's up axis (C).
    pub down: bool,
    /// Pitch up (arrow up).
    pub pitch_up: bool,
    /// Pitch down (arrow down).
    pub pitch_down: bool,
    /// Turn right (arrow right).
    pub yaw_right: bool,
    /// Turn left (arrow left).
    pub yaw_left: bool,
}

fn axis(positive: bool, negative: bool) -> f32 {
    if positive {
        1.0
    } else if negative {
        -1.0
    } else {
        0.0
    }
}

/// Turns pilot input into an action.
///
/// The selected body axes are summed and normalized, so diagonal input is as
/// strong as straight input and no input stays zero.
pub fn heuristic_action(input: &ManualInput, pose: &Pose) -> FlowerAct {
    let forward = pose.forward() * axis(input.forward, input.back);
    let side = pose.right() * -axis(input.left, input.right);
    let up = pose.up() * axis(input.up, input.down);
    let combined = (forward + side + up).normalize_or_zero();

    FlowerAct::new(
        combined,
        axis(input.pitch_up, input.pitch_down),
        axis(input.yaw_right, input.yaw_left),
    )
}

/// Configuration of [`RandomPolicy`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RandomPolicyConfig {
    /// Seed of the random number generator.
    pub seed: u64,
}

/// Samples every action component uniformly from `[-1, 1)`.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    /// Samples an action.
    pub fn sample_act(&mut self) -> FlowerAct {
        let mut a = [0.0; ACT_DIM];
        for x in a.iter_mut() {
            *x = self.rng.gen_range(-1.0..1.0);
        }
        FlowerAct(a)
    }
}

impl<W: PhysicsWorld, A: FlowerArea> Policy<FlowerEnv<W, A>> for RandomPolicy {
    fn sample(&mut self, _obs: &FlowerObs) -> FlowerAct {
        self.sample_act()
    }
}

impl<W: PhysicsWorld, A: FlowerArea> Configurable<FlowerEnv<W, A>> for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
        }
    }
}
