//! Configuration of [`AgentController`](crate::AgentController).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Parameters of spawn pose sampling.
///
/// Ranges are `[low, high)` and drawn uniformly.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PlacementConfig {
    /// Number of candidates tested before giving up.
    pub max_attempts: usize,

    /// Radius of the sphere that must be free of colliders at the spawn position.
    pub probe_radius: f32,

    /// Distance from the flower along its up axis when spawning in front of it.
    pub in_front_distance: [f32; 2],

    /// Height above the arena center when free floating.
    pub height: [f32; 2],

    /// Horizontal distance from the arena center when free floating.
    pub radius: [f32; 2],

    /// Initial pitch in degrees when free floating.
    pub pitch: [f32; 2],
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            probe_radius: 0.05,
            in_front_distance: [0.05, 0.1],
            height: [1.2, 2.5],
            radius: [2.0, 7.0],
            pitch: [-60.0, 60.0],
        }
    }
}

/// Reward constants.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RewardConfig {
    /// Reward for every contact that yields nectar.
    pub nectar_base: f32,

    /// Additional reward scaled by how well the agent faces the flower.
    pub alignment_bonus: f32,

    /// Reward for touching the arena boundary. Negative.
    pub boundary_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            nectar_base: 0.05,
            alignment_bonus: 0.02,
            boundary_penalty: -0.5,
        }
    }
}

/// Configuration of [`AgentController`](crate::AgentController).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AgentConfig {
    /// Bounded episodes, controller-driven resets and rewards.
    pub training_mode: bool,

    /// Episode length in steps when training. Ignored otherwise.
    pub max_steps: usize,

    /// Force applied per unit of the move action.
    pub move_force: f32,

    /// Pitch speed in degrees per second at full smoothed intent.
    pub pitch_speed: f32,

    /// Yaw speed in degrees per second at full smoothed intent.
    pub yaw_speed: f32,

    /// Maximum change of the smoothed pitch/yaw intent per second.
    pub smoothing_rate: f32,

    /// Pitch is clamped to `[-max_pitch_angle, max_pitch_angle]` degrees.
    pub max_pitch_angle: f32,

    /// Distance from the body origin to the beak tip along the forward axis.
    pub beak_length: f32,

    /// A nectar contact counts only within this distance of the beak tip.
    pub beak_tip_radius: f32,

    /// Nectar requested from a flower per contact.
    pub nectar_per_contact: f32,

    /// Fixed physics time step in seconds.
    pub fixed_delta_time: f32,

    /// Probability of spawning in front of a flower when training.
    pub in_front_probability: f64,

    /// Spawn sampling.
    pub placement: PlacementConfig,

    /// Reward constants.
    pub reward: RewardConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            training_mode: false,
            max_steps: 1500,
            move_force: 2.0,
            pitch_speed: 100.0,
            yaw_speed: 100.0,
            smoothing_rate: 2.0,
            max_pitch_angle: 80.0,
            beak_length: 0.1,
            beak_tip_radius: 0.008,
            nectar_per_contact: 0.01,
            fixed_delta_time: 0.02,
            in_front_probability: 0.9,
            placement: PlacementConfig::default(),
            reward: RewardConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Sets training mode.
    pub fn training_mode(mut self, v: bool) -> Self {
        self.training_mode = v;
        self
    }

    /// Sets the episode length in training mode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the move force.
    pub fn move_force(mut self, v: f32) -> Self {
        self.move_force = v;
        self
    }

    /// Sets the beak length.
    pub fn beak_length(mut self, v: f32) -> Self {
        self.beak_length = v;
        self
    }

    /// Sets the nectar requested per contact.
    pub fn nectar_per_contact(mut self, v: f32) -> Self {
        self.nectar_per_contact = v;
        self
    }

    /// Sets the fixed time step.
    pub fn fixed_delta_time(mut self, v: f32) -> Self {
        self.fixed_delta_time = v;
        self
    }

    /// Sets the probability of spawning in front of a flower in training mode.
    pub fn in_front_probability(mut self, v: f64) -> Self {
        self.in_front_probability = v;
        self
    }

    /// Sets the spawn sampling parameters.
    pub fn placement(mut self, v: PlacementConfig) -> Self {
        self.placement = v;
        self
    }

    /// Sets the reward constants.
    pub fn reward(mut self, v: RewardConfig) -> Self {
        self.reward = v;
        self
    }

    /// Step cap of an episode: finite when training, unbounded otherwise.
    pub fn step_cap(&self) -> Option<usize> {
        match self.training_mode {
            true => Some(self.max_steps),
            false => None,
        }
    }

    /// Constructs [`AgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AgentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
