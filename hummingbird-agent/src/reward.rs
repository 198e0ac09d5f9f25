//! Reward shaping.
use crate::config::RewardConfig;

/// Computes rewards of contact events.
///
/// Stateless; accumulating the rewards is up to the caller.
#[derive(Debug, Clone)]
pub struct RewardShaper {
    config: RewardConfig,
}

impl RewardShaper {
    /// Constructs a shaper.
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Reward of a contact that yielded nectar.
    ///
    /// `alignment` is the dot product of the agent's forward axis with the
    /// flower's inverted up axis; only its `[0, 1]` part earns a bonus.
    pub fn on_nectar_fed(&self, _amount: f32, alignment: f32) -> f32 {
        self.config.nectar_base + self.config.alignment_bonus * alignment.clamp(0.0, 1.0)
    }

    /// Reward of hitting the arena boundary.
    pub fn on_boundary_collision(&self) -> f32 {
        self.config.boundary_penalty
    }
}
