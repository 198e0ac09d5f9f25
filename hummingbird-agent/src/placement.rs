//! Rejection sampling of collision-free spawn poses.
use crate::{
    config::PlacementConfig,
    error::AgentError,
    flower::{ArenaFrame, Flower},
    physics::OverlapQuery,
    pose::{look_rotation, Pose},
};
use glam::Vec3;
use log::{trace, warn};
use rand::Rng;

/// Where a spawn candidate is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// A short distance in front of a random flower, looking at it.
    InFrontOfFlower,

    /// Anywhere in the arena volume with a random heading.
    FreeFloating,
}

/// Uniform sample from `[range[0], range[1])`; degenerate ranges yield the low end.
fn uniform<R: Rng + ?Sized>(rng: &mut R, range: [f32; 2]) -> f32 {
    if range[1] > range[0] {
        rng.gen_range(range[0]..range[1])
    } else {
        range[0]
    }
}

/// Samples spawn poses that do not overlap any collider.
#[derive(Debug, Clone)]
pub struct PlacementSampler {
    config: PlacementConfig,
}

impl PlacementSampler {
    /// Constructs a sampler.
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Configuration of the sampler.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    fn candidate<R: Rng + ?Sized>(
        &self,
        mode: PlacementMode,
        flowers: &[Flower],
        arena: &ArenaFrame,
        rng: &mut R,
    ) -> Result<Pose, AgentError> {
        match mode {
            PlacementMode::InFrontOfFlower => {
                if flowers.is_empty() {
                    return Err(AgentError::NoFlowers);
                }
                let flower = &flowers[rng.gen_range(0..flowers.len())];
                let distance = uniform(rng, self.config.in_front_distance);
                let position = flower.position + flower.up.normalize_or_zero() * distance;
                let orientation = look_rotation(flower.center - position);
                Ok(Pose::new(position, orientation))
            }
            PlacementMode::FreeFloating => {
                let height = uniform(rng, self.config.height);
                let radius = uniform(rng, self.config.radius);
                let azimuth = uniform(rng, [-180.0, 180.0]);
                let direction = Pose::from_pitch_yaw(Vec3::ZERO, 0.0, azimuth).forward();
                let position = arena.center + Vec3::Y * height + direction * radius;

                let pitch = uniform(rng, self.config.pitch);
                let yaw = uniform(rng, [-180.0, 180.0]);
                Ok(Pose::from_pitch_yaw(position, pitch, yaw))
            }
        }
    }

    /// Draws candidates until one is free of colliders.
    ///
    /// # Errors
    ///
    /// [`AgentError::NoSafePosition`] when all `max_attempts` candidates
    /// overlap something; the arena is too dense or misconfigured and the agent
    /// must not be placed. [`AgentError::NoFlowers`] in
    /// [`PlacementMode::InFrontOfFlower`] without flowers.
    pub fn sample<Q, R>(
        &self,
        mode: PlacementMode,
        flowers: &[Flower],
        arena: &ArenaFrame,
        collision: &Q,
        rng: &mut R,
    ) -> Result<Pose, AgentError>
    where
        Q: OverlapQuery + ?Sized,
        R: Rng + ?Sized,
    {
        let mut attempts_remaining = self.config.max_attempts;
        while attempts_remaining > 0 {
            attempts_remaining -= 1;
            let pose = self.candidate(mode, flowers, arena, rng)?;
            if collision.overlap_count(pose.position, self.config.probe_radius) == 0 {
                trace!(
                    "Spawn {:?} found after {} attempts",
                    mode,
                    self.config.max_attempts - attempts_remaining
                );
                return Ok(pose);
            }
        }

        warn!("No safe spawn position in {:?} mode", mode);
        Err(AgentError::NoSafePosition {
            attempts: self.config.max_attempts,
        })
    }
}
