//! Flowers and the flower-area collaborator.
use anyhow::Result;
use glam::{Quat, Vec3};
use std::fmt;

/// Identity of a flower within its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowerId(pub usize);

impl fmt::Display for FlowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flower#{}", self.0)
    }
}

/// A snapshot of a flower as seen by the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    /// Identity.
    pub id: FlowerId,

    /// Position of the flower, used for nearest-flower ranking.
    pub position: Vec3,

    /// Direction the flower opens towards. Approaching against it is ideal.
    pub up: Vec3,

    /// Feeding point.
    pub center: Vec3,

    /// Remaining nectar.
    pub nectar: f32,
}

impl Flower {
    /// Whether any nectar is left.
    pub fn has_nectar(&self) -> bool {
        self.nectar > 0.0
    }
}

/// Placement of the arena in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaFrame {
    /// Center of the arena floor.
    pub center: Vec3,

    /// Rotation of the arena.
    pub rotation: Quat,
}

impl Default for ArenaFrame {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// The collaborator owning flowers, their nectar and the arena layout.
///
/// The agent reads flowers and asks for nectar through [`FlowerArea::feed`];
/// it never mutates a flower directly.
pub trait FlowerArea {
    /// Configuration.
    type Config: Clone;

    /// Builds the area with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// All flowers in a stable iteration order.
    fn flowers(&self) -> &[Flower];

    /// Looks up a flower by identity.
    fn flower(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers().iter().find(|f| f.id == id)
    }

    /// Takes up to `amount` nectar from a flower and returns what was granted.
    fn feed(&mut self, id: FlowerId, amount: f32) -> f32;

    /// Refills every flower.
    fn reset_flowers(&mut self);

    /// Nominal diameter of the arena, used to normalize distances.
    fn diameter(&self) -> f32;

    /// Placement of the arena.
    fn frame(&self) -> ArenaFrame;
}
