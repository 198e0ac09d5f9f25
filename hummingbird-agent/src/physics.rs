//! The physics collaborator.
use crate::{flower::Flower, pose::Pose, FlowerId};
use anyhow::Result;
use glam::{Quat, Vec3};

/// A contact reported by the physics engine after integration.
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    /// The body touched the nectar collider of a flower at `point`, the
    /// collider point closest to the beak tip.
    Nectar {
        /// Flower owning the collider.
        flower: FlowerId,

        /// Contact point.
        point: Vec3,
    },

    /// The body hit the arena boundary.
    Boundary,

    /// Any other collision.
    Other,
}

/// The agent body.
pub trait RigidBody {
    /// Current position.
    fn position(&self) -> Vec3;

    /// Current orientation.
    fn orientation(&self) -> Quat;

    /// Current pose.
    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.orientation())
    }

    /// Teleports the body.
    fn set_pose(&mut self, pose: Pose);

    /// Sets the orientation, keeping the position.
    fn set_orientation(&mut self, orientation: Quat);

    /// Applies a force in world coordinates for the next integration step.
    fn apply_force(&mut self, force: Vec3);

    /// Zeroes linear and angular velocity.
    fn zero_velocity(&mut self);

    /// Puts the body to sleep: it stops integrating until woken.
    fn sleep(&mut self);

    /// Wakes the body.
    fn wake(&mut self);
}

/// Sphere overlap queries against the scene.
pub trait OverlapQuery {
    /// Number of colliders overlapping the sphere.
    fn overlap_count(&self, position: Vec3, radius: f32) -> usize;
}

/// A physics world simulating one agent body.
pub trait PhysicsWorld: RigidBody + OverlapQuery {
    /// Configuration.
    type Config: Clone;

    /// Builds the world.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Integrates the world by `dt` seconds and returns the contacts of the body.
    ///
    /// `flowers` locates the nectar colliders.
    fn advance(&mut self, dt: f32, flowers: &[Flower]) -> Vec<Contact>;
}
