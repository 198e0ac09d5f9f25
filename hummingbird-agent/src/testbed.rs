//! A small in-memory world for tests and demos.
//!
//! [`KinematicWorld`] moves a point-mass body with linear drag inside an
//! axis-aligned box and reports nectar contacts of the beak against spherical
//! nectar colliders. [`StaticFlowerArea`] keeps flowers at fixed places. Neither
//! aims at physical accuracy.
use crate::{
    flower::{ArenaFrame, Flower, FlowerArea, FlowerId},
    physics::{Contact, OverlapQuery, PhysicsWorld, RigidBody},
    pose::Pose,
};
use anyhow::Result;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A static spherical collider.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct SphereCollider {
    /// Center.
    pub center: Vec3,

    /// Radius.
    pub radius: f32,
}

/// Configuration of [`KinematicWorld`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct KinematicWorldConfig {
    /// Mass of the body.
    pub mass: f32,

    /// Fraction of velocity lost per second.
    pub drag: f32,

    /// Radius of the body sphere.
    pub body_radius: f32,

    /// Distance from the body origin to the beak tip.
    pub beak_length: f32,

    /// Radius of the nectar collider around each flower's feeding point.
    pub nectar_radius: f32,

    /// Lower corner of the arena box.
    pub bounds_min: Vec3,

    /// Upper corner of the arena box.
    pub bounds_max: Vec3,

    /// Static obstacles, e.g. flower stems and plants.
    pub obstacles: Vec<SphereCollider>,
}

impl Default for KinematicWorldConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            drag: 2.0,
            body_radius: 0.05,
            beak_length: 0.1,
            nectar_radius: 0.02,
            bounds_min: Vec3::new(-10.0, 0.0, -10.0),
            bounds_max: Vec3::new(10.0, 5.0, 10.0),
            obstacles: vec![],
        }
    }
}

/// A point-mass body in a box.
#[derive(Debug, Clone)]
pub struct KinematicWorld {
    config: KinematicWorldConfig,
    pose: Pose,
    velocity: Vec3,
    force: Vec3,
    asleep: bool,
}

impl KinematicWorld {
    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether the body is asleep.
    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    fn beak_tip(&self) -> Vec3 {
        self.pose.beak_tip(self.config.beak_length)
    }

    fn outside_bounds(&self, position: Vec3, radius: f32) -> bool {
        let r = Vec3::splat(radius);
        position.cmplt(self.config.bounds_min + r).any()
            || position.cmpgt(self.config.bounds_max - r).any()
    }
}

impl RigidBody for KinematicWorld {
    fn position(&self) -> Vec3 {
        self.pose.position
    }

    fn orientation(&self) -> Quat {
        self.pose.orientation
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.pose.orientation = orientation;
    }

    fn apply_force(&mut self, force: Vec3) {
        if !self.asleep {
            self.force += force;
        }
    }

    fn zero_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
        self.force = Vec3::ZERO;
    }

    fn sleep(&mut self) {
        self.asleep = true;
        self.zero_velocity();
    }

    fn wake(&mut self) {
        self.asleep = false;
    }
}

impl OverlapQuery for KinematicWorld {
    fn overlap_count(&self, position: Vec3, radius: f32) -> usize {
        let obstacles = self
            .config
            .obstacles
            .iter()
            .filter(|o| o.center.distance(position) < o.radius + radius)
            .count();
        obstacles + self.outside_bounds(position, radius) as usize
    }
}

impl PhysicsWorld for KinematicWorld {
    type Config = KinematicWorldConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            pose: Pose::default(),
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            asleep: false,
        })
    }

    fn advance(&mut self, dt: f32, flowers: &[Flower]) -> Vec<Contact> {
        let mut contacts = vec![];
        if self.asleep {
            return contacts;
        }

        let accel = self.force / self.config.mass;
        self.force = Vec3::ZERO;
        self.velocity = (self.velocity + accel * dt) * (1.0 - self.config.drag * dt).max(0.0);
        self.pose.position += self.velocity * dt;

        let r = self.config.body_radius;
        if self.outside_bounds(self.pose.position, r) {
            let lo = self.config.bounds_min + Vec3::splat(r);
            let hi = self.config.bounds_max - Vec3::splat(r);
            let clamped = self.pose.position.clamp(lo, hi);
            // stop motion along the axes that hit a wall
            let hit = clamped.cmpne(self.pose.position);
            self.velocity = Vec3::select(hit, Vec3::ZERO, self.velocity);
            self.pose.position = clamped;
            contacts.push(Contact::Boundary);
        }

        if self.overlap_count(self.pose.position, r) > 0 {
            contacts.push(Contact::Other);
        }

        // The beak is the segment from the body origin to the beak tip.
        let origin = self.pose.position;
        let tip = self.beak_tip();
        for flower in flowers {
            let center = flower.center;
            if distance_to_segment(center, origin, tip) > self.config.nectar_radius {
                continue;
            }
            let to_tip = tip - center;
            let point = if to_tip.length() <= self.config.nectar_radius {
                tip
            } else {
                center + to_tip.normalize() * self.config.nectar_radius
            };
            contacts.push(Contact::Nectar {
                flower: flower.id,
                point,
            });
        }

        contacts
    }
}

fn distance_to_segment(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Placement of a flower in [`StaticFlowerAreaConfig`].
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct FlowerSpec {
    /// Position of the flower.
    pub position: Vec3,

    /// Opening direction.
    pub up: Vec3,
}

/// Configuration of [`StaticFlowerArea`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StaticFlowerAreaConfig {
    /// Flowers in iteration order.
    pub flowers: Vec<FlowerSpec>,

    /// Distance of the feeding point from the flower position along its up axis.
    pub center_offset: f32,

    /// Nectar of a full flower.
    pub full_nectar: f32,

    /// Nominal arena diameter.
    pub diameter: f32,

    /// Center of the arena floor.
    pub center: Vec3,
}

impl Default for StaticFlowerAreaConfig {
    fn default() -> Self {
        Self {
            flowers: vec![],
            center_offset: 0.02,
            full_nectar: 1.0,
            diameter: 20.0,
            center: Vec3::ZERO,
        }
    }
}

/// Flowers that stay where they were put.
#[derive(Debug, Clone)]
pub struct StaticFlowerArea {
    config: StaticFlowerAreaConfig,
    flowers: Vec<Flower>,
}

impl StaticFlowerArea {
    /// Sets the nectar of a flower, clamped to `[0, full_nectar]`.
    pub fn set_nectar(&mut self, id: FlowerId, nectar: f32) {
        let full = self.config.full_nectar;
        if let Some(f) = self.flowers.iter_mut().find(|f| f.id == id) {
            f.nectar = nectar.clamp(0.0, full);
        }
    }
}

impl FlowerArea for StaticFlowerArea {
    type Config = StaticFlowerAreaConfig;

    fn build(config: &Self::Config, _seed: u64) -> Result<Self> {
        let flowers = config
            .flowers
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let up = spec.up.normalize_or_zero();
                Flower {
                    id: FlowerId(i),
                    position: spec.position,
                    up,
                    center: spec.position + up * config.center_offset,
                    nectar: config.full_nectar,
                }
            })
            .collect();
        Ok(Self {
            config: config.clone(),
            flowers,
        })
    }

    fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    fn flower(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers.get(id.0).filter(|f| f.id == id)
    }

    fn feed(&mut self, id: FlowerId, amount: f32) -> f32 {
        match self.flowers.iter_mut().find(|f| f.id == id) {
            Some(f) => {
                let taken = amount.clamp(0.0, f.nectar);
                f.nectar -= taken;
                taken
            }
            None => 0.0,
        }
    }

    fn reset_flowers(&mut self) {
        for f in self.flowers.iter_mut() {
            f.nectar = self.config.full_nectar;
        }
    }

    fn diameter(&self) -> f32 {
        self.config.diameter
    }

    fn frame(&self) -> ArenaFrame {
        ArenaFrame {
            center: self.config.center,
            rotation: Quat::IDENTITY,
        }
    }
}
