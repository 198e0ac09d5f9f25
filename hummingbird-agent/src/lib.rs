#![warn(missing_docs)]
//! Control loop, observation and reward core of a nectar-feeding hummingbird agent.
//!
//! The agent flies in a bounded 3D arena, seeks the nearest flower that still
//! holds nectar and feeds from it with its beak tip. Physics and the flower
//! simulation are collaborators behind the [`PhysicsWorld`] and [`FlowerArea`]
//! traits; the policy sees the agent through [`FlowerEnv`], an
//! [`Env`](hummingbird_core::Env) with a 10-dimensional [`FlowerObs`] and a
//! 5-dimensional [`FlowerAct`].
//!
//! The building blocks are usable on their own:
//!
//! * [`smoothing`] rate-limits pitch and yaw intents,
//! * [`observation::encode`] builds the observation vector,
//! * [`target::select_nearest`] picks the target flower,
//! * [`PlacementSampler`] draws collision-free spawn poses,
//! * [`RewardShaper`] prices nectar and boundary contacts,
//! * [`AgentController`] ties them together per step and per episode.
//!
//! [`testbed`] provides a minimal in-memory world for tests and demos.
pub mod act;
pub mod config;
pub mod controller;
pub mod env;
pub mod error;
pub mod flower;
pub mod heuristic;
pub mod observation;
pub mod physics;
pub mod placement;
pub mod pose;
pub mod reward;
pub mod smoothing;
pub mod target;
pub mod testbed;

pub use act::FlowerAct;
pub use config::{AgentConfig, PlacementConfig, RewardConfig};
pub use controller::{AgentController, AgentState, EpisodePhase};
pub use env::{FlowerEnv, FlowerEnvConfig, FlowerInfo};
pub use error::AgentError;
pub use flower::{ArenaFrame, Flower, FlowerArea, FlowerId};
pub use heuristic::{heuristic_action, ManualInput, RandomPolicy, RandomPolicyConfig};
pub use observation::FlowerObs;
pub use physics::{Contact, OverlapQuery, PhysicsWorld, RigidBody};
pub use placement::{PlacementMode, PlacementSampler};
pub use pose::Pose;
pub use reward::RewardShaper;
