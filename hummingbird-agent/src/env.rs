//! The agent as an [`Env`] for training and evaluation loops.
use crate::{
    act::FlowerAct,
    config::AgentConfig,
    controller::AgentController,
    flower::{FlowerArea, FlowerId},
    heuristic::ManualInput,
    observation::FlowerObs,
    physics::{Contact, PhysicsWorld},
};
use anyhow::Result;
use hummingbird_core::{
    record::{Record, RecordValue},
    Env, Info, Step,
};
use log::trace;
use serde::{Deserialize, Serialize};

/// Information given at every step.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowerInfo {
    /// Nectar obtained in the episode so far.
    pub nectar_obtained: f32,

    /// Target after the step.
    pub target: Option<FlowerId>,
}

impl Info for FlowerInfo {}

/// Configuration of [`FlowerEnv`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FlowerEnvConfig<WC, AC> {
    /// Agent configuration.
    pub agent: AgentConfig,

    /// Physics world configuration.
    pub world: WC,

    /// Flower area configuration.
    pub area: AC,
}

/// An agent in a flower area, stepped by a physics world.
///
/// Each [`Env::step`] applies the action, integrates the world by one fixed
/// time step, dispatches the resulting contacts, replaces a depleted target and
/// finally encodes the observation. The step cap of training mode is reported
/// as truncation.
pub struct FlowerEnv<W, A>
where
    W: PhysicsWorld,
    A: FlowerArea,
{
    controller: AgentController<W, A>,
}

impl<W, A> FlowerEnv<W, A>
where
    W: PhysicsWorld,
    A: FlowerArea,
{
    /// The agent controller.
    pub fn controller(&self) -> &AgentController<W, A> {
        &self.controller
    }

    /// The agent controller, mutably. Used to freeze the agent or inject contacts.
    pub fn controller_mut(&mut self) -> &mut AgentController<W, A> {
        &mut self.controller
    }

    /// Action for the given pilot input.
    pub fn heuristic(&self, input: &ManualInput) -> FlowerAct {
        self.controller.heuristic(input)
    }
}

impl<W, A> Env for FlowerEnv<W, A>
where
    W: PhysicsWorld,
    A: FlowerArea,
{
    type Config = FlowerEnvConfig<W::Config, A::Config>;
    type Obs = FlowerObs;
    type Act = FlowerAct;
    type Info = FlowerInfo;

    /// Builds the world and the area and binds a controller to them.
    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        let world = W::build(&config.world)?;
        let area = A::build(&config.area, seed)?;
        Ok(Self {
            controller: AgentController::initialize(config.agent.clone(), world, area, seed),
        })
    }

    fn step(&mut self, a: &FlowerAct) -> (Step<Self>, Record) {
        trace!("FlowerEnv::step()");

        self.controller.step(a);

        let contacts = self.controller.advance_physics();
        let mut n_nectar_contacts = 0;
        for contact in contacts.iter() {
            if let Contact::Nectar { .. } = contact {
                n_nectar_contacts += 1;
            }
            self.controller.on_contact(contact);
        }

        self.controller.fixed_update();

        let obs = self.controller.collect_observation();
        let reward = self.controller.take_reward();
        let is_truncated = self.controller.is_terminated();
        let info = FlowerInfo {
            nectar_obtained: self.controller.nectar_obtained(),
            target: self.controller.target(),
        };

        let mut record = Record::from_slice(&[
            ("nectar_obtained", RecordValue::Scalar(info.nectar_obtained)),
            ("nectar_contacts", RecordValue::Scalar(n_nectar_contacts as _)),
        ]);
        if let Some(d) = self.controller.distance_to_target() {
            record.insert("distance_to_target", RecordValue::Scalar(d));
        }

        (
            Step::new(obs, *a, reward, false, is_truncated, info),
            record,
        )
    }

    fn reset(&mut self) -> Result<FlowerObs> {
        trace!("FlowerEnv::reset()");
        self.controller.reset_episode()?;
        Ok(self.controller.collect_observation())
    }

    /// Reseeds the spawn sampling with `ix` before resetting.
    fn reset_with_index(&mut self, ix: usize) -> Result<FlowerObs> {
        self.controller.reseed(ix as u64);
        self.reset()
    }
}
