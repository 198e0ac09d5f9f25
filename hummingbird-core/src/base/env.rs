//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    ///
    /// An error here means the environment could not reach a valid initial
    /// state and must not be stepped.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step and reset the environment if an episode ends.
    ///
    /// The initial observation of the next episode is stored in [`Step::init_obs`].
    fn step_with_reset(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized,
    {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = self.reset()?;
        }
        Ok((step, record))
    }

    /// Resets the environment with a given index.
    ///
    /// The index is used as a random seed, which makes evaluation runs
    /// reproducible.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;
}
