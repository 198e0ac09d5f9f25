//! Policy.
use super::Env;
use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

/// Decides the next action of an agent in `E` from its latest observation.
///
/// Sampling takes `&mut self` so that stochastic policies can own their random
/// number generator.
pub trait Policy<E: Env> {
    /// Chooses an action for `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// An object built from a serializable configuration.
pub trait Configurable<E: Env> {
    /// Configuration, usually read from YAML.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Self;

    /// Reads the configuration from a YAML file and builds the object.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Open {:?}", path))?;
        let config = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parse {:?}", path))?;
        info!("Build from {:?}", path);
        Ok(Self::build(config))
    }
}
