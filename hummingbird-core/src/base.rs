//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::{Configurable, Policy};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
pub trait Obs: Clone + Debug {
    /// Returns a dummy observation.
    ///
    /// The observation created with this method is ignored, e.g. the initial
    /// observation slot of a [`Step`] that did not end an episode.
    fn dummy() -> Self;

    /// Returns the number of scalar features in the observation.
    fn len(&self) -> usize;
}

/// An action of an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of scalar components in the action.
    fn len(&self) -> usize;
}
