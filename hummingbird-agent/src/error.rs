//! Errors of the agent core.
use thiserror::Error;

/// Errors of the agent core.
///
/// These are structural failures: the arena or the configuration does not
/// allow a valid episode. Running out of nectar is not an error.
#[derive(Error, Debug, PartialEq)]
pub enum AgentError {
    /// Every spawn candidate overlapped a collider.
    #[error("Could not find a safe position to spawn after {attempts} attempts")]
    NoSafePosition {
        /// Number of candidates that were tested.
        attempts: usize,
    },

    /// The flower area has no flowers to place the agent in front of.
    #[error("Flower area has no flowers")]
    NoFlowers,
}
