#![warn(missing_docs)]
//! Environment and policy abstractions for the hummingbird agent.
//!
//! An environment ([`Env`]) turns actions ([`Act`]) into [`Step`]s carrying the
//! next observation ([`Obs`]), the reward and the episode flags. A [`Policy`]
//! maps observations back to actions. Per-step diagnostics travel alongside in
//! a [`record::Record`].
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Configurable, Env, Info, Obs, Policy, Step};
