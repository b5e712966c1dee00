//! RL environment for Hundred and Ten
//!
//! This crate provides:
//! - Action encoding/decoding (ActionId ↔ EnvAction) over a fixed space of 64 ids
//! - Legal action masks, with configurable trick and bid rules
//! - Feature extraction (Game → Observation) from one seat's perspective
//! - Environment trait and HundredAndTenEnv implementation
//! - Agent trait with random and heuristic agents

mod action_encoder;
mod agent;
mod environment;
mod feature_extractor;
mod legal;
mod render;
mod reward;
mod types;

pub use action_encoder::*;
pub use agent::*;
pub use environment::*;
pub use feature_extractor::*;
pub use legal::*;
pub use render::{describe_action, EnvView};
pub use reward::{illegal_action_rewards, transition_rewards};
pub use types::*;

#[cfg(test)]
mod proptests;
