//! Hundred and Ten Game Engine and RL Environment
//!
//! A rules engine for the trick-taking card game Hundred and Ten, wrapped as a
//! four-seat RL environment with a fixed action space.
//!
//! This crate re-exports the engine and rl-env crates for convenience.

pub mod display;
pub mod sim;

pub use hundredandten_engine::*;
pub use hundredandten_rl_env as rl_env;
