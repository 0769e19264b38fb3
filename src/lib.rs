//! Redirected walking: a per-frame control loop that bends a user's virtual
//! path so it fits a bounded physical room, and a grid reinforcement-learning
//! environment built on top of it.

pub mod config;
pub mod control;
pub mod env;
pub mod geometry;
pub mod learner;
pub mod math;
pub mod runtime;
pub mod strategy;
pub mod time;
pub mod tracking;
pub mod train;
