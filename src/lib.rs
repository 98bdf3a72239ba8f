//! Gravitas library
//!
//! Direct-sum N-body gravity: a fixed body store, a kick-then-drift
//! integrator, placement scenarios and the bevy plugins that drive a run.

pub mod cli;
pub mod config;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod simulation;
