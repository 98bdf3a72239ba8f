//! Direct-sum gravity, integration and placement

pub mod bodies;
pub mod energy;
pub mod execution;
pub mod gravity;
pub mod integrators;
pub mod math;
pub mod scenario;
