//! Gravitas prelude module
//!
//! Re-exports the types most callers need to configure, build and inspect a
//! run.

pub use crate::config::{SimulationConfig, SimulationParameters};
pub use crate::physics::bodies::{Body, BodyStore};
pub use crate::physics::execution::Execution;
pub use crate::physics::gravity::GravityField;
pub use crate::physics::integrators::{Integrator, SymplecticEuler};
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::scenario::{CircularRing, PlacementPolicy, RandomShell, ScenarioConfig};
pub use crate::resources::{ActiveSimulation, SharedRng};
pub use crate::simulation::Simulation;
