//! Numerical integration methods for n-body simulation

use crate::physics::bodies::BodyStore;
use crate::physics::execution::Execution;
use crate::physics::gravity::GravityField;
use crate::physics::math::Scalar;

pub mod symplectic_euler;

pub use symplectic_euler::SymplecticEuler;

/// Base trait for all integrators
///
/// Integrators hold no state between calls; everything that changes lives in
/// the [`BodyStore`].
pub trait Integrator: Send + Sync {
    /// Advance every body by exactly one time step
    ///
    /// # Arguments
    /// * `bodies` - The body store, mutated in place
    /// * `field` - Gravitational constant and softening
    /// * `dt` - Time step
    /// * `execution` - How per-body work is scheduled
    fn step(&self, bodies: &mut BodyStore, field: &GravityField, dt: Scalar, execution: Execution);

    /// Get the name of this integrator
    fn name(&self) -> &'static str;

    /// Get the order of this integrator
    fn convergence_order(&self) -> usize;
}
