//! Conserved-quantity diagnostics
//!
//! None of these gate the integration. Symplectic Euler only conserves energy
//! approximately, so the numbers here are for inspection and logging.

use crate::physics::bodies::BodyStore;
use crate::physics::execution::Execution;
use crate::physics::gravity::GravityField;
use crate::physics::math::{Scalar, Vector};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyReport {
    pub kinetic: Scalar,
    pub potential: Scalar,
}

impl EnergyReport {
    #[inline]
    pub fn total(&self) -> Scalar {
        self.kinetic + self.potential
    }

    /// Relative change of total energy against a reference report
    pub fn relative_drift(&self, reference: &EnergyReport) -> Scalar {
        let reference_total = reference.total();
        if reference_total.abs() <= Scalar::EPSILON {
            return (self.total() - reference_total).abs();
        }
        ((self.total() - reference_total) / reference_total).abs()
    }
}

/// Kinetic and potential energy of the whole system
///
/// Each chunk of bodies produces one partial report (kinetic energy of its
/// bodies plus potential of every pair whose lower index is in the chunk);
/// the partials are combined once at the end. Summation order differs
/// between serial and parallel execution, so the two agree to rounding only.
pub fn total_energy(bodies: &BodyStore, field: &GravityField, execution: Execution) -> EnergyReport {
    let positions = bodies.positions();
    let velocities = bodies.velocities();
    let masses = bodies.masses();

    execution
        .map_chunks(masses, |offset, chunk| {
            let mut partial = EnergyReport::default();
            for (k, &mass) in chunk.iter().enumerate() {
                let i = offset + k;
                partial.kinetic += 0.5 * mass * velocities[i].length_squared();
                for j in (i + 1)..positions.len() {
                    partial.potential +=
                        field.pair_potential(positions[i], mass, positions[j], masses[j]);
                }
            }
            partial
        })
        .into_iter()
        .fold(EnergyReport::default(), |acc, partial| EnergyReport {
            kinetic: acc.kinetic + partial.kinetic,
            potential: acc.potential + partial.potential,
        })
}

/// Total linear momentum
pub fn momentum(bodies: &BodyStore) -> Vector {
    bodies
        .velocities()
        .iter()
        .zip(bodies.masses())
        .fold(Vector::ZERO, |acc, (&velocity, &mass)| acc + velocity * mass)
}

/// Mass-weighted mean position
pub fn barycenter(bodies: &BodyStore) -> Vector {
    let (weighted_positions, total_mass): (Vector, Scalar) = bodies
        .positions()
        .iter()
        .zip(bodies.masses())
        .fold((Vector::ZERO, 0.0), |(pos_acc, mass_acc), (&pos, &mass)| {
            (pos_acc + pos * mass, mass_acc + mass)
        });

    weighted_positions / total_mass
}
