//! Body state and the fixed-size body store

use crate::physics::math::{Scalar, Vector};
use thiserror::Error;

/// A single point mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vector,
    pub velocity: Vector,
    pub mass: Scalar,
}

impl Body {
    pub fn new(position: Vector, velocity: Vector, mass: Scalar) -> Self {
        Self {
            position,
            velocity,
            mass,
        }
    }

    /// A body with zero velocity
    pub fn at_rest(position: Vector, mass: Scalar) -> Self {
        Self::new(position, Vector::ZERO, mass)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyStoreError {
    #[error("a body store needs at least one body")]
    Empty,

    #[error("body {index} has mass {mass}, masses must be positive and finite")]
    InvalidMass { index: usize, mass: Scalar },

    #[error("body {index} has a non-finite position {position}")]
    NonFinitePosition { index: usize, position: Vector },

    #[error("body {index} has a non-finite velocity {velocity}")]
    NonFiniteVelocity { index: usize, velocity: Vector },

    #[error("placement produced {actual} bodies, expected {expected}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Ordered, fixed-size collection of bodies
///
/// The index of a body is its identity for the whole run. State is laid out
/// as parallel arrays so the kick can share positions read-only while each
/// worker writes its own velocity slots, and the drift can write positions
/// while reading velocities.
///
/// There is no way to add or remove a body after construction. Only the
/// integrators (inside this crate) get mutable access to the state arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyStore {
    positions: Vec<Vector>,
    velocities: Vec<Vector>,
    masses: Vec<Scalar>,
}

impl BodyStore {
    /// Build a store from an ordered list of bodies
    pub fn from_bodies(bodies: impl IntoIterator<Item = Body>) -> Result<Self, BodyStoreError> {
        let bodies = bodies.into_iter();
        let (lower, _) = bodies.size_hint();
        let mut positions = Vec::with_capacity(lower);
        let mut velocities = Vec::with_capacity(lower);
        let mut masses = Vec::with_capacity(lower);

        for (index, body) in bodies.enumerate() {
            if !(body.mass.is_finite() && body.mass > 0.0) {
                return Err(BodyStoreError::InvalidMass {
                    index,
                    mass: body.mass,
                });
            }
            if !body.position.is_finite() {
                return Err(BodyStoreError::NonFinitePosition {
                    index,
                    position: body.position,
                });
            }
            if !body.velocity.is_finite() {
                return Err(BodyStoreError::NonFiniteVelocity {
                    index,
                    velocity: body.velocity,
                });
            }

            positions.push(body.position);
            velocities.push(body.velocity);
            masses.push(body.mass);
        }

        if masses.is_empty() {
            return Err(BodyStoreError::Empty);
        }

        Ok(Self {
            positions,
            velocities,
            masses,
        })
    }

    /// Build a store of exactly `n` bodies from a placement policy
    pub fn initialize<P>(n: usize, policy: &mut P) -> Result<Self, BodyStoreError>
    where
        P: super::scenario::PlacementPolicy + ?Sized,
    {
        if n == 0 {
            return Err(BodyStoreError::Empty);
        }

        let bodies = policy.place(n);
        if bodies.len() != n {
            return Err(BodyStoreError::CountMismatch {
                expected: n,
                actual: bodies.len(),
            });
        }

        Self::from_bodies(bodies)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Never true for a constructed store
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Body> {
        Some(Body {
            position: *self.positions.get(index)?,
            velocity: self.velocities[index],
            mass: self.masses[index],
        })
    }

    #[inline]
    pub fn position(&self, index: usize) -> Option<Vector> {
        self.positions.get(index).copied()
    }

    #[inline]
    pub fn velocity(&self, index: usize) -> Option<Vector> {
        self.velocities.get(index).copied()
    }

    #[inline]
    pub fn mass(&self, index: usize) -> Option<Scalar> {
        self.masses.get(index).copied()
    }

    pub fn positions(&self) -> &[Vector] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector] {
        &self.velocities
    }

    pub fn masses(&self) -> &[Scalar] {
        &self.masses
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Body> + '_ {
        self.positions
            .iter()
            .zip(&self.velocities)
            .zip(&self.masses)
            .map(|((&position, &velocity), &mass)| Body::new(position, velocity, mass))
    }

    pub fn total_mass(&self) -> Scalar {
        self.masses.iter().sum()
    }

    /// True when every position and velocity is finite
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite())
            && self.velocities.iter().all(|v| v.is_finite())
    }

    /// Positions shared read-only, velocities writable
    ///
    /// The split borrow is what lets the kick read a frozen position snapshot
    /// while it writes velocities.
    pub(crate) fn kick_view(&mut self) -> (&[Vector], &[Scalar], &mut [Vector]) {
        (&self.positions, &self.masses, &mut self.velocities)
    }

    /// Positions writable, velocities shared read-only
    pub(crate) fn drift_view(&mut self) -> (&mut [Vector], &[Vector]) {
        (&mut self.positions, &self.velocities)
    }
}
