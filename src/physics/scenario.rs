//! Initial body placement
//!
//! A placement policy produces the ordered list of bodies a run starts from.
//! Policies must return finite, non-coincident positions and positive masses;
//! the [`BodyStore`](crate::physics::bodies::BodyStore) checks everything but
//! coincidence.

use crate::physics::bodies::Body;
use crate::physics::math::{
    Scalar, TAU, Vector, circle_tangent, circular_orbit_speed, point_on_circle,
    random_unit_vector,
};
use crate::resources::SharedRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub trait PlacementPolicy {
    /// Produce exactly `n` bodies
    fn place(&mut self, n: usize) -> Vec<Body>;
}

impl<F> PlacementPolicy for F
where
    F: FnMut(usize) -> Vec<Body>,
{
    fn place(&mut self, n: usize) -> Vec<Body> {
        self(n)
    }
}

/// One heavy body at rest at the origin, everything else on a circle around it
///
/// Satellite `i` (for `i` in `1..n`) sits at angle `2π·i/(n−1)` in the z = 0
/// plane, moving counter-clockwise at the circular-orbit speed of the central
/// mass alone. Satellites share `satellite_total_mass / n` each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularRing {
    pub g: Scalar,
    pub central_mass: Scalar,
    pub radius: Scalar,
    pub satellite_total_mass: Scalar,
}

impl CircularRing {
    pub fn satellite(&self, index: usize, n: usize) -> Body {
        let angle = TAU * index as Scalar / (n - 1) as Scalar;
        let speed = circular_orbit_speed(self.g, self.central_mass, self.radius);

        Body::new(
            point_on_circle(angle, self.radius),
            circle_tangent(angle) * speed,
            self.satellite_total_mass / n as Scalar,
        )
    }
}

impl PlacementPolicy for CircularRing {
    fn place(&mut self, n: usize) -> Vec<Body> {
        if n == 0 {
            return Vec::new();
        }

        core::iter::once(Body::at_rest(Vector::ZERO, self.central_mass))
            .chain((1..n).map(|index| self.satellite(index, n)))
            .collect()
    }
}

/// Bodies at rest, uniformly scattered over the surface of a sphere
#[derive(Debug, Clone)]
pub struct RandomShell {
    pub radius: Scalar,
    pub min_mass: Scalar,
    pub max_mass: Scalar,
    pub rng: SharedRng,
}

impl PlacementPolicy for RandomShell {
    fn place(&mut self, n: usize) -> Vec<Body> {
        (0..n)
            .map(|_| {
                let position = random_unit_vector(&mut self.rng) * self.radius;
                let mass = self.rng.random_range(self.min_mass..=self.max_mass);
                Body::at_rest(position, mass)
            })
            .collect()
    }
}

/// Serializable description of a placement policy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    CircularRing {
        central_mass: Scalar,
        radius: Scalar,
        satellite_total_mass: Scalar,
    },
    RandomShell {
        radius: Scalar,
        min_mass: Scalar,
        max_mass: Scalar,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::CircularRing {
            central_mass: 1e30,
            radius: 1e11,
            satellite_total_mass: 1e24,
        }
    }
}

impl ScenarioConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioConfig::CircularRing { .. } => "circular_ring",
            ScenarioConfig::RandomShell { .. } => "random_shell",
        }
    }

    /// Build the placement policy this scenario describes
    ///
    /// `g` sets the orbital speeds of the ring.
    pub fn policy(&self, g: Scalar) -> Box<dyn PlacementPolicy> {
        match *self {
            ScenarioConfig::CircularRing {
                central_mass,
                radius,
                satellite_total_mass,
            } => Box::new(CircularRing {
                g,
                central_mass,
                radius,
                satellite_total_mass,
            }),
            ScenarioConfig::RandomShell {
                radius,
                min_mass,
                max_mass,
                seed,
            } => Box::new(RandomShell {
                radius,
                min_mass,
                max_mass,
                rng: SharedRng::from_optional_seed(seed),
            }),
        }
    }

    pub fn set_seed(&mut self, new_seed: u64) {
        if let ScenarioConfig::RandomShell { seed, .. } = self {
            *seed = Some(new_seed);
        }
    }
}
