use crate::physics::bodies::BodyStore;
use crate::simulation::Simulation;
use bevy::prelude::*;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

#[derive(Resource, Deref, DerefMut, Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

/// The running simulation, owned by the app for its whole lifetime
#[derive(Resource, Deref, DerefMut, Debug)]
pub struct ActiveSimulation(pub Simulation);

impl ActiveSimulation {
    pub fn bodies(&self) -> &BodyStore {
        self.0.bodies()
    }
}
