//! Tick driver
//!
//! Owns the body store for the whole run and calls the integrator once per
//! tick. Ticks are strictly sequential.

use crate::config::{ConfigError, SimulationConfig, SimulationParameters};
use crate::physics::bodies::{BodyStore, BodyStoreError};
use crate::physics::energy::{self, EnergyReport};
use crate::physics::integrators::{Integrator, SymplecticEuler};
use bevy::log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bodies(#[from] BodyStoreError),

    #[error("store holds {actual} bodies but the configuration asks for {expected}")]
    BodyCountMismatch { expected: usize, actual: usize },
}

pub struct Simulation {
    parameters: SimulationParameters,
    bodies: BodyStore,
    integrator: Box<dyn Integrator>,
    ticks_elapsed: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("parameters", &self.parameters)
            .field("integrator", &self.integrator.name())
            .field("body_count", &self.bodies.len())
            .field("ticks_elapsed", &self.ticks_elapsed)
            .finish()
    }
}

impl Simulation {
    /// Pair validated parameters with an initialized store
    pub fn new(parameters: SimulationParameters, bodies: BodyStore) -> Result<Self, SimulationError> {
        if bodies.len() != parameters.body_count() {
            return Err(SimulationError::BodyCountMismatch {
                expected: parameters.body_count(),
                actual: bodies.len(),
            });
        }

        Ok(Self {
            parameters,
            bodies,
            integrator: Box::new(SymplecticEuler),
            ticks_elapsed: 0,
        })
    }

    /// Validate a configuration and place its scenario's bodies
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let parameters = config.validate()?;
        let mut policy = config.scenario.policy(parameters.field().g);
        let bodies = BodyStore::initialize(parameters.body_count(), policy.as_mut())?;
        info!(
            "Placed {} bodies ({} scenario, total mass {:.3e} kg)",
            bodies.len(),
            config.scenario.name(),
            bodies.total_mass()
        );
        Self::new(parameters, bodies)
    }

    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Advance by exactly one tick
    pub fn step(&mut self) {
        self.integrator.step(
            &mut self.bodies,
            self.parameters.field(),
            self.parameters.dt(),
            self.parameters.execution(),
        );
        self.ticks_elapsed += 1;
    }

    /// Run every remaining configured tick
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.step();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.ticks_elapsed >= self.parameters.tick_count()
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    pub fn ticks_remaining(&self) -> u64 {
        self.parameters.tick_count().saturating_sub(self.ticks_elapsed)
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    pub fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integrator.name()
    }

    /// Simulated seconds since the first tick
    pub fn elapsed_time(&self) -> f64 {
        self.ticks_elapsed as f64 * self.parameters.dt()
    }

    pub fn energy(&self) -> EnergyReport {
        energy::total_energy(&self.bodies, self.parameters.field(), self.parameters.execution())
    }

    pub fn into_bodies(self) -> BodyStore {
        self.bodies
    }
}
