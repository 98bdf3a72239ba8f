use crate::physics::execution::Execution;
use crate::physics::gravity::GravityField;
use crate::physics::math::{SECONDS_PER_YEAR, Scalar};
use crate::physics::scenario::ScenarioConfig;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const ENVIRONMENT_PREFIX: &str = "GRAVITAS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("body count must be at least 1")]
    NoBodies,

    #[error("gravitational constant must be positive and finite, got {0}")]
    InvalidGravitationalConstant(Scalar),

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(Scalar),

    #[error("softening must be non-negative and finite, got {0}")]
    InvalidSoftening(Scalar),

    #[error("energy drift warning threshold must be positive and finite, got {0}")]
    InvalidDriftThreshold(Scalar),

    #[error("invalid {scenario} scenario: {reason}")]
    InvalidScenario {
        scenario: &'static str,
        reason: String,
    },

    #[error("failed to read configuration: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to layer configuration sources: {0}")]
    Layered(#[from] ::config::ConfigError),
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub scenario: ScenarioConfig,
    pub diagnostics: DiagnosticsConfig,
    pub report: ReportConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: Scalar,
    /// Seconds of simulated time per tick
    pub time_step: Scalar,
    pub body_count: usize,
    pub tick_count: u64,
    /// Plummer softening length; zero keeps the singular force law
    pub softening: Scalar,
    pub execution: Execution,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.67430e-11,
            time_step: 1e-3 * SECONDS_PER_YEAR,
            body_count: 10_000,
            tick_count: 100,
            softening: 0.0,
            execution: Execution::Parallel,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Measure total energy before and after the run
    pub energy_check: bool,
    /// Relative energy drift above which a warning is logged
    pub energy_drift_warning: Scalar,
    /// Ticks between progress log lines, 0 disables them
    pub log_interval: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            energy_check: false,
            energy_drift_warning: 1e-2,
            log_interval: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Indices of the bodies printed after the final tick
    pub bodies: Vec<usize>,
    pub include_velocity: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bodies: vec![0],
            include_velocity: false,
        }
    }
}

/// Validated physical parameters of a run
///
/// Only [`SimulationParameters::new`] and [`SimulationConfig::validate`] build
/// one, so holding a value means every field passed its checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    field: GravityField,
    dt: Scalar,
    body_count: usize,
    tick_count: u64,
    execution: Execution,
}

impl SimulationParameters {
    pub fn new(
        field: GravityField,
        dt: Scalar,
        body_count: usize,
        tick_count: u64,
        execution: Execution,
    ) -> Result<Self, ConfigError> {
        if body_count == 0 {
            return Err(ConfigError::NoBodies);
        }
        if !(field.g.is_finite() && field.g > 0.0) {
            return Err(ConfigError::InvalidGravitationalConstant(field.g));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(dt));
        }
        if !(field.softening.is_finite() && field.softening >= 0.0) {
            return Err(ConfigError::InvalidSoftening(field.softening));
        }

        Ok(Self {
            field,
            dt,
            body_count,
            tick_count,
            execution,
        })
    }

    #[inline]
    pub fn field(&self) -> &GravityField {
        &self.field
    }

    /// Seconds of simulated time per tick
    #[inline]
    pub fn dt(&self) -> Scalar {
        self.dt
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[inline]
    pub fn execution(&self) -> Execution {
        self.execution
    }
}

impl SimulationConfig {
    /// Check every physical and scenario parameter before anything is built
    pub fn validate(&self) -> Result<SimulationParameters, ConfigError> {
        let physics = &self.physics;

        let parameters = SimulationParameters::new(
            GravityField::new(physics.gravitational_constant).with_softening(physics.softening),
            physics.time_step,
            physics.body_count,
            physics.tick_count,
            physics.execution,
        )?;

        let threshold = self.diagnostics.energy_drift_warning;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::InvalidDriftThreshold(threshold));
        }

        self.validate_scenario()?;

        Ok(parameters)
    }

    fn validate_scenario(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidScenario {
            scenario: self.scenario.name(),
            reason,
        };
        let positive = |value: Scalar| value.is_finite() && value > 0.0;

        match self.scenario {
            ScenarioConfig::CircularRing {
                central_mass,
                radius,
                satellite_total_mass,
            } => {
                if !positive(central_mass) {
                    return Err(invalid(format!("central mass {central_mass} is not positive")));
                }
                if !positive(radius) {
                    return Err(invalid(format!("radius {radius} is not positive")));
                }
                if self.physics.body_count > 1 && !positive(satellite_total_mass) {
                    return Err(invalid(format!(
                        "satellite mass {satellite_total_mass} is not positive"
                    )));
                }
            }
            ScenarioConfig::RandomShell {
                radius,
                min_mass,
                max_mass,
                ..
            } => {
                if !positive(radius) {
                    return Err(invalid(format!("radius {radius} is not positive")));
                }
                if !positive(min_mass) || !max_mass.is_finite() || max_mass < min_mass {
                    return Err(invalid(format!(
                        "mass range {min_mass}..={max_mass} is empty or not positive"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Parse configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gravitas")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Layer the user configuration file and `GRAVITAS_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `GRAVITAS_PHYSICS__BODY_COUNT`.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let layered = builder
            .add_source(
                ::config::Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    /// User configuration with environment overrides, or defaults if it can't be read
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();
        match Self::load_layered(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load user configuration: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let parameters = SimulationConfig::default().validate().unwrap();

        assert_eq!(parameters.body_count(), 10_000);
        assert_eq!(parameters.tick_count(), 100);
        assert_eq!(parameters.field().g, 6.67430e-11);
        assert_eq!(parameters.field().softening, 0.0);
        assert!((parameters.dt() - 31_536.0).abs() < 1e-9);
        assert_eq!(parameters.execution(), Execution::Parallel);
    }

    #[test]
    fn test_invalid_physics_is_rejected() {
        let mut config = SimulationConfig::default();
        config.physics.body_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoBodies)));

        for dt in [0.0, -1.0, Scalar::NAN, Scalar::INFINITY] {
            let mut config = SimulationConfig::default();
            config.physics.time_step = dt;
            assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeStep(_))));
        }

        for g in [0.0, -6.0, Scalar::NAN] {
            let mut config = SimulationConfig::default();
            config.physics.gravitational_constant = g;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidGravitationalConstant(_))
            ));
        }

        let mut config = SimulationConfig::default();
        config.physics.softening = -0.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSoftening(_))));
    }

    #[test]
    fn test_invalid_drift_threshold_is_rejected() {
        for threshold in [0.0, -1e-2, Scalar::NAN, Scalar::INFINITY] {
            let mut config = SimulationConfig::default();
            config.diagnostics.energy_drift_warning = threshold;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDriftThreshold(_))
            ));
        }
    }

    #[test]
    fn test_zero_ticks_is_valid() {
        let mut config = SimulationConfig::default();
        config.physics.tick_count = 0;
        assert_eq!(config.validate().unwrap().tick_count(), 0);
    }

    #[test]
    fn test_invalid_scenario_is_rejected() {
        let mut config = SimulationConfig::default();
        config.scenario = ScenarioConfig::CircularRing {
            central_mass: 1e30,
            radius: 0.0,
            satellite_total_mass: 1e24,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScenario {
                scenario: "circular_ring",
                ..
            })
        ));

        config.scenario = ScenarioConfig::RandomShell {
            radius: 1.0,
            min_mass: 3.0,
            max_mass: 2.0,
            seed: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScenario {
                scenario: "random_shell",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [physics]
            body_count = 3
            execution = "serial"

            [report]
            bodies = [1, 2]
            "#,
        )
        .unwrap();

        assert_eq!(config.physics.body_count, 3);
        assert_eq!(config.physics.execution, Execution::Serial);
        assert_eq!(config.physics.tick_count, 100);
        assert_eq!(config.scenario, ScenarioConfig::default());
        assert_eq!(config.report.bodies, vec![1, 2]);
        assert!(!config.report.include_velocity);
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let mut config = SimulationConfig::default();
        config.physics.body_count = 42;
        config.diagnostics.energy_check = true;

        let path = std::env::temp_dir().join(format!("gravitas-config-{}.toml", std::process::id()));
        config.save(&path).unwrap();
        let loaded = SimulationConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let config = SimulationConfig::load_or_default("/nonexistent/gravitas/config.toml");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_layered_file_source() {
        let path = std::env::temp_dir().join(format!("gravitas-layered-{}.toml", std::process::id()));
        std::fs::write(&path, "[physics]\nbody_count = 7\ntick_count = 3\n").unwrap();

        let config = SimulationConfig::load_layered(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.physics.body_count, 7);
        assert_eq!(config.physics.tick_count, 3);
        assert_eq!(config.scenario, ScenarioConfig::default());
    }
}
