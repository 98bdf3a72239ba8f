//! Command line interface for Gravitas

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConfigError, SimulationConfig};
use crate::physics::bodies::BodyStore;
use crate::physics::execution::Execution;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A reported body index is outside the store
    #[error("Cannot report body {index}: the simulation has {body_count} bodies")]
    UnknownBody { index: usize, body_count: usize },
}

/// Gravitas - direct-sum N-body gravity simulation
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of bodies to simulate (overrides config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub bodies: Option<usize>,

    /// Gravitational constant (overrides config file)
    #[arg(short = 'g', long, value_name = "VALUE")]
    pub gravity: Option<f64>,

    /// Number of ticks to run (overrides config file)
    #[arg(short = 't', long, value_name = "COUNT")]
    pub ticks: Option<u64>,

    /// Seconds of simulated time per tick (overrides config file)
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<f64>,

    /// Random seed for scenarios with random placement
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Softening length; 0 keeps the singular force law
    #[arg(long, value_name = "LENGTH")]
    pub softening: Option<f64>,

    /// Run every phase on the calling thread
    #[arg(long)]
    pub serial: bool,

    /// Log total energy before and after the run
    #[arg(long)]
    pub energy_check: bool,

    /// Body index to print after the run (repeatable)
    #[arg(short = 'r', long = "report", value_name = "INDEX")]
    pub report: Vec<usize>,

    /// Also print the velocity of reported bodies
    #[arg(long)]
    pub report_velocity: bool,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        eprintln!("Loading configuration from: {}", config_path.display());
        SimulationConfig::load(config_path)?
    } else {
        SimulationConfig::load_from_user_config()
    };

    apply_overrides(&mut config, args);
    Ok(config)
}

/// Apply command-line overrides on top of a loaded configuration
pub fn apply_overrides(config: &mut SimulationConfig, args: &Args) {
    if let Some(body_count) = args.bodies {
        eprintln!("Overriding body count to: {body_count}");
        config.physics.body_count = body_count;
    }

    if let Some(gravity) = args.gravity {
        eprintln!("Overriding gravitational constant to: {gravity}");
        config.physics.gravitational_constant = gravity;
    }

    if let Some(ticks) = args.ticks {
        eprintln!("Overriding tick count to: {ticks}");
        config.physics.tick_count = ticks;
    }

    if let Some(dt) = args.dt {
        eprintln!("Overriding time step to: {dt}");
        config.physics.time_step = dt;
    }

    if let Some(softening) = args.softening {
        eprintln!("Overriding softening to: {softening}");
        config.physics.softening = softening;
    }

    if let Some(seed) = args.seed {
        eprintln!("Using random seed: {seed}");
        config.scenario.set_seed(seed);
    }

    if args.serial {
        config.physics.execution = Execution::Serial;
    }

    if args.energy_check {
        config.diagnostics.energy_check = true;
    }

    if !args.report.is_empty() {
        config.report.bodies = args.report.clone();
    }

    if args.report_velocity {
        config.report.include_velocity = true;
    }
}

/// Fail before the run if the configuration is invalid or a reported index is
/// outside the configured store
pub fn check_report_indices(config: &SimulationConfig) -> Result<(), CliError> {
    let body_count = config.validate()?.body_count();
    match config.report.bodies.iter().find(|&&index| index >= body_count) {
        Some(&index) => Err(CliError::UnknownBody { index, body_count }),
        None => Ok(()),
    }
}

/// One line per reported body: `Body[i] x y z`, optionally followed by `v vx vy vz`
pub fn format_report(
    bodies: &BodyStore,
    indices: &[usize],
    include_velocity: bool,
) -> Result<Vec<String>, CliError> {
    indices
        .iter()
        .map(|&index| {
            let body = bodies.get(index).ok_or(CliError::UnknownBody {
                index,
                body_count: bodies.len(),
            })?;
            let p = body.position;
            let mut line = format!("Body[{index}] {:e} {:e} {:e}", p.x, p.y, p.z);
            if include_velocity {
                let v = body.velocity;
                line.push_str(&format!(" v {:e} {:e} {:e}", v.x, v.y, v.z));
            }
            Ok(line)
        })
        .collect()
}
