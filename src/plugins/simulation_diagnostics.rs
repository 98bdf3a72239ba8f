//! Simulation diagnostics module.
//!
//! Tracks total energy of the system through bevy's diagnostic store and logs
//! the relative drift against the initial state. Symplectic Euler only
//! approximately conserves energy, so a large drift is a warning, never an
//! error.
//!
//! ```rust,ignore
//! app.add_plugins(SimulationDiagnosticsPlugin::default());
//! ```

use crate::config::SimulationConfig;
use crate::physics::energy::EnergyReport;
use crate::plugins::simulation::SimulationSet;
use crate::resources::ActiveSimulation;
use bevy::diagnostic::DEFAULT_MAX_HISTORY_LENGTH;
use bevy::diagnostic::Diagnostic;
use bevy::diagnostic::DiagnosticPath;
use bevy::diagnostic::Diagnostics;
use bevy::diagnostic::RegisterDiagnostic;
use bevy::prelude::*;

/// Energy of the system before the first tick
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct InitialEnergy(pub Option<EnergyReport>);

/// Most recent energy measurement and its drift from the initial state
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LatestEnergy {
    pub tick: Option<u64>,
    pub report: Option<EnergyReport>,
    pub relative_drift: Option<f64>,
}

pub struct SimulationDiagnosticsPlugin {
    max_history_length: usize,
    smoothing_factor: f64,
}

impl Default for SimulationDiagnosticsPlugin {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            smoothing_factor: 0.0,
        }
    }
}

impl SimulationDiagnosticsPlugin {
    pub const ENERGY_PATH: DiagnosticPath = DiagnosticPath::const_new("simulation/energy");
    pub const ENERGY_DRIFT_PATH: DiagnosticPath =
        DiagnosticPath::const_new("simulation/energy_drift");

    const DIAGNOSTIC_PATHS: &'static [DiagnosticPath] =
        &[Self::ENERGY_PATH, Self::ENERGY_DRIFT_PATH];

    fn register_diagnostics(&self, app: &mut App) {
        for path in Self::DIAGNOSTIC_PATHS {
            app.register_diagnostic(
                Diagnostic::new(path.clone())
                    .with_max_history_length(self.max_history_length)
                    .with_smoothing_factor(self.smoothing_factor),
            );
        }
    }

    fn energy_check_enabled(config: Res<SimulationConfig>) -> bool {
        config.diagnostics.energy_check
    }

    fn record_initial_energy(
        simulation: Res<ActiveSimulation>,
        mut initial: ResMut<InitialEnergy>,
    ) {
        let report = simulation.energy();
        info!(
            "Initial energy: {:e} (kinetic {:e}, potential {:e})",
            report.total(),
            report.kinetic,
            report.potential
        );
        initial.0 = Some(report);
    }

    fn update_energy_diagnostics(
        simulation: Res<ActiveSimulation>,
        config: Res<SimulationConfig>,
        initial: Res<InitialEnergy>,
        mut latest: ResMut<LatestEnergy>,
        mut diagnostics: Diagnostics,
    ) {
        let interval = config.diagnostics.log_interval;
        let tick = simulation.ticks_elapsed();
        let due = simulation.is_finished() || (interval > 0 && tick % interval == 0);
        if !due || latest.tick == Some(tick) {
            return;
        }

        let report = simulation.energy();
        let drift = initial.0.map(|reference| report.relative_drift(&reference));

        diagnostics.add_measurement(&Self::ENERGY_PATH, || report.total());
        if let Some(drift) = drift {
            diagnostics.add_measurement(&Self::ENERGY_DRIFT_PATH, || drift);
        }

        latest.tick = Some(tick);
        latest.report = Some(report);
        latest.relative_drift = drift;

        if simulation.is_finished() {
            info!("Final energy: {:e}", report.total());
            if let Some(drift) = drift {
                if !drift.is_finite() || drift > config.diagnostics.energy_drift_warning {
                    warn!(
                        "Relative energy drift {:e} exceeds {:e}",
                        drift, config.diagnostics.energy_drift_warning
                    );
                } else {
                    info!("Relative energy drift: {:e}", drift);
                }
            }
        } else {
            debug!("tick {}: energy {:e}", tick, report.total());
        }
    }
}

impl Plugin for SimulationDiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InitialEnergy>();
        app.init_resource::<LatestEnergy>();

        self.register_diagnostics(app);

        app.add_systems(
            Startup,
            Self::record_initial_energy.run_if(
                resource_exists::<ActiveSimulation>
                    .and(resource_exists::<SimulationConfig>)
                    .and(Self::energy_check_enabled),
            ),
        );
        app.add_systems(
            Update,
            Self::update_energy_diagnostics
                .in_set(SimulationSet::Diagnostics)
                .run_if(Self::energy_check_enabled),
        );
    }
}
