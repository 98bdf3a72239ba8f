//! Simulation plugin - Self-contained plugin pattern
//!
//! Drives an [`ActiveSimulation`] one tick per app update and asks the app to
//! exit once every configured tick has run. The simulation itself is built
//! (and validated) by the caller before the app starts, so an invalid
//! configuration never reaches the schedule.

use crate::config::SimulationConfig;
use crate::resources::ActiveSimulation;
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Advance,
    Diagnostics,
    Exit,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>();

        match toml::to_string_pretty(app.world().resource::<SimulationConfig>()) {
            Ok(toml_string) => {
                info!("=== Current Configuration (TOML) ===\n{}", toml_string);
                info!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        app.configure_sets(
            Update,
            (
                SimulationSet::Advance,
                SimulationSet::Diagnostics,
                SimulationSet::Exit,
            )
                .chain()
                .run_if(resource_exists::<ActiveSimulation>),
        );

        app.add_systems(
            Update,
            (
                advance_simulation
                    .in_set(SimulationSet::Advance)
                    .run_if(ticks_remaining),
                exit_when_finished.in_set(SimulationSet::Exit),
            ),
        );
    }
}

pub fn ticks_remaining(simulation: Option<Res<ActiveSimulation>>) -> bool {
    simulation.is_some_and(|simulation| !simulation.is_finished())
}

/// Advance the simulation by exactly one tick
pub fn advance_simulation(
    mut simulation: ResMut<ActiveSimulation>,
    config: Res<SimulationConfig>,
) {
    simulation.step();

    let interval = config.diagnostics.log_interval;
    let tick = simulation.ticks_elapsed();
    if interval > 0 && tick % interval == 0 {
        debug!(
            "tick {}/{} (t = {:.3e} s)",
            tick,
            simulation.parameters().tick_count(),
            simulation.elapsed_time()
        );
    }
}

fn exit_when_finished(simulation: Res<ActiveSimulation>, mut exit: EventWriter<AppExit>) {
    if simulation.is_finished() {
        info!(
            "Simulation finished after {} ticks ({:.3e} s simulated)",
            simulation.ticks_elapsed(),
            simulation.elapsed_time()
        );
        exit.write(AppExit::Success);
    }
}
