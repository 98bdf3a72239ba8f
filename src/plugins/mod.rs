pub mod simulation;
pub mod simulation_diagnostics;

pub use simulation::{SimulationPlugin, SimulationSet};
pub use simulation_diagnostics::SimulationDiagnosticsPlugin;
