use bevy::app::TaskPoolPlugin;
use bevy::diagnostic::DiagnosticsPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;
use gravitas::cli::{self, Args};
use gravitas::plugins::{SimulationDiagnosticsPlugin, SimulationPlugin};
use gravitas::resources::ActiveSimulation;
use gravitas::simulation::Simulation;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli::load_and_apply_config(args)?;

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    // Everything is validated before the first tick
    let simulation = Simulation::from_config(&config)?;
    cli::check_report_indices(&config)?;

    let mut app = App::new();

    app.add_plugins((
        TaskPoolPlugin::default(),
        LogPlugin {
            level: if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            },
            ..default()
        },
        DiagnosticsPlugin,
    ));

    app.insert_resource(config.clone());
    app.insert_resource(ActiveSimulation(simulation));
    app.add_plugins((SimulationPlugin, SimulationDiagnosticsPlugin::default()));

    app.finish();
    app.cleanup();

    while app.should_exit().is_none() {
        app.update();
    }

    let simulation = app.world().resource::<ActiveSimulation>();
    for line in cli::format_report(
        simulation.bodies(),
        &config.report.bodies,
        config.report.include_velocity,
    )? {
        println!("{line}");
    }

    Ok(())
}
