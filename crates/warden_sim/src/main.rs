//! Warden headless simulator
//!
//! Loads a scene, steps every pursuer against a scripted target at a fixed
//! rate and prints a JSON summary of what happened.
//!
//! Run with: cargo run -p warden_sim -- path/to/scene.toml
//!       or: WARDEN_TICKS=300 cargo run --bin warden

mod options;
mod scene;
mod sim;

use options::SimOptions;
use scene::SceneError;
use sim::{Simulation, SimulationSummary};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = SimOptions::load();

    match run(&options) {
        Ok(summary) => {
            let json = if options.compact {
                serde_json::to_string(&summary)
            } else {
                serde_json::to_string_pretty(&summary)
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    log::error!("Failed to serialize summary: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(options: &SimOptions) -> Result<SimulationSummary, SceneError> {
    log::info!("Loading scene: {}", options.scene.display());
    let scene = scene::load_scene(&options.scene)?;
    let ticks = options.ticks.unwrap_or(scene.scene.ticks);

    let mut simulation = Simulation::from_scene(&scene)?;
    log::info!(
        "Running '{}' for up to {} ticks of {}s",
        scene.scene.name,
        ticks,
        scene.scene.dt
    );
    simulation.run(ticks)
}
