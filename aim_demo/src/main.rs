//! Headless aiming demo for the collision engine
//!
//! Usage: `aim_demo [config.toml|config.ron]`. A missing file runs with
//! defaults; set `RUST_LOG=debug` to see per-step collision and crosshair logs.

mod config;
mod error;
mod simulation;

use collision_engine::config::Config;
use collision_engine::foundation::logging;
use config::DemoConfig;
use simulation::Simulation;

const DEFAULT_CONFIG_PATH: &str = "aim_demo.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting Rusteroids Aim Demo");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let result = DemoConfig::load_or_default(&path)
        .map_err(error::DemoError::from)
        .and_then(Simulation::new)
        .and_then(|mut simulation| {
            let stats = simulation.run()?;
            log::info!(
                "Broad phase: {} ({} pairs over {} refreshes)",
                simulation.world().broad_phase_name(),
                stats.pairs,
                simulation.world().steps()
            );
            Ok(stats)
        });

    match result {
        Ok(stats) => {
            log::info!(
                "Aim demo completed: {} steps, {} shots, {} kills, {} rams, {} expired, {} steps on target",
                stats.steps,
                stats.shots,
                stats.kills,
                stats.rams,
                stats.expired,
                stats.locked_steps
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Aim demo failed: {}", e);
            Err(e.into())
        }
    }
}
