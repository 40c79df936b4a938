//! Terminal driver
//!
//! Runs the configured maze to completion, printing the grid after every
//! tick. An optional argument overrides the layout file from config.toml.

use anyhow::Context;
use log::info;
use mazewalk::{Config, Layout, Simulation};
use std::env;

fn main() -> anyhow::Result<()> {
    let config = Config::load();

    env_logger::Builder::from_default_env()
        .filter_level(config.log_level())
        .init();

    let args: Vec<String> = env::args().collect();
    let mut sim = match args.get(1) {
        Some(path) => {
            let layout = Layout::load(path).with_context(|| format!("loading layout {}", path))?;
            Simulation::with_layout(layout, &config)?
        }
        None => Simulation::from_config(&config)?,
    };

    info!(
        "Running {}x{} maze, budget {} ticks",
        sim.grid().width(),
        sim.grid().height(),
        sim.budget()
    );

    if config.logging.echo_render {
        println!("{}\n", sim.render());
    }

    while !sim.is_finished() {
        let outcome = sim.tick();
        if config.logging.echo_render {
            println!("tick {} {:?}", sim.ticks(), outcome);
            println!("{}\n", sim.render());
        }
    }

    let report = sim.report();
    println!("{}", report);

    if let Some(step_log) = sim.step_log() {
        println!("\n{}", step_log.summary());
        step_log
            .save_to_file(&config.logging.step_log_path)
            .map_err(|e| anyhow::anyhow!("saving step log: {}", e))?;
        info!("Step log written to {}", config.logging.step_log_path);
    }

    Ok(())
}
