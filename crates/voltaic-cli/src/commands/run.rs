//! `voltaic run`: load a session and tick it.

use std::path::Path;

use anyhow::{Context, Result};
use voltaic_core::{SimConfig, Simulation};

use crate::output::{print_circuits, print_components, print_events};

pub fn run(input: &Path, ticks: u64, tick_rate: Option<f64>, every: u64) -> Result<()> {
    let (network, environment) = voltaic_save::read_file(input)
        .with_context(|| format!("Failed to load session: {}", input.display()))?;

    log::info!(
        "loaded {} components, {} wires from {}",
        network.component_count(),
        network.wire_count(),
        input.display()
    );

    let mut config = SimConfig::default().with_environment(environment);
    if let Some(rate) = tick_rate {
        config = config.with_tick_rate(rate);
    }

    println!(
        "Running {} for {} ticks at {} Hz",
        input.display(),
        ticks,
        config.tick_rate
    );
    println!();

    let mut sim = Simulation::from_network(network, config);
    let mut was_closed = None;
    for _ in 0..ticks {
        let report = sim
            .tick()
            .with_context(|| format!("Evaluation failed at tick {}", sim.ticks()))?;

        if was_closed != Some(report.closed) {
            let status = if report.closed { "closed" } else { "open" };
            log::info!("loop {status} at tick {}", report.tick);
            println!("[tick {:>5}] loop {status}", report.tick);
            was_closed = Some(report.closed);
        }
        print_events(report.tick, &report.events);

        if every > 0 && report.tick % every == 0 && report.tick < ticks {
            snapshot(&sim, report.tick);
        }
    }

    snapshot(&sim, sim.ticks());
    Ok(())
}

fn snapshot(sim: &Simulation, tick: u64) {
    println!();
    println!("State after tick {tick} ({:.3} s)", tick as f64 * sim.dt());
    println!();
    print_circuits(sim.network());
    println!();
    print_components(sim.network());
}
