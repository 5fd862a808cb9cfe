//! `voltaic inspect`: print a session's topology.

use std::path::Path;

use anyhow::{Context, Result};

use crate::output::print_circuits;

pub fn inspect(input: &Path) -> Result<()> {
    let (mut network, environment) = voltaic_save::read_file(input)
        .with_context(|| format!("Failed to load session: {}", input.display()))?;

    println!("Session: {}", input.display());
    println!(
        "Canvas: {} x {} px, {} px/m, {} °C, {} lx",
        environment.width,
        environment.height,
        environment.pixels_per_unit,
        environment.ambient_temperature,
        environment.ambient_light
    );
    println!("Components: {}", network.component_count());
    println!("Wires: {}", network.wire_count());
    println!();

    println!("Topology (flow order):");
    for id in network.flow_order() {
        let component = network.try_component(id)?;
        let targets: Vec<String> = component
            .outputs()
            .iter()
            .filter_map(|&w| network.wire(w))
            .map(|w| w.output().to_string())
            .collect();
        println!(
            "  {:<6} {:<15} in {:<5} -> {}",
            id.to_string(),
            component.kind().name(),
            component.circuit().to_string(),
            if targets.is_empty() {
                "(none)".to_string()
            } else {
                targets.join(", ")
            }
        );
    }
    println!();

    print_circuits(&network);
    println!();

    match network.head() {
        None => println!("Loop: no power source"),
        Some(head) => match network.trace(head, head, false, false) {
            Some(path) => {
                let hops: Vec<String> = path.iter().map(|id| id.to_string()).collect();
                println!("Loop: closed through {}", hops.join(" -> "));
            }
            None => println!("Loop: open at head {head}"),
        },
    }
    Ok(())
}
