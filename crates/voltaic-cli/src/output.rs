//! Plain-text reports.

use voltaic_core::units::format_value;
use voltaic_core::{Event, Network};

pub fn print_circuits(network: &Network) {
    println!(
        "{:<8} {:>5} {:>8} {:>12} {:>12} {:>12}  {}",
        "Circuit", "Depth", "Parent", "R", "V", "I", "State"
    );
    println!("{}", "-".repeat(72));
    for circuit in network.circuits() {
        let parent = circuit
            .circuit()
            .parent()
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let state = match circuit.broken_by() {
            Some(by) => format!("broken by {by}"),
            None if circuit.is_broken() => "broken above".to_string(),
            None => "ok".to_string(),
        };
        println!(
            "{:<8} {:>5} {:>8} {:>12} {:>12} {:>12}  {}",
            circuit.id().to_string(),
            circuit.depth(),
            parent,
            format_value(circuit.resistance(), "Ω"),
            format_value(circuit.voltage(), "V"),
            format_value(circuit.current(), "A"),
            state
        );
    }
}

pub fn print_components(network: &Network) {
    println!(
        "{:<6} {:<15} {:<6} {:>12} {:>12} {:>12}  {}",
        "Id", "Type", "In", "R", "V", "I", "Flags"
    );
    println!("{}", "-".repeat(80));
    for id in network.flow_order() {
        let (Some(component), Some(probe)) = (network.component(id), network.probe(id)) else {
            continue;
        };

        let mut flags = Vec::new();
        if probe.on {
            flags.push("on".to_string());
        }
        if probe.blown {
            flags.push("BLOWN".to_string());
        }
        if component.is_locked() {
            flags.push("locked".to_string());
        }
        if probe.luminosity > 0.0 {
            flags.push(format!("{:.3} lm", probe.luminosity));
        }
        if let Some(reading) = probe.reading {
            flags.push(format!("reads {reading:.4}"));
        }

        println!(
            "{:<6} {:<15} {:<6} {:>12} {:>12} {:>12}  {}",
            id.to_string(),
            component.kind().name(),
            component.circuit().to_string(),
            format_value(probe.resistance, "Ω"),
            format_value(probe.voltage, "V"),
            format_value(probe.current, "A"),
            flags.join(", ")
        );
    }
}

pub fn print_events(tick: u64, events: &[Event]) {
    for event in events {
        let text = match event {
            Event::Blown(id) => format!("{id} blew"),
            Event::Locked(id) => format!("{id} locked"),
            Event::Unlocked(id) => format!("{id} unlocked"),
            Event::Broken { circuit, by } => format!("{circuit} broken by {by}"),
            Event::Restored(circuit) => format!("{circuit} restored"),
            Event::Flipped(id) => format!("{id} reversed polarity"),
            Event::Depleted(id) => format!("{id} depleted"),
        };
        println!("[tick {tick:>5}] {text}");
    }
}
