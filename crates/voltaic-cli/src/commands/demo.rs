//! `voltaic demo`: write a sample session.

use std::path::Path;

use anyhow::{Context, Result};
use voltaic_core::wire::polyline_length;
use voltaic_core::{ComponentData, Environment, Material, Network, WireSpec};

/// A battery feeding a bulb and a heater in parallel, returning through a
/// fuse and a diode, with a thermistor near the heater.
pub fn build() -> Result<Network> {
    let mut net = Network::new();
    let parts = [
        ("battery", [100.0, 300.0]),
        ("splitter", [200.0, 300.0]),
        ("bulb", [300.0, 200.0]),
        ("heater", [300.0, 400.0]),
        ("joiner", [400.0, 300.0]),
        ("fuse", [500.0, 300.0]),
        ("diode", [500.0, 500.0]),
        ("thermistor", [300.0, 460.0]),
    ];
    let mut ids = Vec::with_capacity(parts.len());
    for (name, position) in parts {
        let id = net.create(name)?;
        if let Some(component) = net.component_mut(id) {
            component.set_position(position);
        }
        ids.push(id);
    }

    let ppu = Environment::default().pixels_per_unit;
    for (from, to) in [(0, 1), (1, 2), (1, 3), (2, 4), (3, 4), (4, 5), (5, 6), (6, 0)] {
        let a = parts[from].1;
        let b = parts[to].1;
        let spec = WireSpec::resistive(Material::Copper, polyline_length(&[a, b]) / ppu, 5e-4);
        net.connect_to(ids[from], ids[to], spec)
            .with_context(|| format!("Failed to wire {} -> {}", parts[from].0, parts[to].0))?;
    }

    let battery = ComponentData {
        voltage: Some(12.0),
        ..Default::default()
    };
    net.apply_data(ids[0], &battery)?;
    let rating = ComponentData {
        max_current: Some(5.0),
        ..Default::default()
    };
    net.apply_data(ids[2], &rating)?;
    net.apply_data(ids[5], &rating)?;
    Ok(net)
}

pub fn demo(out: Option<&Path>) -> Result<()> {
    let network = build()?;
    let environment = Environment::default();
    match out {
        Some(path) => {
            voltaic_save::write_file(path, &network, &environment)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", voltaic_save::to_string(&network, &environment)?),
    }
    Ok(())
}
