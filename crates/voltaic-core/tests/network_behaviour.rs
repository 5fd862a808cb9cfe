//! Integration tests for aggregation, tracing, breaking and the tick driver.

use voltaic_core::units::{INFINITE_RESISTANCE, ZERO_RESISTANCE};
use voltaic_core::{
    CircuitId, ComponentData, ComponentId, Error, Event, Network, SimConfig, Simulation, WireSpec,
};

const TOL: f64 = 1e-9;

fn resistor(net: &mut Network, ohms: f64) -> ComponentId {
    let id = net.create("resistor").unwrap();
    let data = ComponentData {
        resistance: Some(ohms),
        ..Default::default()
    };
    net.apply_data(id, &data).unwrap();
    id
}

fn battery(net: &mut Network, volts: f64) -> ComponentId {
    let id = net.create("battery").unwrap();
    let data = ComponentData {
        voltage: Some(volts),
        ..Default::default()
    };
    net.apply_data(id, &data).unwrap();
    id
}

fn wire(net: &mut Network, from: ComponentId, to: ComponentId) {
    net.connect_to(from, to, WireSpec::ideal()).unwrap();
}

fn ring(net: &mut Network, ids: &[ComponentId]) {
    for pair in ids.windows(2) {
        wire(net, pair[0], pair[1]);
    }
    wire(net, ids[ids.len() - 1], ids[0]);
}

#[test]
fn test_series_resistance_is_additive() {
    for order in [[2.0, 3.0, 7.0], [7.0, 2.0, 3.0], [3.0, 7.0, 2.0]] {
        let mut net = Network::new();
        let b = battery(&mut net, 9.0);
        let rs: Vec<_> = order.iter().map(|&r| resistor(&mut net, r)).collect();
        ring(&mut net, &[b, rs[0], rs[1], rs[2]]);
        assert!((net.top().resistance() - 12.0).abs() < TOL);
    }
}

#[test]
fn test_wire_resistance_counts_in_its_circuit() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let r = resistor(&mut net, 10.0);
    let spec = WireSpec::resistive(voltaic_core::Material::Copper, 10.0, 5e-4);
    let w = net.connect_to(b, r, spec).unwrap();
    wire(&mut net, r, b);

    let expected = 10.0 + net.wire(w).unwrap().resistance();
    assert!(net.wire(w).unwrap().resistance() > 0.0);
    assert!((net.top().resistance() - expected).abs() < TOL);
}

/// ```text
///            +-- x (4 Ω) --+
/// b (9 V) - s               j - r (10 Ω) - b
///            +-- y (4 Ω) --+
/// ```
///
/// Top: 4 ∥ 4 + 10 = 12 Ω. Each branch sees (4 / 12) · 9 V = 3 V.
#[test]
fn test_branch_voltage_divider() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let s = net.create("splitter").unwrap();
    let x = resistor(&mut net, 4.0);
    let y = resistor(&mut net, 4.0);
    let j = net.create("joiner").unwrap();
    let r = resistor(&mut net, 10.0);
    for (from, to) in [(b, s), (s, x), (s, y), (x, j), (y, j), (j, r), (r, b)] {
        wire(&mut net, from, to);
    }

    assert!((net.component_resistance(s) - 2.0).abs() < TOL);
    assert!((net.top().resistance() - 12.0).abs() < TOL);

    let branch = net.component(x).unwrap().circuit();
    let child = net.circuit(branch).unwrap();
    assert_eq!(child.depth(), 1);
    assert!((child.voltage() - 3.0).abs() < TOL);
}

#[test]
fn test_ohm_closure_with_sentinels() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let f = net.create("fuse").unwrap();
    ring(&mut net, &[b, f]);

    let top = net.top();
    assert_eq!(top.resistance(), ZERO_RESISTANCE);
    assert!(top.current().is_finite());
    assert!((top.current() - top.voltage() / top.resistance()).abs() < 1.0);

    net.break_circuit(CircuitId::TOP, Some(f)).unwrap();
    assert_eq!(net.top().current(), 0.0);
}

#[test]
fn test_splitter_with_all_legs_open_is_infinite() {
    let mut net = Network::new();
    let s = net.create("splitter").unwrap();
    let x = resistor(&mut net, 4.0);
    let y = resistor(&mut net, 4.0);
    wire(&mut net, s, x);
    wire(&mut net, s, y);
    assert!((net.component_resistance(s) - 2.0).abs() < TOL);

    for leg in [x, y] {
        let circuit = net.component(leg).unwrap().circuit();
        net.break_circuit(circuit, Some(leg)).unwrap();
    }
    assert_eq!(net.component_resistance(s), INFINITE_RESISTANCE);
}

#[test]
fn test_break_is_monotonic_until_cleared() {
    let mut net = Network::new();
    let s = net.create("splitter").unwrap();
    let x = resistor(&mut net, 1.0);
    let d = net.create("diode").unwrap();
    wire(&mut net, s, x);
    wire(&mut net, x, d);
    let child = net.component(d).unwrap().circuit();

    net.break_circuit(CircuitId::TOP, Some(s)).unwrap();
    net.lock(d).unwrap();
    net.unlock(d).unwrap();
    assert!(net.top().is_broken());
    assert!(net.is_broken(child));
    assert_eq!(net.top().broken_by(), Some(s));

    net.break_circuit(CircuitId::TOP, None).unwrap();
    assert!(!net.is_broken(child));
}

/// Two routes from the splitter to the joiner, of 2 and 4 hops. The
/// longer one is wired first so ordering cannot pick the answer.
#[test]
fn test_trace_prefers_fewest_hops() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let s = net.create("splitter").unwrap();
    let p = resistor(&mut net, 1.0);
    let q = resistor(&mut net, 1.0);
    let r = resistor(&mut net, 1.0);
    let x = resistor(&mut net, 1.0);
    let j = net.create("joiner").unwrap();
    for (from, to) in [(b, s), (s, p), (p, q), (q, r), (r, j), (s, x), (x, j), (j, b)] {
        wire(&mut net, from, to);
    }

    assert_eq!(net.trace(s, j, false, true), Some(vec![s, x]));
    assert_eq!(net.trace(b, b, false, false), Some(vec![b, s, x, j]));
}

/// 6 V across 2 Ω and 3 Ω in series with a forward diode.
#[test]
fn test_end_to_end_diode_loop() {
    let mut net = Network::new();
    let b = battery(&mut net, 6.0);
    let r1 = resistor(&mut net, 2.0);
    let r2 = resistor(&mut net, 3.0);
    let d = net.create("diode").unwrap();
    ring(&mut net, &[b, r1, r2, d]);

    let mut sim = Simulation::from_network(net, SimConfig::default());
    let report = sim.tick().unwrap();
    assert!(report.closed);
    assert!((sim.network().top().resistance() - 5.0).abs() < TOL);
    assert!((report.current - 1.2).abs() < TOL);
    assert!(!sim.network().top().is_broken());
    for id in [b, r1, r2, d] {
        assert!((sim.network().component(id).unwrap().current() - 1.2).abs() < TOL);
    }

    sim.network_mut().flip(d).unwrap();
    let report = sim.tick().unwrap();
    assert!(report.events.contains(&Event::Locked(d)));
    assert_eq!(sim.network().top().broken_by(), Some(d));
    assert!(sim.network().components().all(|c| c.current() == 0.0));
}

#[test]
fn test_flipping_source_restores_locked_diode() {
    let mut net = Network::new();
    let b = battery(&mut net, 6.0);
    let r = resistor(&mut net, 2.0);
    let d = net.create("diode").unwrap();
    ring(&mut net, &[b, r, d]);
    let mut sim = Simulation::from_network(net, SimConfig::default());

    sim.network_mut().flip(b).unwrap();
    sim.tick().unwrap();
    assert!(sim.network().component(d).unwrap().is_locked());
    assert!(sim.network().top().is_broken());

    sim.network_mut().flip(b).unwrap();
    assert!(!sim.network().component(d).unwrap().is_locked());
    assert!(!sim.network().top().is_broken());

    let report = sim.tick().unwrap();
    assert!((report.current - 3.0).abs() < TOL);
}

#[test]
fn test_fuse_blows_above_rating() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let f = net.create("fuse").unwrap();
    let r = resistor(&mut net, 5.0);
    ring(&mut net, &[b, f, r]);
    let mut sim = Simulation::from_network(net, SimConfig::default());

    let report = sim.tick().unwrap();
    assert!(report.events.contains(&Event::Blown(f)));
    let fuse = sim.network().component(f).unwrap();
    assert!(fuse.is_blown());
    assert!(!fuse.is_on());
    assert_eq!(sim.network().top().broken_by(), Some(f));

    // Blowing is permanent: reversing the source does not help.
    sim.network_mut().flip(b).unwrap();
    let report = sim.tick().unwrap();
    assert_eq!(report.current, 0.0);
    assert!(sim.network().top().is_broken());
}

#[test]
fn test_fuse_within_rating_survives() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let f = net.create("fuse").unwrap();
    let r = resistor(&mut net, 10.0);
    ring(&mut net, &[b, f, r]);
    let mut sim = Simulation::from_network(net, SimConfig::default());

    let report = sim.tick().unwrap();
    assert!(report.events.is_empty());
    assert!(!sim.network().component(f).unwrap().is_blown());
}

#[test]
fn test_loaded_blown_component_rebreaks_on_first_tick() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let f = net.create("fuse").unwrap();
    let r = resistor(&mut net, 100.0);
    ring(&mut net, &[b, f, r]);
    let data = ComponentData {
        blown: Some(true),
        ..Default::default()
    };
    net.apply_data(f, &data).unwrap();
    assert!(!net.top().is_broken());

    let mut sim = Simulation::from_network(net, SimConfig::default());
    let report = sim.tick().unwrap();
    assert_eq!(sim.network().top().broken_by(), Some(f));
    assert!(report.events.contains(&Event::Broken {
        circuit: CircuitId::TOP,
        by: f
    }));
}

/// At 4 ticks per second a 1 Hz source flips every second tick.
#[test]
fn test_ac_source_alternates_and_unlocks_diodes() {
    let mut net = Network::new();
    let ac = net.create("ac_source").unwrap();
    let r = resistor(&mut net, 10.0);
    let d = net.create("diode").unwrap();
    ring(&mut net, &[ac, r, d]);
    let mut sim = Simulation::from_network(net, SimConfig::default().with_tick_rate(4.0));

    let first = sim.tick().unwrap();
    assert!((first.current - 0.9).abs() < TOL);

    let second = sim.tick().unwrap();
    assert!(second.events.contains(&Event::Flipped(ac)));
    assert!(second.events.contains(&Event::Locked(d)));
    assert!(sim.network().top().is_broken());

    let third = sim.tick().unwrap();
    assert_eq!(third.current, 0.0);

    let fourth = sim.tick().unwrap();
    assert!(fourth.events.contains(&Event::Unlocked(d)));
    assert!((fourth.current - 0.9).abs() < TOL);
    assert!(!sim.network().top().is_broken());
}

#[test]
fn test_switch_breaks_and_restores() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let sw = net.create("switch").unwrap();
    let r = resistor(&mut net, 10.0);
    ring(&mut net, &[b, sw, r]);
    let mut sim = Simulation::from_network(net, SimConfig::default());

    sim.network_mut().flip(sw).unwrap();
    assert!(!sim.network().component(sw).unwrap().is_on());
    let report = sim.tick().unwrap();
    assert_eq!(report.current, 0.0);
    assert_eq!(sim.network().top().broken_by(), Some(sw));

    sim.network_mut().flip(sw).unwrap();
    let report = sim.tick().unwrap();
    assert!((report.current - 0.9).abs() < TOL);
}

/// ```text
///                  +-- x (10 Ω) --+
/// b (9 V) - sw - s                j - b
///                  +-- y (10 Ω) --+
/// ```
///
/// Opening the switch breaks the top circuit; both branches must read zero.
#[test]
fn test_open_switch_zeroes_nested_branches() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let sw = net.create("switch").unwrap();
    let s = net.create("splitter").unwrap();
    let x = resistor(&mut net, 10.0);
    let y = resistor(&mut net, 10.0);
    let j = net.create("joiner").unwrap();
    for (from, to) in [(b, sw), (sw, s), (s, x), (s, y), (x, j), (y, j), (j, b)] {
        wire(&mut net, from, to);
    }
    let mut sim = Simulation::from_network(net, SimConfig::default());

    sim.tick().unwrap();
    assert!(sim.network().component(x).unwrap().current() > 0.0);
    assert!(sim.network().component(y).unwrap().current() > 0.0);

    sim.network_mut().flip(sw).unwrap();
    sim.tick().unwrap();
    let net = sim.network();
    let branch = net.component(x).unwrap().circuit();
    assert!(net.is_broken(branch));
    assert_eq!(net.component(x).unwrap().current(), 0.0);
    assert_eq!(net.component(y).unwrap().current(), 0.0);
    assert!(net.components().all(|c| c.current() == 0.0));
}

#[test]
fn test_two_way_switch_routes_active_branch_only() {
    let mut net = Network::new();
    let b = battery(&mut net, 9.0);
    let t = net.create("two_way_switch").unwrap();
    let x = resistor(&mut net, 10.0);
    let y = resistor(&mut net, 40.0);
    let j = net.create("joiner").unwrap();
    for (from, to) in [(b, t), (t, x), (t, y), (x, j), (y, j), (j, b)] {
        wire(&mut net, from, to);
    }
    assert!((net.component_resistance(t) - 10.0).abs() < TOL);

    let mut sim = Simulation::from_network(net, SimConfig::default());
    sim.tick().unwrap();
    assert!(sim.network().component(x).unwrap().current() > 0.0);
    assert_eq!(sim.network().component(y).unwrap().current(), 0.0);

    sim.network_mut().flip(t).unwrap();
    assert!((sim.network().component_resistance(t) - 40.0).abs() < TOL);
    sim.tick().unwrap();
    assert_eq!(sim.network().component(x).unwrap().current(), 0.0);
    assert!(sim.network().component(y).unwrap().current() > 0.0);
}

#[test]
fn test_remove_detaches_wires_and_moves_head() {
    let mut net = Network::new();
    let b1 = battery(&mut net, 9.0);
    let r = resistor(&mut net, 10.0);
    let b2 = battery(&mut net, 3.0);
    ring(&mut net, &[b1, r]);
    assert_eq!(net.head(), Some(b1));

    net.remove(b1).unwrap();
    assert_eq!(net.wire_count(), 0);
    assert!(net.component(r).unwrap().inputs().is_empty());
    assert!(net.component(r).unwrap().outputs().is_empty());
    assert_eq!(net.head(), Some(b2));
    assert!(matches!(net.remove(b1), Err(Error::ComponentNotFound(_))));
}

#[test]
fn test_head_outside_top_is_fatal() {
    let mut net = Network::new();
    let s = net.create("splitter").unwrap();
    let b = battery(&mut net, 9.0);
    wire(&mut net, s, b);

    let mut sim = Simulation::from_network(net, SimConfig::default());
    let err = sim.tick().unwrap_err();
    assert!(matches!(err, Error::HeadOutsideTop { head, .. } if head == b));
    assert!(err.is_fatal());
}
