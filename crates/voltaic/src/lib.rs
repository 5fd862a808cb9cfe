//! # Voltaic
//!
//! A real-time electrical network simulator.
//!
//! Voltaic models a network of components joined by wires:
//! - batteries, AC sources, resistors, bulbs, fuses, diodes and LEDs
//! - switches, two-way switches, splitters and joiners
//! - meters, heaters and heat/light dependent sensors
//!
//! Each tick validates the loop through the head power source, assigns the
//! aggregate current and lets every reachable component react: fuses
//! blow, diodes lock against reverse current, heaters warm up.
//!
//! ## Quick Start
//!
//! ```rust
//! use voltaic::prelude::*;
//!
//! let mut net = Network::new();
//! let battery = net.create("battery").unwrap();
//! let resistor = net.create("resistor").unwrap();
//! net.connect_to(battery, resistor, WireSpec::ideal()).unwrap();
//! net.connect_to(resistor, battery, WireSpec::ideal()).unwrap();
//!
//! let mut sim = Simulation::from_network(net, SimConfig::default());
//! let report = sim.tick().unwrap();
//! assert!(report.closed);
//! println!("I = {} A", report.current);
//! ```
//!
//! ## Sessions
//!
//! ```rust,ignore
//! let (network, environment) = voltaic::save::read_file("session.json")?;
//! voltaic::save::write_file("copy.json", &network, &environment)?;
//! ```

pub use voltaic_core as core;
pub use voltaic_save as save;

// ============================================================================
// Convenient re-exports from voltaic_core
// ============================================================================

pub use voltaic_core::{
    BreakState,
    CircuitId,
    CircuitView,
    Component,
    ComponentData,
    ComponentId,
    ConnectionError,
    // Errors
    Error as CoreError,
    Event,
    Kind,
    Material,
    // Network
    Network,
    Probe,
    // Driver
    SimConfig,
    Simulation,
    TickReport,
    Environment,
    WireId,
    WireSpec,
};

// ============================================================================
// Convenient re-exports from voltaic_save
// ============================================================================

pub use voltaic_save::{Error as SaveError, Session, get_data, load};

/// Prelude module containing commonly used types.
///
/// ```rust
/// use voltaic::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ComponentId, Environment, Event, Kind, Network, Probe, WireSpec};

    pub use crate::{SimConfig, Simulation, TickReport};

    pub use crate::{Session, get_data, load};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let mut net = Network::new();
        let id: ComponentId = net.create("bulb").unwrap();
        let probe: Probe = net.probe(id).unwrap();
        assert!(probe.luminous);
    }

    #[test]
    fn test_session_round_trip_through_facade() {
        let mut net = Network::new();
        net.create("battery").unwrap();
        let session = get_data(&net, &Environment::default()).unwrap();
        let (loaded, _) = load(Some(&session)).unwrap();
        assert_eq!(loaded.component_count(), 1);
    }
}
