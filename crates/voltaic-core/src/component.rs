//! Components: the nodes of the network graph.
//!
//! A component carries the electrical state shared by every kind
//! (resistance, current, the blown latch) plus a small set of optional
//! capabilities. A capability is either present or absent; there are no
//! sentinel values standing in for "not a power source" or "unblowable".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ids::{CircuitId, ComponentId, WireId};
use crate::units::{CURRENT_EPSILON, ZERO_RESISTANCE};

pub const DEFAULT_VOLTAGE: f64 = 9.0;
pub const DEFAULT_AMBIENT_TEMPERATURE: f64 = 20.0;

/// Component kind together with any kind-specific state.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// DC cell. `capacity` is the charge (C) it can deliver, `None` for an
    /// ideal source.
    Battery { capacity: Option<f64>, drawn: f64 },
    /// Square-wave source that reverses polarity every half period.
    AcSource { frequency: f64 },
    Resistor,
    Bulb,
    Fuse,
    Diode,
    Led,
    Switch { closed: bool },
    /// Routes current into exactly one of its two branches.
    TwoWaySwitch { active: usize },
    Splitter,
    Joiner,
    Ammeter,
    Voltmeter,
    Heater {
        temperature: f64,
        /// J/K
        heat_capacity: f64,
        /// Newtonian cooling coefficient (1/s).
        cooling: f64,
    },
    /// NTC thermistor: R = r25·exp(β·(1/T − 1/T25)).
    Thermistor { r25: f64, beta: f64 },
    /// Light dependent resistor: R = dark·(1 + lux)^−γ.
    Ldr { dark_resistance: f64, gamma: f64 },
}

impl Kind {
    /// Every factory type name, in a stable order.
    pub const NAMES: [&'static str; 16] = [
        "battery",
        "ac_source",
        "resistor",
        "bulb",
        "fuse",
        "diode",
        "led",
        "switch",
        "two_way_switch",
        "splitter",
        "joiner",
        "ammeter",
        "voltmeter",
        "heater",
        "thermistor",
        "ldr",
    ];

    /// Factory type name.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Battery { .. } => "battery",
            Kind::AcSource { .. } => "ac_source",
            Kind::Resistor => "resistor",
            Kind::Bulb => "bulb",
            Kind::Fuse => "fuse",
            Kind::Diode => "diode",
            Kind::Led => "led",
            Kind::Switch { .. } => "switch",
            Kind::TwoWaySwitch { .. } => "two_way_switch",
            Kind::Splitter => "splitter",
            Kind::Joiner => "joiner",
            Kind::Ammeter => "ammeter",
            Kind::Voltmeter => "voltmeter",
            Kind::Heater { .. } => "heater",
            Kind::Thermistor { .. } => "thermistor",
            Kind::Ldr { .. } => "ldr",
        }
    }

    /// Splitters and two-way switches open child circuits on their outputs.
    pub fn is_splitter_family(&self) -> bool {
        matches!(self, Kind::Splitter | Kind::TwoWaySwitch { .. })
    }

    pub fn is_joiner(&self) -> bool {
        matches!(self, Kind::Joiner)
    }

    pub fn is_meter(&self) -> bool {
        matches!(self, Kind::Ammeter | Kind::Voltmeter)
    }

    pub fn max_inputs(&self) -> usize {
        if self.is_joiner() { 2 } else { 1 }
    }

    pub fn max_outputs(&self) -> usize {
        if self.is_splitter_family() { 2 } else { 1 }
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "battery" => Kind::Battery {
                capacity: None,
                drawn: 0.0,
            },
            "ac_source" => Kind::AcSource { frequency: 1.0 },
            "resistor" => Kind::Resistor,
            "bulb" => Kind::Bulb,
            "fuse" => Kind::Fuse,
            "diode" => Kind::Diode,
            "led" => Kind::Led,
            "switch" => Kind::Switch { closed: true },
            "two_way_switch" => Kind::TwoWaySwitch { active: 0 },
            "splitter" => Kind::Splitter,
            "joiner" => Kind::Joiner,
            "ammeter" => Kind::Ammeter,
            "voltmeter" => Kind::Voltmeter,
            "heater" => Kind::Heater {
                temperature: DEFAULT_AMBIENT_TEMPERATURE,
                heat_capacity: 50.0,
                cooling: 0.05,
            },
            "thermistor" => Kind::Thermistor {
                r25: 1000.0,
                beta: 3950.0,
            },
            "ldr" => Kind::Ldr {
                dark_resistance: 10_000.0,
                gamma: 0.7,
            },
            other => return Err(Error::UnknownComponentType(other.to_string())),
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Emits a signed voltage into the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSource {
    pub voltage: f64,
}

/// Latches `blown` once the current magnitude exceeds `max_current`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blowable {
    pub max_current: f64,
}

/// Converts dissipated power to light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Luminous {
    pub efficiency: f64,
}

/// Direction-dependent conduction with a reversible lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectifier {
    /// Conducts positive current when `true`, negative current otherwise.
    pub forward: bool,
    pub locked: bool,
}

impl Rectifier {
    /// Whether a non-zero current flows against the configured direction.
    pub fn opposes(&self, current: f64) -> bool {
        if current.abs() <= CURRENT_EPSILON {
            return false;
        }
        (current > 0.0) != self.forward
    }
}

/// A node of the network graph.
#[derive(Debug, Clone)]
pub struct Component {
    pub(crate) id: ComponentId,
    pub(crate) kind: Kind,
    pub(crate) circuit: CircuitId,
    pub(crate) position: [f64; 2],
    pub(crate) inputs: Vec<WireId>,
    pub(crate) outputs: Vec<WireId>,
    pub(crate) resistance: f64,
    pub(crate) current: f64,
    pub(crate) blown: bool,
    pub(crate) source: Option<PowerSource>,
    pub(crate) fuse: Option<Blowable>,
    pub(crate) luminous: Option<Luminous>,
    pub(crate) rectifier: Option<Rectifier>,
    /// Child circuits opened by a splitter-family component, by branch slot.
    pub(crate) branches: Vec<CircuitId>,
    pub(crate) light: f64,
    pub(crate) heat: f64,
}

impl Component {
    pub(crate) fn new(id: ComponentId, kind: Kind, circuit: CircuitId) -> Self {
        let mut component = Self {
            id,
            kind,
            circuit,
            position: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
            resistance: ZERO_RESISTANCE,
            current: 0.0,
            blown: false,
            source: None,
            fuse: None,
            luminous: None,
            rectifier: None,
            branches: Vec::new(),
            light: 0.0,
            heat: DEFAULT_AMBIENT_TEMPERATURE,
        };

        match &component.kind {
            Kind::Battery { .. } | Kind::AcSource { .. } => {
                component.source = Some(PowerSource {
                    voltage: DEFAULT_VOLTAGE,
                });
            }
            Kind::Resistor => component.resistance = 10.0,
            Kind::Bulb => {
                component.resistance = 5.0;
                component.fuse = Some(Blowable { max_current: 1.0 });
                component.luminous = Some(Luminous { efficiency: 0.1 });
            }
            Kind::Fuse => component.fuse = Some(Blowable { max_current: 1.0 }),
            Kind::Diode => {
                component.rectifier = Some(Rectifier {
                    forward: true,
                    locked: false,
                });
            }
            Kind::Led => {
                component.resistance = 1.0;
                component.fuse = Some(Blowable { max_current: 0.5 });
                component.luminous = Some(Luminous { efficiency: 0.5 });
                component.rectifier = Some(Rectifier {
                    forward: true,
                    locked: false,
                });
            }
            Kind::Heater { .. } => component.resistance = 10.0,
            Kind::Thermistor { r25, .. } => component.resistance = *r25,
            Kind::Ldr {
                dark_resistance, ..
            } => component.resistance = *dark_resistance,
            Kind::Switch { .. }
            | Kind::TwoWaySwitch { .. }
            | Kind::Splitter
            | Kind::Joiner
            | Kind::Ammeter
            | Kind::Voltmeter => {}
        }

        component
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Circuit this component currently belongs to.
    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn set_position(&mut self, position: [f64; 2]) {
        self.position = position;
    }

    pub fn inputs(&self) -> &[WireId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[WireId] {
        &self.outputs
    }

    /// Child circuits opened by this component, by branch slot.
    pub fn branches(&self) -> &[CircuitId] {
        &self.branches
    }

    /// Last current assigned by evaluation.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Own resistance. Splitter-family components report the parallel
    /// combination of their branches instead, see
    /// [`Network::component_resistance`](crate::Network::component_resistance).
    pub fn base_resistance(&self) -> f64 {
        self.resistance
    }

    pub fn power_source(&self) -> Option<&PowerSource> {
        self.source.as_ref()
    }

    pub fn rectifier(&self) -> Option<&Rectifier> {
        self.rectifier.as_ref()
    }

    pub fn luminous(&self) -> Option<&Luminous> {
        self.luminous.as_ref()
    }

    pub fn is_power_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_luminous(&self) -> bool {
        self.luminous.is_some()
    }

    pub fn is_blowable(&self) -> bool {
        self.fuse.is_some()
    }

    pub fn max_current(&self) -> Option<f64> {
        self.fuse.map(|f| f.max_current)
    }

    pub fn is_blown(&self) -> bool {
        self.blown
    }

    pub fn is_locked(&self) -> bool {
        self.rectifier.is_some_and(|r| r.locked)
    }

    /// Voltage actually emitted right now. A depleted battery emits nothing.
    pub fn emitted_voltage(&self) -> Option<f64> {
        let source = self.source?;
        match self.kind {
            Kind::Battery {
                capacity: Some(capacity),
                drawn,
            } if drawn >= capacity => Some(0.0),
            _ => Some(source.voltage),
        }
    }

    pub fn is_on(&self) -> bool {
        match self.kind {
            Kind::Switch { closed } => closed,
            _ => !self.blown && self.current.abs() > CURRENT_EPSILON,
        }
    }

    /// Light received at the start of this tick (lux).
    pub fn light_receiving(&self) -> f64 {
        self.light
    }

    /// Temperature seen by this component at the start of this tick (°C).
    pub fn heat_receiving(&self) -> f64 {
        self.heat
    }

    /// Whether this component, on its own, keeps its circuit open.
    pub fn holds_open(&self) -> bool {
        self.blown || self.is_locked() || matches!(self.kind, Kind::Switch { closed: false })
    }

    /// Scroll handler: nudge the primary parameter by `steps` notches.
    /// Returns `false` if the kind has nothing to adjust.
    pub fn nudge(&mut self, steps: i32) -> bool {
        let factor = 1.1f64.powi(steps);
        match &mut self.kind {
            Kind::Battery { .. } | Kind::AcSource { .. } => {
                if let Some(source) = &mut self.source {
                    let magnitude = (source.voltage.abs() + 0.5 * f64::from(steps)).max(0.0);
                    source.voltage = magnitude.copysign(source.voltage);
                }
            }
            Kind::Resistor | Kind::Bulb | Kind::Led | Kind::Heater { .. } => {
                self.resistance = (self.resistance * factor).max(ZERO_RESISTANCE);
            }
            Kind::Fuse => {
                if let Some(fuse) = &mut self.fuse {
                    fuse.max_current = (fuse.max_current + 0.1 * f64::from(steps)).max(0.1);
                }
            }
            Kind::Thermistor { r25, .. } => *r25 *= factor,
            Kind::Ldr {
                dark_resistance, ..
            } => *dark_resistance *= factor,
            _ => return false,
        }
        true
    }

    /// Type-specific persisted settings.
    pub fn data(&self) -> ComponentData {
        let mut data = ComponentData::default();
        match &self.kind {
            Kind::Battery { capacity, drawn } => {
                data.voltage = self.source.map(|s| s.voltage);
                data.capacity = *capacity;
                data.drawn = capacity.map(|_| *drawn);
            }
            Kind::AcSource { frequency } => {
                data.voltage = self.source.map(|s| s.voltage);
                data.frequency = Some(*frequency);
            }
            Kind::Resistor => data.resistance = Some(self.resistance),
            Kind::Bulb | Kind::Led => {
                data.resistance = Some(self.resistance);
                data.efficiency = self.luminous.map(|l| l.efficiency);
            }
            Kind::Fuse | Kind::Diode => {}
            Kind::Switch { closed } => data.closed = Some(*closed),
            Kind::TwoWaySwitch { active } => data.active = Some(*active),
            Kind::Splitter | Kind::Joiner | Kind::Ammeter | Kind::Voltmeter => {}
            Kind::Heater {
                temperature,
                heat_capacity,
                cooling,
            } => {
                data.resistance = Some(self.resistance);
                data.temperature = Some(*temperature);
                data.heat_capacity = Some(*heat_capacity);
                data.cooling = Some(*cooling);
            }
            Kind::Thermistor { r25, beta } => {
                data.r25 = Some(*r25);
                data.beta = Some(*beta);
            }
            Kind::Ldr {
                dark_resistance,
                gamma,
            } => {
                data.dark_resistance = Some(*dark_resistance);
                data.gamma = Some(*gamma);
            }
        }
        data.max_current = self.max_current();
        if self.is_blowable() {
            data.blown = Some(self.blown);
        }
        data.forward = self.rectifier.map(|r| r.forward);
        data
    }

    /// Apply the fields of `data` that make sense for this kind. Settings
    /// with topological side effects (switch state, active branch) are
    /// returned in [`Toggles`] for the network to apply.
    pub(crate) fn apply_local(&mut self, data: &ComponentData) -> Toggles {
        if let (Some(source), Some(v)) = (&mut self.source, data.voltage) {
            source.voltage = v;
        }
        if let (Some(fuse), Some(max)) = (&mut self.fuse, data.max_current) {
            fuse.max_current = max;
        }
        if let (Some(luminous), Some(e)) = (&mut self.luminous, data.efficiency) {
            luminous.efficiency = e;
        }
        if let (Some(rectifier), Some(forward)) = (&mut self.rectifier, data.forward) {
            rectifier.forward = forward;
        }
        if self.is_blowable() && data.blown == Some(true) {
            self.blown = true;
        }

        match &mut self.kind {
            Kind::Battery { capacity, drawn } => {
                if data.capacity.is_some() {
                    *capacity = data.capacity;
                }
                if let Some(d) = data.drawn {
                    *drawn = d;
                }
            }
            Kind::AcSource { frequency } => {
                if let Some(f) = data.frequency {
                    *frequency = f;
                }
            }
            Kind::Resistor | Kind::Bulb | Kind::Led => {
                if let Some(r) = data.resistance {
                    self.resistance = r.max(ZERO_RESISTANCE);
                }
            }
            Kind::Heater {
                temperature,
                heat_capacity,
                cooling,
            } => {
                if let Some(r) = data.resistance {
                    self.resistance = r.max(ZERO_RESISTANCE);
                }
                if let Some(t) = data.temperature {
                    *temperature = t;
                }
                if let Some(c) = data.heat_capacity {
                    *heat_capacity = c;
                }
                if let Some(k) = data.cooling {
                    *cooling = k;
                }
            }
            Kind::Thermistor { r25, beta } => {
                if let Some(r) = data.r25 {
                    *r25 = r;
                    self.resistance = r;
                }
                if let Some(b) = data.beta {
                    *beta = b;
                }
            }
            Kind::Ldr {
                dark_resistance,
                gamma,
            } => {
                if let Some(r) = data.dark_resistance {
                    *dark_resistance = r;
                    self.resistance = r;
                }
                if let Some(g) = data.gamma {
                    *gamma = g;
                }
            }
            _ => {}
        }

        Toggles {
            closed: data.closed,
            active: data.active,
        }
    }
}

/// Settings whose application changes circuit state.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Toggles {
    pub closed: Option<bool>,
    pub active: Option<usize>,
}

/// Type-specific settings of a component, as persisted in a session.
/// Only the fields relevant to the component's kind are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(name: &str) -> Component {
        Component::new(ComponentId(1), name.parse().unwrap(), CircuitId::TOP)
    }

    #[test]
    fn test_factory_names_round_trip() {
        for name in Kind::NAMES {
            let kind: Kind = name.parse().unwrap();
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn test_unknown_type() {
        let err = "capacitor".parse::<Kind>().unwrap_err();
        assert_eq!(err, Error::UnknownComponentType("capacitor".into()));
    }

    #[test]
    fn test_capabilities_by_kind() {
        assert!(make("battery").is_power_source());
        assert!(!make("resistor").is_power_source());
        assert!(make("bulb").is_luminous() && make("bulb").is_blowable());
        assert!(make("fuse").is_blowable() && !make("fuse").is_luminous());
        assert!(make("led").rectifier().is_some());
        assert_eq!(make("resistor").max_current(), None);
    }

    #[test]
    fn test_degree_limits() {
        assert_eq!(make("splitter").kind().max_outputs(), 2);
        assert_eq!(make("two_way_switch").kind().max_outputs(), 2);
        assert_eq!(make("joiner").kind().max_inputs(), 2);
        assert_eq!(make("resistor").kind().max_inputs(), 1);
        assert_eq!(make("resistor").kind().max_outputs(), 1);
    }

    #[test]
    fn test_rectifier_opposes() {
        let forward = Rectifier {
            forward: true,
            locked: false,
        };
        assert!(!forward.opposes(1.0));
        assert!(forward.opposes(-1.0));
        assert!(!forward.opposes(0.0));

        let reverse = Rectifier {
            forward: false,
            locked: false,
        };
        assert!(reverse.opposes(1.0));
    }

    #[test]
    fn test_depleted_battery_emits_nothing() {
        let mut battery = make("battery");
        battery.kind = Kind::Battery {
            capacity: Some(10.0),
            drawn: 10.0,
        };
        assert_eq!(battery.emitted_voltage(), Some(0.0));
        assert_eq!(make("resistor").emitted_voltage(), None);
    }

    #[test]
    fn test_data_round_trip() {
        let mut heater = make("heater");
        heater.resistance = 22.0;
        let data = heater.data();
        assert_eq!(data.resistance, Some(22.0));
        assert_eq!(data.voltage, None);

        let mut other = make("heater");
        other.apply_local(&data);
        assert_eq!(other.base_resistance(), 22.0);
        assert_eq!(other.data(), data);
    }

    #[test]
    fn test_nudge() {
        let mut battery = make("battery");
        assert!(battery.nudge(2));
        assert_eq!(battery.emitted_voltage(), Some(DEFAULT_VOLTAGE + 1.0));

        let mut resistor = make("resistor");
        resistor.nudge(1);
        assert!((resistor.base_resistance() - 11.0).abs() < 1e-12);

        assert!(!make("joiner").nudge(1));
    }
}
