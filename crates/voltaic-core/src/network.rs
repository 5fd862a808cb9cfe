//! The network arena: registry of components, wires and circuit scopes.
//!
//! Ownership is strictly forward. The network owns everything; circuits and
//! wires refer to components by id, and parent links are plain indices.
//! Removing a component therefore cannot leave a dangling reference behind,
//! only an id that no longer resolves.

use indexmap::IndexMap;

use crate::circuit::{BreakState, Branch, Circuit, CircuitView};
use crate::component::{Component, Kind};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::ids::{CircuitId, ComponentId, WireId};
use crate::units::{INFINITE_RESISTANCE, ZERO_RESISTANCE, is_zero_resistance};
use crate::wire::Wire;

/// A session's electrical network.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) components: IndexMap<ComponentId, Component>,
    pub(crate) wires: IndexMap<WireId, Wire>,
    pub(crate) circuits: Vec<Circuit>,
    next_component: u32,
    next_wire: u32,
    head: Option<ComponentId>,
    pub(crate) events: Vec<Event>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Create an empty network with only the top circuit.
    pub fn new() -> Self {
        Self {
            components: IndexMap::new(),
            wires: IndexMap::new(),
            circuits: vec![Circuit::top()],
            next_component: 1,
            next_wire: 1,
            head: None,
            events: Vec::new(),
        }
    }

    /// Create a component from a factory type name, e.g. `"resistor"`.
    pub fn create(&mut self, type_name: &str) -> Result<ComponentId> {
        let kind: Kind = type_name.parse()?;
        Ok(self.create_component(kind))
    }

    /// Insert a component of the given kind into the top circuit.
    pub fn create_component(&mut self, kind: Kind) -> ComponentId {
        let id = ComponentId(self.next_component);
        self.next_component += 1;

        log::debug!("created {} {}", kind, id);
        self.components
            .insert(id, Component::new(id, kind, CircuitId::TOP));
        self.circuits[CircuitId::TOP.index()].components.push(id);
        self.head = None;
        id
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Mutable access for geometry and parameter edits. Topology and break
    /// state are only reachable through the network's own operations.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(&id)
    }

    pub fn try_component(&self, id: ComponentId) -> Result<&Component> {
        self.components.get(&id).ok_or(Error::ComponentNotFound(id))
    }

    pub(crate) fn try_component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.components
            .get_mut(&id)
            .ok_or(Error::ComponentNotFound(id))
    }

    /// All components in registry order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components.keys().copied().collect()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    pub fn try_wire(&self, id: WireId) -> Result<&Wire> {
        self.wires.get(&id).ok_or(Error::WireNotFound(id))
    }

    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter().map(|(&id, w)| (id, w))
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn circuit(&self, id: CircuitId) -> Option<CircuitView<'_>> {
        self.circuits.get(id.index()).map(|circuit| CircuitView {
            network: self,
            circuit,
        })
    }

    pub fn try_circuit(&self, id: CircuitId) -> Result<CircuitView<'_>> {
        self.circuit(id).ok_or(Error::CircuitNotFound(id))
    }

    /// The top-level circuit.
    pub fn top(&self) -> CircuitView<'_> {
        CircuitView {
            network: self,
            circuit: &self.circuits[CircuitId::TOP.index()],
        }
    }

    pub fn circuits(&self) -> impl Iterator<Item = CircuitView<'_>> {
        self.circuits.iter().map(move |circuit| CircuitView {
            network: self,
            circuit,
        })
    }

    pub(crate) fn circuit_mut(&mut self, id: CircuitId) -> Result<&mut Circuit> {
        self.circuits
            .get_mut(id.index())
            .ok_or(Error::CircuitNotFound(id))
    }

    /// Broken if the circuit or any of its ancestors is broken.
    pub fn is_broken(&self, id: CircuitId) -> bool {
        let mut next = Some(id);
        while let Some(id) = next {
            let Some(circuit) = self.circuits.get(id.index()) else {
                return false;
            };
            if circuit.state != BreakState::Unbroken {
                return true;
            }
            next = circuit.parent;
        }
        false
    }

    /// The circuit followed by every circuit nested below it.
    pub fn subtree(&self, id: CircuitId) -> Vec<CircuitId> {
        let mut found = vec![id];
        let mut next = 0;
        while next < found.len() {
            let parent = found[next];
            found.extend(
                self.circuits
                    .iter()
                    .filter(|c| c.parent == Some(parent))
                    .map(|c| c.id),
            );
            next += 1;
        }
        found
    }

    /// Outermost ancestor of a circuit.
    pub fn root_of(&self, id: CircuitId) -> CircuitId {
        let mut id = id;
        while let Some(parent) = self.circuits.get(id.index()).and_then(|c| c.parent) {
            id = parent;
        }
        id
    }

    /// Resistance a component presents in series. Splitter-family
    /// components report the parallel combination of their open branches.
    pub fn component_resistance(&self, id: ComponentId) -> f64 {
        let Some(component) = self.components.get(&id) else {
            return ZERO_RESISTANCE;
        };
        if !component.kind.is_splitter_family() {
            return component.resistance;
        }
        self.parallel_resistance(&component.branches)
    }

    fn parallel_resistance(&self, branches: &[CircuitId]) -> f64 {
        if branches.is_empty() {
            return ZERO_RESISTANCE;
        }

        let mut conductance = 0.0;
        let mut open = 0;
        for &branch in branches {
            let Some(view) = self.circuit(branch) else {
                open += 1;
                continue;
            };
            if view.circuit.state != BreakState::Unbroken {
                open += 1;
                continue;
            }
            let r = view.resistance();
            if !is_zero_resistance(r) {
                conductance += 1.0 / r;
            }
        }

        if open == branches.len() {
            INFINITE_RESISTANCE
        } else if conductance == 0.0 {
            ZERO_RESISTANCE
        } else {
            1.0 / conductance
        }
    }

    /// Emitted voltage for power sources, `I·R` drop otherwise.
    pub fn component_voltage(&self, id: ComponentId) -> f64 {
        let Some(component) = self.components.get(&id) else {
            return 0.0;
        };
        match component.emitted_voltage() {
            Some(v) => v,
            None => component.current * self.component_resistance(id),
        }
    }

    /// Power delivered (sources) or dissipated (everything else), in W.
    pub fn component_power(&self, id: ComponentId) -> f64 {
        let Some(component) = self.components.get(&id) else {
            return 0.0;
        };
        match component.emitted_voltage() {
            Some(v) => (v * component.current).abs(),
            None => component.current * component.current * self.component_resistance(id),
        }
    }

    /// Light output of a luminous component that is on, in lumen-ish units.
    pub fn luminosity(&self, id: ComponentId) -> f64 {
        match self.components.get(&id) {
            Some(c) if c.is_on() => c
                .luminous
                .map_or(0.0, |l| self.component_power(id) * l.efficiency),
            _ => 0.0,
        }
    }

    /// Snapshot of everything a renderer needs to draw a component.
    pub fn probe(&self, id: ComponentId) -> Option<Probe> {
        let component = self.components.get(&id)?;
        let reading = match component.kind {
            Kind::Ammeter => Some(component.current),
            Kind::Voltmeter => self.circuit(component.circuit).map(|c| c.voltage()),
            _ => None,
        };
        Some(Probe {
            resistance: self.component_resistance(id),
            voltage: self.component_voltage(id),
            current: component.current,
            max_current: component.max_current(),
            on: component.is_on(),
            blown: component.blown,
            luminous: component.is_luminous(),
            power_source: component.is_power_source(),
            power: self.component_power(id),
            luminosity: self.luminosity(id),
            light_receiving: component.light,
            heat_receiving: component.heat,
            reading,
        })
    }

    /// Assign a circuit's current to each directly-owned component. A
    /// component whose own circuit reports broken gets zero instead, and a
    /// broken circuit zeroes its nested branches too.
    pub fn set_circuit_current(&mut self, id: CircuitId, value: f64) -> Result<()> {
        if self.try_circuit(id)?.is_broken() {
            self.zero_members(id);
            return Ok(());
        }
        let members = self.try_circuit(id)?.circuit.components.clone();
        for member in members {
            let Some(circuit) = self.components.get(&member).map(|c| c.circuit) else {
                continue;
            };
            let current = if self.is_broken(circuit) { 0.0 } else { value };
            if let Some(component) = self.components.get_mut(&member) {
                component.current = current;
            }
        }
        Ok(())
    }

    /// The head power source, resolved on demand and cached until the graph
    /// next changes.
    pub fn head(&mut self) -> Option<ComponentId> {
        match self.head {
            Some(head) if self.components.contains_key(&head) => Some(head),
            _ => {
                self.head = self.find_head();
                self.head
            }
        }
    }

    /// First power source in registry order, without touching the cache.
    pub fn find_head(&self) -> Option<ComponentId> {
        self.components
            .values()
            .find(|c| c.is_power_source())
            .map(|c| c.id)
    }

    pub(crate) fn invalidate_head(&mut self) {
        self.head = None;
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Remove a component: detach its wires, then drop it from its circuit
    /// and the registry. Neighbouring components are left in place.
    pub fn remove(&mut self, id: ComponentId) -> Result<()> {
        let component = self.try_component(id)?;
        let circuit = component.circuit;
        let branches = component.branches.clone();
        let wires: Vec<WireId> = component
            .inputs
            .iter()
            .chain(component.outputs.iter())
            .copied()
            .collect();

        for wire in wires {
            self.detach_wire(wire);
        }
        self.circuit_mut(circuit)?.remove_component(id);
        self.components.shift_remove(&id);

        self.release(circuit, id)?;
        for branch in branches {
            self.release(branch, id)?;
        }

        self.head = None;
        log::debug!("removed {id}");
        Ok(())
    }

    /// Remove a single wire.
    pub fn disconnect(&mut self, wire: WireId) -> Result<()> {
        self.try_wire(wire)?;
        self.detach_wire(wire);
        self.head = None;
        Ok(())
    }

    fn detach_wire(&mut self, id: WireId) {
        let Some(wire) = self.wires.shift_remove(&id) else {
            return;
        };
        if let Some(input) = self.components.get_mut(&wire.input) {
            input.outputs.retain(|&w| w != id);
        }
        if let Some(output) = self.components.get_mut(&wire.output) {
            output.inputs.retain(|&w| w != id);
        }
        if let Some(circuit) = self.circuits.get_mut(wire.circuit.index()) {
            circuit.remove_wire(id);
        }
    }

    pub(crate) fn allocate_wire(&mut self, wire: Wire) -> WireId {
        let id = WireId(self.next_wire);
        self.next_wire += 1;
        self.wires.insert(id, wire);
        id
    }

    /// Branch slot for the next output of a splitter: the first branch no
    /// output wire currently occupies, or a fresh child circuit.
    pub(crate) fn open_branch(&mut self, splitter: ComponentId) -> Result<CircuitId> {
        let component = self.try_component(splitter)?;
        let parent = component.circuit;
        let used: Vec<CircuitId> = component
            .outputs
            .iter()
            .filter_map(|w| self.wires.get(w))
            .filter_map(|w| w.branch)
            .collect();

        let free = component
            .branches
            .iter()
            .enumerate()
            .find(|(_, b)| !used.contains(b))
            .map(|(slot, &b)| (slot, b));

        let (slot, branch) = match free {
            Some(found) => found,
            None => {
                let slot = component.branches.len();
                let id = CircuitId(self.circuits.len() as u32);
                let parent_circuit = &self.circuits[parent.index()];
                let circuit = Circuit::child(id, parent_circuit, Branch { splitter, slot });
                self.circuits.push(circuit);
                self.try_component_mut(splitter)?.branches.push(id);
                log::debug!("{splitter} opened branch {slot} as {id}");
                (slot, id)
            }
        };

        if let Kind::TwoWaySwitch { active } = self.try_component(splitter)?.kind {
            if active == slot {
                self.release(branch, splitter)?;
            } else {
                self.break_circuit(branch, Some(splitter))?;
            }
        }

        Ok(branch)
    }

    /// Move a component into another circuit, carrying any branches it
    /// opened along with it.
    pub(crate) fn move_component(&mut self, id: ComponentId, to: CircuitId) -> Result<()> {
        let component = self.try_component(id)?;
        let from = component.circuit;
        if from == to {
            return Ok(());
        }
        let branches = component.branches.clone();

        self.circuit_mut(from)?.remove_component(id);
        self.circuit_mut(to)?.components.push(id);
        self.try_component_mut(id)?.circuit = to;

        for branch in branches {
            self.reroot(branch, to)?;
        }
        Ok(())
    }

    fn reroot(&mut self, circuit: CircuitId, parent: CircuitId) -> Result<()> {
        let depth = self.try_circuit(parent)?.depth() + 1;
        let child = self.circuit_mut(circuit)?;
        child.parent = Some(parent);
        child.depth = depth;

        let nested: Vec<CircuitId> = self.circuits[circuit.index()]
            .components
            .iter()
            .filter_map(|id| self.components.get(id))
            .flat_map(|c| c.branches.iter().copied())
            .collect();
        for branch in nested {
            self.reroot(branch, circuit)?;
        }
        Ok(())
    }

    /// Nudge a component's primary parameter (scroll handler).
    pub fn nudge(&mut self, id: ComponentId, steps: i32) -> Result<bool> {
        Ok(self.try_component_mut(id)?.nudge(steps))
    }
}

/// Per-component values exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub resistance: f64,
    pub voltage: f64,
    pub current: f64,
    pub max_current: Option<f64>,
    pub on: bool,
    pub blown: bool,
    pub luminous: bool,
    pub power_source: bool,
    pub power: f64,
    pub luminosity: f64,
    pub light_receiving: f64,
    pub heat_receiving: f64,
    /// Meter reading, for ammeters and voltmeters.
    pub reading: Option<f64>,
}
