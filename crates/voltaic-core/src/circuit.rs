//! Circuit scopes and their electrical aggregates.
//!
//! A circuit is a series scope. Parallel topology is folded in by splitter
//! components, which report the parallel combination of their child
//! circuits and are then summed like any other series member.

use crate::component::Kind;
use crate::ids::{CircuitId, ComponentId, WireId};
use crate::network::Network;
use crate::units::{ZERO_RESISTANCE, is_zero_resistance};

/// Break state of a single circuit scope, ignoring ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakState {
    #[default]
    Unbroken,
    Broken { by: ComponentId },
}

/// Where a child circuit hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub splitter: ComponentId,
    pub slot: usize,
}

/// A circuit scope: membership lists, depth and break state.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub(crate) id: CircuitId,
    pub(crate) depth: usize,
    pub(crate) parent: Option<CircuitId>,
    pub(crate) origin: Option<Branch>,
    pub(crate) components: Vec<ComponentId>,
    pub(crate) wires: Vec<WireId>,
    pub(crate) state: BreakState,
}

impl Circuit {
    pub(crate) fn top() -> Self {
        Self {
            id: CircuitId::TOP,
            depth: 0,
            parent: None,
            origin: None,
            components: Vec::new(),
            wires: Vec::new(),
            state: BreakState::Unbroken,
        }
    }

    pub(crate) fn child(id: CircuitId, parent: &Circuit, origin: Branch) -> Self {
        Self {
            id,
            depth: parent.depth + 1,
            parent: Some(parent.id),
            origin: Some(origin),
            components: Vec::new(),
            wires: Vec::new(),
            state: BreakState::Unbroken,
        }
    }

    pub fn id(&self) -> CircuitId {
        self.id
    }

    /// 0 for the top circuit, parent depth + 1 otherwise.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<CircuitId> {
        self.parent
    }

    /// The splitter branch this circuit was opened for.
    pub fn origin(&self) -> Option<Branch> {
        self.origin
    }

    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    /// Own break state, ignoring ancestors.
    pub fn state(&self) -> BreakState {
        self.state
    }

    pub fn broken_by(&self) -> Option<ComponentId> {
        match self.state {
            BreakState::Unbroken => None,
            BreakState::Broken { by } => Some(by),
        }
    }

    pub(crate) fn remove_component(&mut self, id: ComponentId) {
        self.components.retain(|&c| c != id);
    }

    pub(crate) fn remove_wire(&mut self, id: WireId) {
        self.wires.retain(|&w| w != id);
    }
}

/// Read-only view of a circuit with access to the rest of the network, used
/// to compute aggregates.
#[derive(Clone, Copy)]
pub struct CircuitView<'a> {
    pub(crate) network: &'a Network,
    pub(crate) circuit: &'a Circuit,
}

impl<'a> CircuitView<'a> {
    pub fn id(&self) -> CircuitId {
        self.circuit.id
    }

    pub fn depth(&self) -> usize {
        self.circuit.depth
    }

    pub fn circuit(&self) -> &'a Circuit {
        self.circuit
    }

    /// Broken if this scope or any ancestor is broken.
    pub fn is_broken(&self) -> bool {
        self.network.is_broken(self.circuit.id)
    }

    pub fn broken_by(&self) -> Option<ComponentId> {
        self.circuit.broken_by()
    }

    /// Series sum of member resistances plus internal wire resistances.
    /// Never below [`ZERO_RESISTANCE`].
    pub fn resistance(&self) -> f64 {
        let members: f64 = self
            .circuit
            .components
            .iter()
            .map(|&id| self.network.component_resistance(id))
            .filter(|&r| !is_zero_resistance(r))
            .sum();

        let wires: f64 = self
            .circuit
            .wires
            .iter()
            .filter_map(|&id| self.network.wire(id))
            .filter(|w| {
                self.network
                    .component(w.output())
                    .is_some_and(|c| c.circuit == self.circuit.id)
            })
            .map(|w| w.resistance())
            .sum();

        (members + wires).max(ZERO_RESISTANCE)
    }

    /// Top circuit: signed sum of every emitted voltage. Child circuits:
    /// resistance-weighted share of the top voltage.
    pub fn voltage(&self) -> f64 {
        if self.circuit.depth == 0 {
            return self
                .network
                .components()
                .filter_map(|c| c.emitted_voltage())
                .sum();
        }
        let top = self.network.top();
        (self.resistance() / top.resistance()) * top.voltage()
    }

    /// Ohm's law, or zero when broken.
    pub fn current(&self) -> f64 {
        if self.is_broken() {
            return 0.0;
        }
        self.voltage() / self.resistance()
    }

    /// Whether this is the branch a two-way switch is not routing into.
    pub fn is_inactive_branch(&self) -> bool {
        let Some(origin) = self.circuit.origin else {
            return false;
        };
        match self.network.component(origin.splitter).map(|c| &c.kind) {
            Some(Kind::TwoWaySwitch { active }) => *active != origin.slot,
            _ => false,
        }
    }
}

impl std::fmt::Debug for CircuitView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitView")
            .field("id", &self.circuit.id)
            .field("depth", &self.circuit.depth)
            .field("state", &self.circuit.state)
            .finish()
    }
}
