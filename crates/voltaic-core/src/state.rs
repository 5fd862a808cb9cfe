//! The break/lock state machine.
//!
//! A circuit is either unbroken or broken by exactly one component. Fuses
//! and bulbs break it for good by blowing; rectifiers, switches and two-way
//! switches break it reversibly and release it again later.

use crate::circuit::BreakState;
use crate::component::{ComponentData, Kind};
use crate::error::Result;
use crate::event::Event;
use crate::ids::{CircuitId, ComponentId};
use crate::network::Network;

impl Network {
    /// `Some(cause)` breaks an unbroken circuit and zeroes its members'
    /// currents; an already broken circuit keeps its original cause.
    /// `None` makes the circuit unbroken.
    pub fn break_circuit(&mut self, id: CircuitId, cause: Option<ComponentId>) -> Result<()> {
        let circuit = self.circuit_mut(id)?;
        match (circuit.state, cause) {
            (BreakState::Unbroken, Some(by)) => {
                circuit.state = BreakState::Broken { by };
                self.zero_members(id);
                self.events.push(Event::Broken { circuit: id, by });
                log::debug!("{id} broken by {by}");
            }
            (BreakState::Broken { .. }, None) => {
                circuit.state = BreakState::Unbroken;
                self.events.push(Event::Restored(id));
                log::debug!("{id} restored");
            }
            _ => {}
        }
        Ok(())
    }

    /// Undo a break caused by `by`. If another member still holds the
    /// circuit open, the circuit is re-broken with that member as cause.
    pub fn release(&mut self, id: CircuitId, by: ComponentId) -> Result<()> {
        if self.try_circuit(id)?.broken_by() != Some(by) {
            return Ok(());
        }
        self.break_circuit(id, None)?;
        if let Some(other) = self.standing_cause(id, by) {
            self.break_circuit(id, Some(other))?;
        }
        Ok(())
    }

    fn standing_cause(&self, id: CircuitId, except: ComponentId) -> Option<ComponentId> {
        let view = self.circuit(id)?;
        let member = view
            .circuit()
            .components()
            .iter()
            .filter(|&&c| c != except)
            .find(|&&c| self.component(c).is_some_and(|c| c.holds_open()))
            .copied();
        if member.is_some() {
            return member;
        }
        if view.is_inactive_branch() {
            return view
                .circuit()
                .origin()
                .map(|o| o.splitter)
                .filter(|&s| s != except);
        }
        None
    }

    /// Zero the currents of every component in the circuit and in all of
    /// its nested branches.
    pub(crate) fn zero_members(&mut self, id: CircuitId) {
        let members: Vec<ComponentId> = self
            .subtree(id)
            .into_iter()
            .filter_map(|c| self.circuits.get(c.index()))
            .flat_map(|c| c.components.iter().copied())
            .collect();
        for member in members {
            if let Some(component) = self.components.get_mut(&member) {
                component.current = 0.0;
            }
        }
    }

    /// Not blown, and not the recorded cause of its own circuit's break.
    pub fn is_passable(&self, id: ComponentId) -> bool {
        let Some(component) = self.component(id) else {
            return false;
        };
        !component.blown
            && self
                .circuit(component.circuit)
                .is_none_or(|c| c.broken_by() != Some(id))
    }

    /// Latch a component as blown and break its circuit, overriding any
    /// previous cause.
    pub fn blow(&mut self, id: ComponentId) -> Result<()> {
        let component = self.try_component_mut(id)?;
        let first = !component.blown;
        component.blown = true;
        component.current = 0.0;
        let circuit = component.circuit;

        let scope = self.circuit_mut(circuit)?;
        let changed = scope.state != (BreakState::Broken { by: id });
        scope.state = BreakState::Broken { by: id };
        self.zero_members(circuit);

        if first {
            log::info!("{id} blew");
            self.events.push(Event::Blown(id));
        }
        if changed {
            self.events.push(Event::Broken { circuit, by: id });
        }
        Ok(())
    }

    /// Lock a rectifier. Its circuit is broken only if nothing else already
    /// broke it.
    pub fn lock(&mut self, id: ComponentId) -> Result<()> {
        let component = self.try_component_mut(id)?;
        let circuit = component.circuit;
        let Some(rectifier) = component.rectifier.as_mut() else {
            return Ok(());
        };
        if !rectifier.locked {
            rectifier.locked = true;
            log::info!("{id} locked");
            self.events.push(Event::Locked(id));
        }
        if !self.is_broken(circuit) {
            self.break_circuit(circuit, Some(id))?;
        }
        Ok(())
    }

    /// Unlock a rectifier and release its circuit if it was the cause.
    pub fn unlock(&mut self, id: ComponentId) -> Result<()> {
        let component = self.try_component_mut(id)?;
        let circuit = component.circuit;
        let Some(rectifier) = component.rectifier.as_mut() else {
            return Ok(());
        };
        if !rectifier.locked {
            return Ok(());
        }
        rectifier.locked = false;
        log::info!("{id} unlocked");
        self.events.push(Event::Unlocked(id));
        self.release(circuit, id)
    }

    /// Unlock every rectifier in the circuit tree containing `circuit`.
    pub fn unlock_tree(&mut self, circuit: CircuitId) -> Result<()> {
        let root = self.root_of(circuit);
        let locked: Vec<ComponentId> = self
            .components()
            .filter(|c| c.is_locked() && self.root_of(c.circuit) == root)
            .map(|c| c.id)
            .collect();
        for id in locked {
            self.unlock(id)?;
        }
        Ok(())
    }

    /// Interaction "flip": reverse a power source (unlocking every
    /// rectifier in its tree), reverse a rectifier, toggle a switch, or
    /// swap a two-way switch's active branch. Other kinds ignore it.
    pub fn flip(&mut self, id: ComponentId) -> Result<()> {
        let component = self.try_component_mut(id)?;
        let circuit = component.circuit;

        if let Some(source) = component.source.as_mut() {
            source.voltage = -source.voltage;
            log::debug!("{id} flipped to {} V", source.voltage);
            self.events.push(Event::Flipped(id));
            return self.unlock_tree(circuit);
        }

        if let Some(rectifier) = component.rectifier.as_mut() {
            rectifier.forward = !rectifier.forward;
            return self.unlock(id);
        }

        match component.kind {
            Kind::Switch { closed } => self.set_switch(id, !closed),
            Kind::TwoWaySwitch { active } => self.select_branch(id, 1 - active.min(1)),
            _ => Ok(()),
        }
    }

    /// Open or close a switch.
    pub fn set_switch(&mut self, id: ComponentId, closed: bool) -> Result<()> {
        let component = self.try_component_mut(id)?;
        let circuit = component.circuit;
        let Kind::Switch { closed: state } = &mut component.kind else {
            return Ok(());
        };
        *state = closed;

        if closed {
            self.release(circuit, id)
        } else if !self.is_broken(circuit) {
            self.break_circuit(circuit, Some(id))
        } else {
            Ok(())
        }
    }

    /// Route a two-way switch into branch `active`; the other branch is
    /// broken by the switch.
    pub fn select_branch(&mut self, id: ComponentId, active: usize) -> Result<()> {
        let component = self.try_component_mut(id)?;
        let Kind::TwoWaySwitch { active: state } = &mut component.kind else {
            return Ok(());
        };
        *state = active.min(1);
        let active = *state;
        let branches = component.branches.clone();

        for (slot, branch) in branches.into_iter().enumerate() {
            if slot == active {
                self.release(branch, id)?;
            } else {
                self.break_circuit(branch, Some(id))?;
            }
        }
        Ok(())
    }

    /// Apply persisted settings to a component, including the ones that
    /// change circuit state.
    pub fn apply_data(&mut self, id: ComponentId, data: &ComponentData) -> Result<()> {
        let toggles = self.try_component_mut(id)?.apply_local(data);
        if let Some(closed) = toggles.closed {
            self.set_switch(id, closed)?;
        }
        if let Some(active) = toggles.active {
            self.select_branch(id, active)?;
        }
        Ok(())
    }
}
