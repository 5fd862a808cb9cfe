//! Per-tick evaluation: every reachable component reacts to the current it
//! was just assigned.

use std::collections::HashSet;

use crate::component::Kind;
use crate::error::Result;
use crate::event::Event;
use crate::ids::ComponentId;
use crate::network::Network;
use crate::units::{ABSOLUTE_ZERO, INFINITE_RESISTANCE, ZERO_RESISTANCE};

/// Reference temperature of a thermistor's `r25`, in kelvin.
const T25: f64 = 298.15;

impl Network {
    /// Propagate evaluation from `head` along outbound wires.
    ///
    /// Each component reacts at most once. The walk never re-enters the
    /// head and does not continue past a component that is not passable
    /// after its own reaction.
    pub fn eval(&mut self, head: ComponentId, dt: f64) -> Result<()> {
        let mut stack = vec![head];
        let mut visited = HashSet::new();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            self.react(id, dt)?;
            if !self.is_passable(id) {
                continue;
            }

            let component = self.try_component(id)?;
            for wire in component.outputs.iter().rev() {
                let Some(wire) = self.wires.get(wire) else {
                    continue;
                };
                if wire.output != head && !visited.contains(&wire.output) {
                    stack.push(wire.output);
                }
            }
        }
        Ok(())
    }

    fn react(&mut self, id: ComponentId, dt: f64) -> Result<()> {
        let component = self.try_component(id)?;
        let circuit = component.circuit;

        // A component loaded as blown re-breaks its circuit on first sight.
        if component.blown {
            if !self.is_broken(circuit) {
                self.blow(id)?;
            }
            return Ok(());
        }

        let current = component.current;
        if component.rectifier.is_some_and(|r| r.opposes(current)) {
            self.lock(id)?;
            return Ok(());
        }
        if component
            .fuse
            .is_some_and(|f| current.abs() > f.max_current)
        {
            return self.blow(id);
        }

        if component.kind.is_splitter_family() {
            return self.route_branches(id);
        }

        let power = current * current * component.resistance;
        let component = self.try_component_mut(id)?;
        let heat = component.heat;
        let light = component.light;

        match &mut component.kind {
            Kind::Battery {
                capacity: Some(capacity),
                drawn,
            } => {
                let was_charged = *drawn < *capacity;
                *drawn += current.abs() * dt;
                if was_charged && *drawn >= *capacity {
                    log::info!("{id} depleted");
                    self.events.push(Event::Depleted(id));
                }
            }
            Kind::Heater {
                temperature,
                heat_capacity,
                cooling,
            } => {
                let gain = power / (*heat_capacity).max(f64::EPSILON);
                let loss = *cooling * (*temperature - heat);
                *temperature += dt * (gain - loss);
            }
            Kind::Thermistor { r25, beta } => {
                let kelvin = (heat - ABSOLUTE_ZERO).max(1.0);
                let r = *r25 * (*beta * (1.0 / kelvin - 1.0 / T25)).exp();
                component.resistance = r.clamp(ZERO_RESISTANCE, INFINITE_RESISTANCE);
            }
            Kind::Ldr {
                dark_resistance,
                gamma,
            } => {
                let r = *dark_resistance * (1.0 + light.max(0.0)).powf(-*gamma);
                component.resistance = r.clamp(ZERO_RESISTANCE, INFINITE_RESISTANCE);
            }
            _ => {}
        }
        Ok(())
    }

    /// Give each branch circuit the current its own aggregates imply.
    fn route_branches(&mut self, id: ComponentId) -> Result<()> {
        let branches = self.try_component(id)?.branches.clone();
        for branch in branches {
            let current = self.try_circuit(branch)?.current();
            self.set_circuit_current(branch, current)?;
        }
        Ok(())
    }
}
