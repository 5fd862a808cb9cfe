//! The component connection protocol.

use crate::error::{ConnectionError, Result};
use crate::ids::{CircuitId, ComponentId, WireId};
use crate::network::Network;
use crate::wire::{Wire, WireSpec};

impl Network {
    /// Connect `source` to `destination` with a new wire.
    ///
    /// Checks, in order: self-loop, duplicate edge, degree limits on both
    /// sides, and (for a joiner destination) that there is an ancestor
    /// circuit to return to. Nothing is modified unless every check passes.
    ///
    /// On success the destination moves into the circuit the wire leads
    /// into: a fresh branch for splitter-family sources, the ancestor
    /// circuit for joiner destinations, the source's circuit otherwise.
    pub fn connect_to(
        &mut self,
        source: ComponentId,
        destination: ComponentId,
        spec: WireSpec,
    ) -> Result<WireId> {
        if source == destination {
            return Err(ConnectionError::SelfLoop(source).into());
        }

        let src = self.try_component(source)?;
        let dst = self.try_component(destination)?;

        let duplicate = src
            .outputs
            .iter()
            .filter_map(|w| self.wires.get(w))
            .any(|w| w.output == destination);
        if duplicate {
            return Err(ConnectionError::Duplicate {
                from: source,
                to: destination,
            }
            .into());
        }

        let limit = src.kind.max_outputs();
        if src.outputs.len() >= limit {
            return Err(ConnectionError::OutputsExhausted { id: source, limit }.into());
        }
        let limit = dst.kind.max_inputs();
        if dst.inputs.len() >= limit {
            return Err(ConnectionError::InputsExhausted {
                id: destination,
                limit,
            }
            .into());
        }

        let splitting = src.kind.is_splitter_family();
        let joining = dst.kind.is_joiner();
        let src_circuit = src.circuit;

        let (target, branch) = if splitting {
            let branch = self.open_branch(source)?;
            let target = if joining { src_circuit } else { branch };
            (target, Some(branch))
        } else if joining {
            (self.ancestor(src_circuit)?, None)
        } else {
            (src_circuit, None)
        };

        let id = self.allocate_wire(Wire {
            input: source,
            output: destination,
            circuit: target,
            branch,
            spec,
        });
        self.try_component_mut(source)?.outputs.push(id);
        self.try_component_mut(destination)?.inputs.push(id);
        self.move_component(destination, target)?;
        self.circuit_mut(target)?.wires.push(id);
        self.invalidate_head();

        log::debug!("connected {source} -> {destination} in {target}");
        Ok(id)
    }

    /// The circuit one level above `circuit`, where a joiner returns its
    /// branches to.
    fn ancestor(&self, circuit: CircuitId) -> Result<CircuitId> {
        self.try_circuit(circuit)?
            .circuit()
            .parent()
            .ok_or_else(|| ConnectionError::NoAncestor { circuit }.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ConnectionError, Error};
    use crate::ids::CircuitId;
    use crate::network::Network;
    use crate::wire::WireSpec;

    #[test]
    fn test_self_loop_rejected() {
        let mut net = Network::new();
        let a = net.create("resistor").unwrap();
        let err = net.connect_to(a, a, WireSpec::ideal()).unwrap_err();
        assert_eq!(err, Error::Connection(ConnectionError::SelfLoop(a)));
        assert_eq!(net.wire_count(), 0);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut net = Network::new();
        let a = net.create("splitter").unwrap();
        let b = net.create("resistor").unwrap();
        net.connect_to(a, b, WireSpec::ideal()).unwrap();
        let err = net.connect_to(a, b, WireSpec::ideal()).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Duplicate { .. })
        ));
        assert_eq!(net.wire_count(), 1);
    }

    #[test]
    fn test_degree_limits() {
        let mut net = Network::new();
        let a = net.create("resistor").unwrap();
        let b = net.create("resistor").unwrap();
        let c = net.create("resistor").unwrap();
        net.connect_to(a, b, WireSpec::ideal()).unwrap();

        let err = net.connect_to(a, c, WireSpec::ideal()).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::OutputsExhausted { limit: 1, .. })
        ));

        let err = net.connect_to(c, b, WireSpec::ideal()).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::InputsExhausted { limit: 1, .. })
        ));
        assert_eq!(net.wire_count(), 1);
    }

    #[test]
    fn test_wire_links_both_endpoints() {
        let mut net = Network::new();
        let a = net.create("battery").unwrap();
        let b = net.create("resistor").unwrap();
        let w = net.connect_to(a, b, WireSpec::ideal()).unwrap();

        assert_eq!(net.component(a).unwrap().outputs(), &[w]);
        assert_eq!(net.component(b).unwrap().inputs(), &[w]);
        assert_eq!(net.wire(w).unwrap().circuit(), CircuitId::TOP);
        assert!(net.top().circuit().wires().contains(&w));
    }

    #[test]
    fn test_splitter_opens_child_circuits() {
        let mut net = Network::new();
        let s = net.create("splitter").unwrap();
        let x = net.create("resistor").unwrap();
        let y = net.create("resistor").unwrap();
        net.connect_to(s, x, WireSpec::ideal()).unwrap();
        net.connect_to(s, y, WireSpec::ideal()).unwrap();

        let branches = net.component(s).unwrap().branches().to_vec();
        assert_eq!(branches.len(), 2);
        assert_eq!(net.component(x).unwrap().circuit(), branches[0]);
        assert_eq!(net.component(y).unwrap().circuit(), branches[1]);

        let child = net.circuit(branches[0]).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.circuit().parent(), Some(CircuitId::TOP));
        assert!(!net.top().circuit().components().contains(&x));
    }

    #[test]
    fn test_joiner_returns_to_ancestor() {
        let mut net = Network::new();
        let s = net.create("splitter").unwrap();
        let x = net.create("resistor").unwrap();
        let j = net.create("joiner").unwrap();
        net.connect_to(s, x, WireSpec::ideal()).unwrap();
        net.connect_to(x, j, WireSpec::ideal()).unwrap();
        assert_eq!(net.component(j).unwrap().circuit(), CircuitId::TOP);
    }

    #[test]
    fn test_join_without_ancestor_fails_cleanly() {
        let mut net = Network::new();
        let a = net.create("resistor").unwrap();
        let j = net.create("joiner").unwrap();
        let err = net.connect_to(a, j, WireSpec::ideal()).unwrap_err();
        assert_eq!(
            err,
            Error::Connection(ConnectionError::NoAncestor {
                circuit: CircuitId::TOP
            })
        );
        assert_eq!(net.wire_count(), 0);
        assert!(net.component(a).unwrap().outputs().is_empty());
    }

    #[test]
    fn test_fan_out_limits() {
        let mut net = Network::new();
        let s = net.create("splitter").unwrap();
        let x = net.create("resistor").unwrap();
        let y = net.create("resistor").unwrap();
        let z = net.create("resistor").unwrap();
        net.connect_to(s, x, WireSpec::ideal()).unwrap();
        net.connect_to(s, y, WireSpec::ideal()).unwrap();
        let err = net.connect_to(s, z, WireSpec::ideal()).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::OutputsExhausted { limit: 2, .. })
        ));
        assert_eq!(net.component(s).unwrap().branches().len(), 2);

        let j = net.create("joiner").unwrap();
        net.connect_to(x, j, WireSpec::ideal()).unwrap();
        net.connect_to(y, j, WireSpec::ideal()).unwrap();
        let err = net.connect_to(z, j, WireSpec::ideal()).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::InputsExhausted { limit: 2, .. })
        ));
        assert_eq!(net.wire_count(), 4);
        assert!(net.component(z).unwrap().outputs().is_empty());
    }

    #[test]
    fn test_direct_join_still_takes_a_branch_slot() {
        let mut net = Network::new();
        let t = net.create("two_way_switch").unwrap();
        let j = net.create("joiner").unwrap();
        let x = net.create("resistor").unwrap();
        let wj = net.connect_to(t, j, WireSpec::ideal()).unwrap();
        net.connect_to(t, x, WireSpec::ideal()).unwrap();

        let branches = net.component(t).unwrap().branches().to_vec();
        assert_eq!(branches.len(), 2);
        assert_eq!(net.wire(wj).unwrap().branch(), Some(branches[0]));
        assert_eq!(net.component(j).unwrap().circuit(), CircuitId::TOP);
        assert_eq!(net.component(x).unwrap().circuit(), branches[1]);
        assert_eq!(net.circuit(branches[1]).unwrap().broken_by(), Some(t));
    }

    #[test]
    fn test_branch_slot_is_reused_after_disconnect() {
        let mut net = Network::new();
        let s = net.create("splitter").unwrap();
        let x = net.create("resistor").unwrap();
        let y = net.create("resistor").unwrap();
        let w = net.connect_to(s, x, WireSpec::ideal()).unwrap();
        net.connect_to(s, y, WireSpec::ideal()).unwrap();
        net.disconnect(w).unwrap();

        let z = net.create("resistor").unwrap();
        net.connect_to(s, z, WireSpec::ideal()).unwrap();
        let branches = net.component(s).unwrap().branches().to_vec();
        assert_eq!(branches.len(), 2);
        assert_eq!(net.component(z).unwrap().circuit(), branches[0]);
    }
}
