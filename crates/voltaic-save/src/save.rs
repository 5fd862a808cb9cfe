//! Network to session document.

use std::collections::HashMap;

use voltaic_core::{ComponentId, Environment, Network};

use crate::error::Result;
use crate::format::{ComponentRecord, ConnectionRecord, Session};

/// Snapshot a network into a session document, components in flow order.
pub fn get_data(network: &Network, environment: &Environment) -> Result<Session> {
    let order = network.flow_order();
    let index: HashMap<ComponentId, usize> =
        order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut components = Vec::with_capacity(order.len());
    for id in order {
        let component = network.try_component(id)?;

        let mut connections = Vec::with_capacity(component.outputs().len());
        for &wire_id in component.outputs() {
            let wire = network.try_wire(wire_id)?;
            let Some(&destination) = index.get(&wire.output()) else {
                continue;
            };
            let spec = wire.spec();
            connections.push(ConnectionRecord {
                index: destination,
                path: spec.path.clone(),
                has_resistance: spec.has_resistance,
                material: spec.material.index(),
                radius: spec.radius,
            });
        }

        components.push(ComponentRecord {
            kind: component.kind().name().to_string(),
            position: component.position(),
            data: serde_json::to_value(component.data())?,
            connections,
        });
    }

    log::debug!("saved {} components", components.len());
    Ok(Session {
        environment: environment.clone(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltaic_core::WireSpec;

    #[test]
    fn test_records_are_in_flow_order() {
        let mut net = Network::new();
        let r = net.create("resistor").unwrap();
        let b = net.create("battery").unwrap();
        net.connect_to(b, r, WireSpec::ideal()).unwrap();
        net.connect_to(r, b, WireSpec::ideal()).unwrap();

        let session = get_data(&net, &Environment::default()).unwrap();
        assert_eq!(session.components[0].kind, "battery");
        assert_eq!(session.components[1].kind, "resistor");
        assert_eq!(session.components[0].connections[0].index, 1);
        assert_eq!(session.components[1].connections[0].index, 0);
        assert_eq!(session.components[0].data["voltage"], 9.0);
    }

    #[test]
    fn test_empty_network() {
        let session = get_data(&Network::new(), &Environment::default()).unwrap();
        assert!(session.components.is_empty());
    }
}
