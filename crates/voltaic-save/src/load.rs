//! Session document to network.

use std::fs;
use std::path::Path;

use voltaic_core::wire::polyline_length;
use voltaic_core::{ComponentData, Environment, Kind, Material, Network, WireSpec};

use crate::error::{Error, Result};
use crate::format::{ComponentRecord, ConnectionRecord, Session};
use crate::save::get_data;

/// A record that passed validation.
struct Planned {
    kind: Kind,
    data: ComponentData,
    materials: Vec<Material>,
}

/// Build a network from a session document.
///
/// Every record is validated before anything is constructed. Components
/// are then created in document order, wired, and only then given their
/// type-specific settings. `None` yields an empty network.
pub fn load(session: Option<&Session>) -> Result<(Network, Environment)> {
    let Some(session) = session else {
        return Ok((Network::new(), Environment::default()));
    };
    let plan = validate(session)?;
    let environment = session.environment.clone();

    let mut network = Network::new();
    let mut ids = Vec::with_capacity(plan.len());
    for (planned, record) in plan.iter().zip(&session.components) {
        let id = network.create_component(planned.kind.clone());
        if let Some(component) = network.component_mut(id) {
            component.set_position(record.position);
        }
        ids.push(id);
    }

    for (record, (planned, component)) in plan.iter().zip(&session.components).enumerate() {
        let source = ids[record];
        for (connection, &material) in component.connections.iter().zip(&planned.materials) {
            let index = connection.index;
            let destination = ids[index];
            let to = session.components[index].position;
            let spec = wire_spec(connection, material, component.position, to, &environment);
            network
                .connect_to(source, destination, spec)
                .map_err(|err| Error::Connect {
                    record,
                    index,
                    source: err,
                })?;
        }
    }

    for (planned, &id) in plan.iter().zip(&ids) {
        network.apply_data(id, &planned.data)?;
    }

    log::debug!(
        "loaded {} components, {} wires",
        network.component_count(),
        network.wire_count()
    );
    Ok((network, environment))
}

fn validate(session: &Session) -> Result<Vec<Planned>> {
    let count = session.components.len();
    session
        .components
        .iter()
        .enumerate()
        .map(|(record, component)| validate_record(record, component, count))
        .collect()
}

fn validate_record(record: usize, component: &ComponentRecord, count: usize) -> Result<Planned> {
    let kind: Kind = component.kind.parse().map_err(|_| Error::UnknownType {
        record,
        name: component.kind.clone(),
    })?;

    let data = if component.data.is_null() {
        ComponentData::default()
    } else {
        serde_json::from_value(component.data.clone()).map_err(|e| Error::Malformed {
            record,
            message: format!("bad data for {kind}: {e}"),
        })?
    };

    if !component.position.iter().all(|v| v.is_finite()) {
        return Err(Error::Malformed {
            record,
            message: "position is not finite".into(),
        });
    }

    let mut materials = Vec::with_capacity(component.connections.len());
    for connection in &component.connections {
        if connection.index >= count {
            return Err(Error::BadConnection {
                record,
                index: connection.index,
            });
        }
        let material = Material::from_index(connection.material).ok_or_else(|| Error::Malformed {
            record,
            message: format!("unknown material {}", connection.material),
        })?;
        if connection.radius <= 0.0 {
            return Err(Error::Malformed {
                record,
                message: format!("wire radius must be positive, got {}", connection.radius),
            });
        }
        materials.push(material);
    }

    Ok(Planned {
        kind,
        data,
        materials,
    })
}

/// Wire length is the drawn polyline through both endpoints, in metres.
fn wire_spec(
    connection: &ConnectionRecord,
    material: Material,
    from: [f64; 2],
    to: [f64; 2],
    environment: &Environment,
) -> WireSpec {
    let mut points = Vec::with_capacity(connection.path.len() + 2);
    points.push(from);
    points.extend_from_slice(&connection.path);
    points.push(to);
    let pixels = polyline_length(&points);

    WireSpec {
        path: connection.path.clone(),
        length: pixels / environment.pixels_per_unit.max(f64::EPSILON),
        has_resistance: connection.has_resistance,
        material,
        radius: connection.radius,
    }
}

/// Parse and load a JSON session document.
pub fn from_str(json: &str) -> Result<(Network, Environment)> {
    let session: Session = serde_json::from_str(json)?;
    load(Some(&session))
}

/// Serialize a network to a pretty-printed JSON session document.
pub fn to_string(network: &Network, environment: &Environment) -> Result<String> {
    Ok(serde_json::to_string_pretty(&get_data(network, environment)?)?)
}

pub fn read_file(path: impl AsRef<Path>) -> Result<(Network, Environment)> {
    from_str(&fs::read_to_string(path)?)
}

pub fn write_file(
    path: impl AsRef<Path>,
    network: &Network,
    environment: &Environment,
) -> Result<()> {
    fs::write(path, to_string(network, environment)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_document_is_empty() {
        let (net, env) = load(None).unwrap();
        assert_eq!(net.component_count(), 0);
        assert_eq!(net.top().depth(), 0);
        assert_eq!(env, Environment::default());
    }

    #[test]
    fn test_unknown_type_rejected_before_construction() {
        let err = from_str(
            r#"{"components": [
                {"type": "battery", "position": [0, 0]},
                {"type": "capacitor", "position": [0, 0]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownType { record: 1, .. }));
    }

    #[test]
    fn test_out_of_range_connection() {
        let err = from_str(
            r#"{"components": [
                {"type": "battery", "position": [0, 0], "connections": [{"index": 3}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::BadConnection {
                record: 0,
                index: 3
            }
        ));
    }

    #[test]
    fn test_unknown_data_field_is_malformed() {
        let err = from_str(
            r#"{"components": [
                {"type": "resistor", "position": [0, 0], "data": {"ohms": 4}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Malformed { record: 0, .. }));
    }

    #[test]
    fn test_bad_material() {
        let err = from_str(
            r#"{"components": [
                {"type": "battery", "position": [0, 0],
                 "connections": [{"index": 0, "material": 9}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Malformed { record: 0, .. }));
    }

    #[test]
    fn test_self_connection_reports_record() {
        let err = from_str(
            r#"{"components": [
                {"type": "battery", "position": [0, 0], "connections": [{"index": 0}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Connect {
                record: 0,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_wire_length_from_geometry() {
        let (net, _) = from_str(
            r#"{"pixelsPerUnit": 100, "components": [
                {"type": "battery", "position": [0, 0],
                 "connections": [{"index": 1, "path": [[300, 0]], "hasResistance": true}]},
                {"type": "resistor", "position": [300, 400]}
            ]}"#,
        )
        .unwrap();
        let (_, wire) = net.wires().next().unwrap();
        assert!((wire.length() - 7.0).abs() < 1e-12);
        assert!(wire.resistance() > 0.0);
    }

    #[test]
    fn test_settings_applied_after_wiring() {
        let (net, _) = from_str(
            r#"{"components": [
                {"type": "battery", "position": [0, 0], "connections": [{"index": 1}]},
                {"type": "switch", "position": [0, 0], "data": {"closed": false},
                 "connections": [{"index": 0}]}
            ]}"#,
        )
        .unwrap();
        let switch = net.component_ids()[1];
        assert_eq!(net.top().broken_by(), Some(switch));
    }
}
