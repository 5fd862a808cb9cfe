//! The persisted session document.
//!
//! ```json
//! {
//!   "width": 1280, "height": 720, "pixelsPerUnit": 50,
//!   "ambientTemperature": 20, "ambientLight": 0,
//!   "components": [
//!     { "type": "battery", "position": [100, 100], "data": { "voltage": 9 },
//!       "connections": [ { "index": 1, "path": [], "hasResistance": false,
//!                          "material": 0, "radius": 0.0005 } ] }
//!   ]
//! }
//! ```
//!
//! Connection indices are positions in the `components` array, which is
//! written in flow order starting at the head.

use serde::{Deserialize, Serialize};
use voltaic_core::Environment;
use voltaic_core::wire::DEFAULT_RADIUS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub environment: Environment,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Factory type name.
    #[serde(rename = "type")]
    pub kind: String,
    pub position: [f64; 2],
    /// Type-specific settings; see `voltaic_core::ComponentData`.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

/// An outbound wire of the enclosing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    /// Destination, as a position in the component array.
    pub index: usize,
    #[serde(default)]
    pub path: Vec<[f64; 2]>,
    #[serde(default)]
    pub has_resistance: bool,
    /// Material index, see `voltaic_core::Material`.
    #[serde(default)]
    pub material: u8,
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}
