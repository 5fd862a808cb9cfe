//! Wires: directed edges between two components.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::ids::{CircuitId, ComponentId};

/// Default conductor radius (m).
pub const DEFAULT_RADIUS: f64 = 5e-4;

/// Conductor material. Persisted by its integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Material {
    #[default]
    Copper,
    Aluminium,
    Silver,
    Gold,
    Iron,
    Nichrome,
    Tungsten,
}

impl Material {
    pub const ALL: [Material; 7] = [
        Material::Copper,
        Material::Aluminium,
        Material::Silver,
        Material::Gold,
        Material::Iron,
        Material::Nichrome,
        Material::Tungsten,
    ];

    /// Electrical resistivity at 20 °C (Ω·m).
    pub fn resistivity(self) -> f64 {
        match self {
            Material::Copper => 1.68e-8,
            Material::Aluminium => 2.65e-8,
            Material::Silver => 1.59e-8,
            Material::Gold => 2.44e-8,
            Material::Iron => 9.71e-8,
            Material::Nichrome => 1.10e-6,
            Material::Tungsten => 5.60e-8,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Material> {
        Material::ALL.get(index as usize).copied()
    }
}

impl From<Material> for u8 {
    fn from(m: Material) -> u8 {
        m.index()
    }
}

impl TryFrom<u8> for Material {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Material::from_index(index).ok_or_else(|| format!("unknown material index {index}"))
    }
}

/// Physical description of a wire, supplied when connecting two components.
#[derive(Debug, Clone, PartialEq)]
pub struct WireSpec {
    /// Intermediate waypoints (canvas coordinates). Geometry only.
    pub path: Vec<[f64; 2]>,
    /// Conductor length (m).
    pub length: f64,
    /// Whether the conductor's own resistance is modelled.
    pub has_resistance: bool,
    pub material: Material,
    /// Conductor radius (m).
    pub radius: f64,
}

impl Default for WireSpec {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            length: 0.0,
            has_resistance: false,
            material: Material::default(),
            radius: DEFAULT_RADIUS,
        }
    }
}

impl WireSpec {
    /// An ideal (resistance-free) wire.
    pub fn ideal() -> Self {
        Self::default()
    }

    /// A resistive wire of the given material and length.
    pub fn resistive(material: Material, length: f64, radius: f64) -> Self {
        Self {
            length,
            has_resistance: true,
            material,
            radius,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: Vec<[f64; 2]>) -> Self {
        self.path = path;
        self
    }
}

/// Total length of a polyline.
pub fn polyline_length(points: &[[f64; 2]]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
        .sum()
}

/// A directed edge from `input` to `output`.
#[derive(Debug, Clone)]
pub struct Wire {
    pub(crate) input: ComponentId,
    pub(crate) output: ComponentId,
    pub(crate) circuit: CircuitId,
    /// Branch slot this wire occupies when it leaves a splitter.
    pub(crate) branch: Option<CircuitId>,
    pub(crate) spec: WireSpec,
}

impl Wire {
    /// Component the wire leaves from.
    pub fn input(&self) -> ComponentId {
        self.input
    }

    /// Component the wire leads to.
    pub fn output(&self) -> ComponentId {
        self.output
    }

    /// Circuit that owns this wire.
    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }

    /// Splitter branch this wire feeds, if it leaves a splitter.
    pub fn branch(&self) -> Option<CircuitId> {
        self.branch
    }

    pub fn spec(&self) -> &WireSpec {
        &self.spec
    }

    pub fn length(&self) -> f64 {
        self.spec.length
    }

    /// Cross-sectional area (m²).
    pub fn cross_section(&self) -> f64 {
        PI * self.spec.radius * self.spec.radius
    }

    /// Conductor volume (m³).
    pub fn volume(&self) -> f64 {
        self.cross_section() * self.spec.length
    }

    /// Resistance ρ·L/A, or zero for an ideal wire.
    pub fn resistance(&self) -> f64 {
        let area = self.cross_section();
        if !self.spec.has_resistance || area <= 0.0 {
            return 0.0;
        }
        self.spec.material.resistivity() * self.spec.length / area
    }
}
