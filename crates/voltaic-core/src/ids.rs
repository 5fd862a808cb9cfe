//! Typed handles into the network arena.

use std::fmt;

/// Unique identifier for a component. Allocated monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    /// Create a ComponentId from a raw value.
    pub fn new(id: u32) -> Self {
        ComponentId(id)
    }

    /// Get the raw id value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for a wire. Wires have no user-visible identity; the handle only
/// exists so circuits and components can refer to them without pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(pub(crate) u32);

impl WireId {
    /// Get the raw handle value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Index of a circuit scope. Circuits are never torn down, so the index
/// stays valid for the lifetime of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CircuitId(pub(crate) u32);

impl CircuitId {
    /// The top-level circuit of every network.
    pub const TOP: CircuitId = CircuitId(0);

    /// Get the raw index value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is the top-level circuit.
    pub fn is_top(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            write!(f, "TOP")
        } else {
            write!(f, "C{}", self.0)
        }
    }
}
